//! Mapping of cell results to per-vertex texture coordinates.
//!
//! Surfaces are colored through a 2D texture: the x coordinate picks a color
//! from the mapper's table and the y coordinate picks a row. Row
//! [`TEXTURE_Y_VALID`] holds the colors, row [`TEXTURE_Y_UNDEFINED`] is
//! drawn transparent for cells without a value, and row
//! [`TEXTURE_Y_OPAQUE_LINE`] repeats the colors at full opacity for cells
//! behind a visible well pipe.

mod mapper;

pub use mapper::{LinearScalarMapper, ScalarMapper, COLOR_TABLE_SIZE, NORMAL_LEGEND};

use crate::math::TexCoord;
use crate::results::{is_undefined, WellPipeVisibility};

/// Row used for cells with a defined value.
pub const TEXTURE_Y_VALID: f32 = 0.0;

/// Row used for undefined values.
pub const TEXTURE_Y_UNDEFINED: f32 = 1.0;

/// Row that stays opaque when the surface effect is translucent.
///
/// Only [`apply_well_pipe_opacity`] writes it; freshly mapped coordinates
/// use [`TEXTURE_Y_VALID`] or [`TEXTURE_Y_UNDEFINED`].
pub const TEXTURE_Y_OPAQUE_LINE: f32 = 0.5;

/// Vertices per fault quad; every generator emits quads as 4 unshared vertices.
pub const VERTICES_PER_QUAD: usize = 4;

/// Texture coordinate of a single value.
#[must_use]
pub fn texture_coord(value: f64, mapper: &dyn ScalarMapper) -> TexCoord {
    if is_undefined(value) {
        TexCoord::new(mapper.map_to_texture_x(value), TEXTURE_Y_UNDEFINED)
    } else {
        TexCoord::new(mapper.map_to_texture_x(value), TEXTURE_Y_VALID)
    }
}

/// Texture coordinates for a quad surface, one value per quad broadcast to
/// its four vertices.
#[must_use]
pub fn quad_texture_coordinates(
    quad_values: impl ExactSizeIterator<Item = f64>,
    mapper: &dyn ScalarMapper,
) -> Vec<TexCoord> {
    let mut coords = Vec::with_capacity(quad_values.len() * VERTICES_PER_QUAD);
    for value in quad_values {
        let tc = texture_coord(value, mapper);
        coords.extend([tc; VERTICES_PER_QUAD]);
    }
    coords
}

/// Forces vertices of cells behind a visible well pipe onto the opaque
/// texture row.
///
/// Vertices on the undefined row are left untouched. Returns the number of
/// vertices forced onto the opaque row.
#[allow(clippy::float_cmp)]
pub fn apply_well_pipe_opacity(
    coords: &mut [TexCoord],
    quad_to_cell: &[usize],
    wells: &dyn WellPipeVisibility,
    time_step: usize,
) -> usize {
    let mut forced = 0;
    for (i, tc) in coords.iter_mut().enumerate() {
        if tc.y == TEXTURE_Y_UNDEFINED {
            continue;
        }
        let Some(&cell) = quad_to_cell.get(i / VERTICES_PER_QUAD) else {
            continue;
        };
        let Some(well) = wells.well_index_for_cell(cell) else {
            continue;
        };
        if wells.is_visible(well, time_step) {
            tc.y = TEXTURE_Y_OPAQUE_LINE;
            forced += 1;
        }
    }
    forced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{WellPipeTable, UNDEFINED_VALUE};

    fn mapper() -> LinearScalarMapper {
        LinearScalarMapper::continuous(0.0, 1.0, Vec::new())
    }

    #[test]
    fn quads_broadcast_to_four_vertices() {
        let coords = quad_texture_coordinates([0.25, UNDEFINED_VALUE].into_iter(), &mapper());
        assert_eq!(coords.len(), 8);
        assert!(coords[..4].iter().all(|tc| tc.y == TEXTURE_Y_VALID));
        assert!(coords[4..].iter().all(|tc| tc.y == TEXTURE_Y_UNDEFINED));
        assert!((coords[0].x - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn y_is_always_a_sentinel_before_post_pass() {
        let values = [0.0, 0.3, f64::NAN, 7.0, UNDEFINED_VALUE, -1.0];
        let coords = quad_texture_coordinates(values.into_iter(), &mapper());
        assert!(coords
            .iter()
            .all(|tc| tc.y == TEXTURE_Y_VALID || tc.y == TEXTURE_Y_UNDEFINED));
    }

    #[test]
    fn post_pass_keeps_undefined_vertices() {
        let mut coords =
            quad_texture_coordinates([UNDEFINED_VALUE, 0.5].into_iter(), &mapper());
        let before: Vec<bool> = coords.iter().map(|tc| tc.y == TEXTURE_Y_UNDEFINED).collect();

        let mut wells = WellPipeTable::new(2);
        wells.set_well_cells(0, &[0, 1]);
        wells.set_pipe_visible(0, 0, true);

        let changed = apply_well_pipe_opacity(&mut coords, &[0, 1], &wells, 0);
        assert_eq!(changed, 4);
        assert!(coords[4..].iter().all(|tc| tc.y != TEXTURE_Y_VALID));
        for (tc, was_undefined) in coords.iter().zip(before) {
            if was_undefined {
                assert!(tc.y == TEXTURE_Y_UNDEFINED);
            } else {
                assert!(tc.y == TEXTURE_Y_OPAQUE_LINE);
            }
        }
    }

    #[test]
    fn post_pass_moves_well_cells_off_the_valid_row() {
        let mut coords = quad_texture_coordinates([0.5, 0.25].into_iter(), &mapper());
        let before = coords.clone();

        let mut wells = WellPipeTable::new(2);
        wells.set_well_cells(0, &[0, 1]);
        wells.set_pipe_visible(0, 0, true);

        assert_eq!(apply_well_pipe_opacity(&mut coords, &[0, 1], &wells, 0), 8);
        assert_ne!(before, coords);
        for (old, new) in before.iter().zip(&coords) {
            assert!(new.y == TEXTURE_Y_OPAQUE_LINE);
            assert!((old.x - new.x).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn post_pass_ignores_hidden_pipes() {
        let mut coords = quad_texture_coordinates([0.5].into_iter(), &mapper());
        let mut wells = WellPipeTable::new(1);
        wells.set_well_cells(0, &[0]);
        wells.set_pipe_visible(0, 1, true);
        assert_eq!(apply_well_pipe_opacity(&mut coords, &[0], &wells, 0), 0);
    }
}
