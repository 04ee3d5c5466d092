use tracing::debug;

use crate::color::{apply_well_pipe_opacity, quad_texture_coordinates, ScalarMapper};
use crate::config::Preferences;
use crate::error::Result;
use crate::fault::{Fault, FaultCollection, FaultDisplaySettings, FaultFaceCulling};
use crate::grid::{CellVisibility, GridTopology};
use crate::math::{Aabb, Color3, Point3, TexCoord};
use crate::results::{CellScalarAccessor, CombinedTransmissibilityAccessor, ResultKind};
use crate::scene::{
    Drawable, Effect, FaceCulling, Part, PartId, PolygonOffset, SceneModel, SceneStore,
    SourceInfo, TextLabel, FAULT_BIT, MESH_FAULT_BIT,
};
use crate::tessellation::{
    FaultGeometryGenerator, FaultSide, LineMesh, NncGeometryGenerator, TriangleMesh,
};

use super::CellResultSlot;

/// Draw priority of fault surfaces.
pub const PRIORITY_FAULT_GEOMETRY: i32 = 1;
/// Draw priority of NNC surfaces.
pub const PRIORITY_NNC_GEOMETRY: i32 = 2;
/// Draw priority of fault mesh lines.
pub const PRIORITY_MESH: i32 = 3;
/// Draw priority of surfaces while the manager is translucent.
pub const PRIORITY_TRANSPARENT: i32 = 100;
/// Draw priority of fault labels.
pub const PRIORITY_LABEL: i32 = 1000;

/// Fraction of the way towards white NNC faces are lightened from the fault
/// color.
const NNC_LIGHTEN_FRACTION: f32 = 0.2;

/// Culling of fault surfaces for the given display settings.
///
/// Grid visualization mode never culls so the grid stays watertight. The
/// culled side flips when the grid's face winding points inwards.
#[must_use]
pub fn face_culling_mode(
    display: &FaultDisplaySettings,
    face_normals_outwards: bool,
) -> FaceCulling {
    if display.is_grid_visualization_mode {
        return FaceCulling::None;
    }
    match (display.fault_result, face_normals_outwards) {
        (FaultFaceCulling::CullBackFaces, true) | (FaultFaceCulling::CullFrontFaces, false) => {
            FaceCulling::Back
        }
        (FaultFaceCulling::CullBackFaces, false) | (FaultFaceCulling::CullFrontFaces, true) => {
            FaceCulling::Front
        }
        (FaultFaceCulling::NoCulling, _) => FaceCulling::None,
    }
}

/// Text color of fault labels: the collection's color if set, otherwise the
/// preference default.
#[must_use]
pub fn resolve_label_color(display: &FaultDisplaySettings, preferences: &Preferences) -> Color3 {
    display
        .fault_label_color
        .unwrap_or(preferences.default_well_label_color)
}

/// The vertex nearest to `point`. Ties go to the first vertex.
#[must_use]
pub fn find_closest_vertex(point: &Point3, vertices: &[Point3]) -> Option<Point3> {
    let mut closest: Option<(f64, Point3)> = None;
    for v in vertices {
        let dist = nalgebra::distance(point, v);
        match closest {
            Some((best, _)) if dist >= best => {}
            _ => closest = Some((dist, *v)),
        }
    }
    closest.map(|(_, v)| v)
}

/// Where a fault label and its anchor line go.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPlacement {
    /// Fault vertex the anchor line starts from.
    pub anchor: Point3,
    /// Upper end of the anchor line.
    pub label_position: Point3,
    /// Position of the text glyphs.
    pub text_position: Point3,
}

/// Places a label above the vertex closest to the top center of
/// `bounding_box`.
#[must_use]
pub fn label_placement(bounding_box: &Aabb, vertices: &[Point3]) -> Option<LabelPlacement> {
    if !bounding_box.is_valid() {
        return None;
    }
    let mut top_center = bounding_box.center();
    top_center.z = bounding_box.max.z;

    let anchor = find_closest_vertex(&top_center, vertices)?;
    let extent_z = bounding_box.extent().z;

    let mut label_position = anchor;
    label_position.z += extent_z / 2.0;
    let mut text_position = label_position;
    text_position.z += extent_z / 20.0;

    Some(LabelPlacement {
        anchor,
        label_position,
        text_position,
    })
}

/// Handles of the parts one fault may produce. Every slot is empty until
/// its geometry is generated.
#[derive(Debug, Clone, Copy, Default)]
struct FaultParts {
    native_faces: Option<PartId>,
    opposite_faces: Option<PartId>,
    native_grid_lines: Option<PartId>,
    opposite_grid_lines: Option<PartId>,
    nnc_faces: Option<PartId>,
    label: Option<PartId>,
    label_line: Option<PartId>,
}

impl FaultParts {
    fn all(&self) -> [Option<PartId>; 7] {
        [
            self.native_faces,
            self.opposite_faces,
            self.native_grid_lines,
            self.opposite_grid_lines,
            self.nnc_faces,
            self.label,
            self.label_line,
        ]
    }
}

/// Cell values a side's surface is colored from.
enum SurfaceValues<'a, G: GridTopology> {
    Cell(CellScalarAccessor<'a>),
    FaceTransmissibility(CombinedTransmissibilityAccessor<'a, G>),
}

impl<G: GridTopology> SurfaceValues<'_, G> {
    fn texture_coordinates(
        &self,
        generator: &FaultGeometryGenerator,
        mapper: &dyn ScalarMapper,
    ) -> Vec<TexCoord> {
        match self {
            Self::Cell(accessor) => generator.texture_coordinates(accessor, mapper),
            Self::FaceTransmissibility(accessor) => quad_texture_coordinates(
                generator
                    .quad_to_cell_indices()
                    .iter()
                    .zip(generator.quad_to_face())
                    .map(|(&cell, &face)| accessor.cell_face_value(cell, face)),
                mapper,
            ),
        }
    }
}

/// Builds and colors the parts of one fault.
///
/// Parts live in a [`SceneStore`]; the manager replaces them whenever the
/// geometry is regenerated, so handles appended to a [`SceneModel`] earlier
/// go stale.
#[derive(Debug)]
pub struct FaultPartManager<'g, G: GridTopology> {
    grid: &'g G,
    fault_index: usize,
    preferences: Preferences,
    native_generator: FaultGeometryGenerator,
    opposite_generator: FaultGeometryGenerator,
    nnc_generator: NncGeometryGenerator,
    opacity_level: f32,
    default_color: Color3,
    parts: FaultParts,
}

impl<'g, G: GridTopology> FaultPartManager<'g, G> {
    /// Creates the manager for `collection.faults[fault_index]`, generates
    /// its geometry with every cell visible and applies the fault color.
    ///
    /// # Errors
    ///
    /// Returns an error if a generated part cannot be found in `store`.
    ///
    /// # Panics
    ///
    /// Panics if `fault_index` is out of range for `collection`.
    pub fn new(
        grid: &'g G,
        collection: &FaultCollection,
        fault_index: usize,
        preferences: Preferences,
        store: &mut SceneStore,
    ) -> Result<Self> {
        let fault = &collection.faults[fault_index];
        let connection_indices = grid.connection_indices_for_fault(fault);
        debug!(
            fault = %fault.name,
            faces = fault.faces.len(),
            nncs = connection_indices.len(),
            "creating fault part manager"
        );

        let mut manager = Self {
            grid,
            fault_index,
            preferences,
            native_generator: FaultGeometryGenerator::new(fault.faces.clone(), FaultSide::Native),
            opposite_generator: FaultGeometryGenerator::new(
                fault.faces.clone(),
                FaultSide::Opposite,
            ),
            nnc_generator: NncGeometryGenerator::new(connection_indices),
            opacity_level: 1.0,
            default_color: Color3::WHITE,
            parts: FaultParts::default(),
        };
        let all_visible = CellVisibility::all_visible(grid.cell_count());
        manager.set_cell_visibility(&all_visible, collection, store)?;
        manager.apply_single_color_effect(collection, store)?;
        Ok(manager)
    }

    fn fault<'c>(&self, collection: &'c FaultCollection) -> &'c Fault {
        &collection.faults[self.fault_index]
    }

    #[must_use]
    pub fn fault_index(&self) -> usize {
        self.fault_index
    }

    #[must_use]
    pub fn opacity_level(&self) -> f32 {
        self.opacity_level
    }

    /// Opacity of result-colored surfaces; takes effect on the next effect
    /// update.
    pub fn set_opacity_level(&mut self, opacity: f32) {
        self.opacity_level = opacity.clamp(0.0, 1.0);
    }

    #[must_use]
    pub fn default_color(&self) -> Color3 {
        self.default_color
    }

    #[must_use]
    pub fn native_faces(&self) -> Option<PartId> {
        self.parts.native_faces
    }

    #[must_use]
    pub fn opposite_faces(&self) -> Option<PartId> {
        self.parts.opposite_faces
    }

    #[must_use]
    pub fn native_grid_lines(&self) -> Option<PartId> {
        self.parts.native_grid_lines
    }

    #[must_use]
    pub fn opposite_grid_lines(&self) -> Option<PartId> {
        self.parts.opposite_grid_lines
    }

    #[must_use]
    pub fn nnc_faces(&self) -> Option<PartId> {
        self.parts.nnc_faces
    }

    #[must_use]
    pub fn label(&self) -> Option<PartId> {
        self.parts.label
    }

    #[must_use]
    pub fn label_line(&self) -> Option<PartId> {
        self.parts.label_line
    }

    /// Culling applied to this fault's surfaces.
    #[must_use]
    pub fn face_culling(&self, collection: &FaultCollection) -> FaceCulling {
        face_culling_mode(&collection.display, self.grid.face_normals_outwards())
    }

    /// Restricts all generators to `visibility` and rebuilds every part.
    ///
    /// # Errors
    ///
    /// Returns an error if a generated part cannot be found in `store`.
    pub fn set_cell_visibility(
        &mut self,
        visibility: &CellVisibility,
        collection: &FaultCollection,
        store: &mut SceneStore,
    ) -> Result<()> {
        self.native_generator.set_cell_visibility(visibility.clone());
        self.opposite_generator.set_cell_visibility(visibility.clone());
        self.nnc_generator.set_cell_visibility(visibility.clone());
        self.generate_part_geometry(collection, store)
    }

    fn surface_part(&self, generator: &FaultGeometryGenerator, mesh: TriangleMesh) -> Part {
        let grid_index = self.grid.grid_index();
        let mut part = Part::new(format!("Grid {grid_index}"), Drawable::Triangles(mesh));
        part.id = grid_index;
        part.source_info = Some(SourceInfo::Cells {
            cell_indices: generator.triangle_to_cell_map(),
            face_types: generator.triangle_to_face_map(),
        });
        part.enable_mask = FAULT_BIT;
        part.priority = PRIORITY_FAULT_GEOMETRY;
        part
    }

    fn mesh_part(&self, lines: LineMesh) -> Part {
        let mut part = Part::new(
            format!("Grid mesh {}", self.grid.grid_index()),
            Drawable::Lines(lines),
        );
        part.enable_mask = MESH_FAULT_BIT;
        part.priority = PRIORITY_MESH;
        part
    }

    /// Replaces all parts with freshly generated ones and reapplies the
    /// current single-color effects.
    ///
    /// # Errors
    ///
    /// Returns an error if a generated part cannot be found in `store`.
    pub fn generate_part_geometry(
        &mut self,
        collection: &FaultCollection,
        store: &mut SceneStore,
    ) -> Result<()> {
        for id in self.parts.all().into_iter().flatten() {
            store.remove_part(id);
        }
        self.parts = FaultParts::default();

        if let Some(mesh) = self.native_generator.generate_surface(self.grid) {
            let part = self.surface_part(&self.native_generator, mesh);
            self.parts.native_faces = Some(store.add_part(part));
        }
        if let Some(lines) = self.native_generator.create_mesh_drawable() {
            self.parts.native_grid_lines = Some(store.add_part(self.mesh_part(lines)));
        }

        if let Some(mesh) = self.opposite_generator.generate_surface(self.grid) {
            let part = self.surface_part(&self.opposite_generator, mesh);
            self.parts.opposite_faces = Some(store.add_part(part));
        }
        if let Some(lines) = self.opposite_generator.create_mesh_drawable() {
            self.parts.opposite_grid_lines = Some(store.add_part(self.mesh_part(lines)));
        }

        if let Some(mesh) = self.nnc_generator.generate_surface(self.grid) {
            let grid_index = self.grid.grid_index();
            let mut part = Part::new(
                format!("NNC in fault, grid {grid_index}"),
                Drawable::Triangles(mesh),
            );
            part.id = grid_index;
            part.source_info = Some(SourceInfo::Nnc {
                nnc_indices: self.nnc_generator.triangle_to_nnc_index().to_vec(),
            });
            part.enable_mask = FAULT_BIT;
            part.priority = PRIORITY_NNC_GEOMETRY;
            self.parts.nnc_faces = Some(store.add_part(part));
        }

        let label_color = resolve_label_color(&collection.display, &self.preferences);
        self.create_label_with_anchor_line(self.fault(collection), label_color, store)?;

        debug!(
            fault = %self.fault(collection).name,
            parts = self.parts.all().iter().flatten().count(),
            "generated fault part geometry"
        );
        self.update_part_effect(collection, store)
    }

    /// Creates the label and its anchor line above the native surface.
    /// Without a native surface both stay empty.
    fn create_label_with_anchor_line(
        &mut self,
        fault: &Fault,
        text_color: Color3,
        store: &mut SceneStore,
    ) -> Result<()> {
        self.parts.label = None;
        self.parts.label_line = None;

        let Some(native_id) = self.parts.native_faces else {
            return Ok(());
        };
        let native = store.part(native_id)?;
        let Some(placement) = label_placement(&native.bounding_box(), native.drawable.vertices())
        else {
            return Ok(());
        };

        let mut label = Part::new(
            format!("fault label: {}", fault.name),
            Drawable::Text(TextLabel {
                text: fault.name.clone(),
                position: placement.text_position,
                color: text_color,
            }),
        );
        label.priority = PRIORITY_LABEL;
        self.parts.label = Some(store.add_part(label));

        let mut line = Part::new(
            format!("Anchor line for label {}", self.grid.grid_index()),
            Drawable::Lines(LineMesh {
                vertices: vec![placement.anchor, placement.label_position],
                segments: vec![[0, 1]],
            }),
        );
        line.effect = Effect::Mesh { color: fault.color };
        self.parts.label_line = Some(store.add_part(line));
        Ok(())
    }

    /// Surfaces and NNC faces render last while translucent.
    fn apply_surface_priorities(&self, store: &mut SceneStore) -> Result<()> {
        let translucent = self.opacity_level < 1.0;
        let surfaces = [
            (self.parts.native_faces, PRIORITY_FAULT_GEOMETRY),
            (self.parts.opposite_faces, PRIORITY_FAULT_GEOMETRY),
            (self.parts.nnc_faces, PRIORITY_NNC_GEOMETRY),
        ];
        for (id, priority) in surfaces {
            if let Some(id) = id {
                store.part_mut(id)?.priority = if translucent {
                    PRIORITY_TRANSPARENT
                } else {
                    priority
                };
            }
        }
        Ok(())
    }

    /// Applies flat effects in the default color to all parts.
    ///
    /// # Errors
    ///
    /// Returns an error if a part handle no longer resolves in `store`.
    pub fn update_part_effect(
        &mut self,
        collection: &FaultCollection,
        store: &mut SceneStore,
    ) -> Result<()> {
        let culling = self.face_culling(collection);
        let sides = [
            (self.parts.native_faces, PolygonOffset::Po1),
            (self.parts.opposite_faces, PolygonOffset::Po2),
        ];
        for (id, offset) in sides {
            if let Some(id) = id {
                let part = store.part_mut(id)?;
                part.effect = Effect::surface(self.default_color, offset, culling);
                if let Some(mesh) = part.drawable.as_triangles_mut() {
                    mesh.tex_coords = None;
                }
            }
        }

        self.update_nnc_colors(None, collection, store)?;

        let mesh_effect = Effect::Mesh {
            color: self.preferences.default_fault_grid_line_color,
        };
        for id in [self.parts.native_grid_lines, self.parts.opposite_grid_lines]
            .into_iter()
            .flatten()
        {
            store.part_mut(id)?.effect = mesh_effect.clone();
        }

        self.apply_surface_priorities(store)
    }

    /// Colors every surface with the fault's own color.
    ///
    /// # Errors
    ///
    /// Returns an error if a part handle no longer resolves in `store`.
    pub fn apply_single_color_effect(
        &mut self,
        collection: &FaultCollection,
        store: &mut SceneStore,
    ) -> Result<()> {
        self.default_color = self.fault(collection).color;
        self.update_part_effect(collection, store)
    }

    /// Colors the NNC faces: by transmissibility for the combined
    /// transmissibility result, otherwise flat in a lightened fault color.
    ///
    /// # Errors
    ///
    /// Returns an error if a part handle no longer resolves in `store`.
    pub fn update_nnc_colors(
        &mut self,
        slot: Option<&CellResultSlot<'_>>,
        collection: &FaultCollection,
        store: &mut SceneStore,
    ) -> Result<()> {
        let Some(id) = self.parts.nnc_faces else {
            return Ok(());
        };

        let display = &collection.display;
        let offset = if display.show_fault_faces || display.show_opposite_fault_faces {
            PolygonOffset::PoNegLarge
        } else {
            PolygonOffset::Po1
        };

        let part = store.part_mut(id)?;
        match slot {
            Some(slot) if slot.kind == ResultKind::CombinedTransmissibility => {
                let coords = self.nnc_generator.texture_coordinates(self.grid, slot.mapper);
                if let Some(mesh) = part.drawable.as_triangles_mut() {
                    mesh.tex_coords = Some(coords);
                }
                part.effect = Effect::scalar_mapper(slot.mapper, offset, FaceCulling::None, 1.0);
            }
            _ => {
                if let Some(mesh) = part.drawable.as_triangles_mut() {
                    mesh.tex_coords = None;
                }
                part.effect = Effect::surface(
                    self.default_color.lightened(NNC_LIGHTEN_FRACTION),
                    offset,
                    FaceCulling::None,
                );
            }
        }
        Ok(())
    }

    /// Colors NNC faces and both surfaces from the selected result.
    ///
    /// Static results are read at time step 0. When the result has no data
    /// for the step the surfaces keep their current effect.
    ///
    /// # Errors
    ///
    /// Returns an error if a part handle no longer resolves in `store`.
    pub fn update_cell_result_color(
        &mut self,
        time_step: usize,
        slot: &CellResultSlot<'_>,
        collection: &FaultCollection,
        store: &mut SceneStore,
    ) -> Result<()> {
        self.update_nnc_colors(Some(slot), collection, store)?;

        let result_step = slot.result_time_step(time_step);
        let values = match slot.kind {
            ResultKind::Scalar => {
                let accessor = slot.scalar_set_index.and_then(|index| {
                    slot.results.data_accessor(
                        self.grid.grid_index(),
                        slot.porosity_model,
                        result_step,
                        index,
                    )
                });
                let Some(accessor) = accessor else {
                    debug!(
                        fault = %self.fault(collection).name,
                        time_step = result_step,
                        "no result data, keeping fault colors"
                    );
                    return Ok(());
                };
                SurfaceValues::Cell(accessor)
            }
            ResultKind::CombinedTransmissibility => SurfaceValues::FaceTransmissibility(
                CombinedTransmissibilityAccessor::new(self.grid, slot.results, slot.porosity_model),
            ),
        };

        let culling = self.face_culling(collection);
        let sides = [
            (self.parts.native_faces, &self.native_generator, PolygonOffset::Po1),
            (self.parts.opposite_faces, &self.opposite_generator, PolygonOffset::Po2),
        ];
        for (id, generator, offset) in sides {
            let Some(id) = id else {
                continue;
            };
            let mut coords = values.texture_coordinates(generator, slot.mapper);
            if self.opacity_level < 1.0 {
                apply_well_pipe_opacity(
                    &mut coords,
                    generator.quad_to_cell_indices(),
                    slot.wells,
                    time_step,
                );
            }

            let part = store.part_mut(id)?;
            if let Some(mesh) = part.drawable.as_triangles_mut() {
                mesh.tex_coords = Some(coords);
            }
            part.effect = Effect::scalar_mapper(slot.mapper, offset, culling, self.opacity_level);
        }

        self.apply_surface_priorities(store)
    }

    /// Cell edge results are not shown on faults.
    #[allow(clippy::unused_self)]
    pub fn update_cell_edge_result_color(&mut self, _time_step: usize, _slot: &CellResultSlot<'_>) {}

    pub fn append_native_fault_faces_to_model(&self, model: &mut SceneModel) {
        if let Some(id) = self.parts.native_faces {
            model.add_part(id);
        }
    }

    pub fn append_opposite_fault_faces_to_model(&self, model: &mut SceneModel) {
        if let Some(id) = self.parts.opposite_faces {
            model.add_part(id);
        }
    }

    pub fn append_mesh_line_parts_to_model(&self, model: &mut SceneModel) {
        for id in [self.parts.native_grid_lines, self.parts.opposite_grid_lines]
            .into_iter()
            .flatten()
        {
            model.add_part(id);
        }
    }

    pub fn append_nnc_faces_to_model(&self, model: &mut SceneModel) {
        if let Some(id) = self.parts.nnc_faces {
            model.add_part(id);
        }
    }

    pub fn append_label_parts_to_model(&self, model: &mut SceneModel) {
        for id in [self.parts.label, self.parts.label_line].into_iter().flatten() {
            model.add_part(id);
        }
    }
}
