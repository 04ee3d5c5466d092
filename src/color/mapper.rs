use crate::math::Color3;

/// Number of texels in a generated color table.
pub const COLOR_TABLE_SIZE: usize = 256;

/// A value-to-color transfer function sampled through a 1D texture.
pub trait ScalarMapper {
    /// Texture x coordinate in `[0, 1]` for `value`.
    fn map_to_texture_x(&self, value: f64) -> f32;

    /// The texels of the color texture, left to right.
    fn color_table(&self) -> Vec<Color3>;

    /// The color drawn for `value`.
    fn map_to_color(&self, value: f64) -> Color3 {
        let table = self.color_table();
        if table.is_empty() {
            return Color3::WHITE;
        }
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let idx = (self.map_to_texture_x(value) * (table.len() - 1) as f32).round() as usize;
        table[idx.min(table.len() - 1)]
    }
}

/// Blue to red legend used when no colors are configured.
pub const NORMAL_LEGEND: [Color3; 5] = [
    Color3::new(0.0, 0.0, 1.0),
    Color3::new(0.0, 1.0, 1.0),
    Color3::new(0.0, 1.0, 0.0),
    Color3::new(1.0, 1.0, 0.0),
    Color3::new(1.0, 0.0, 0.0),
];

/// Linear mapping of `[range_min, range_max]` onto a piecewise-linear color
/// ramp, optionally quantized into `levels` bands.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearScalarMapper {
    range_min: f64,
    range_max: f64,
    colors: Vec<Color3>,
    levels: Option<usize>,
}

impl LinearScalarMapper {
    /// Creates a continuous mapper. An empty `colors` list falls back to
    /// [`NORMAL_LEGEND`].
    #[must_use]
    pub fn continuous(range_min: f64, range_max: f64, colors: Vec<Color3>) -> Self {
        let colors = if colors.is_empty() {
            NORMAL_LEGEND.to_vec()
        } else {
            colors
        };
        Self {
            range_min,
            range_max,
            colors,
            levels: None,
        }
    }

    /// Creates a mapper quantized into `levels` equal bands.
    #[must_use]
    pub fn discrete(range_min: f64, range_max: f64, colors: Vec<Color3>, levels: usize) -> Self {
        Self {
            levels: Some(levels.max(1)),
            ..Self::continuous(range_min, range_max, colors)
        }
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }

    fn normalized(&self, value: f64) -> f64 {
        let span = self.range_max - self.range_min;
        if !value.is_finite() || span.abs() < f64::EPSILON {
            return 0.5;
        }
        let t = ((value - self.range_min) / span).clamp(0.0, 1.0);
        match self.levels {
            Some(levels) => {
                #[allow(clippy::cast_precision_loss)]
                let n = levels as f64;
                ((t * n).floor().min(n - 1.0) + 0.5) / n
            }
            None => t,
        }
    }

    fn ramp(&self, t: f32) -> Color3 {
        if self.colors.len() == 1 {
            return self.colors[0];
        }
        #[allow(clippy::cast_precision_loss)]
        let segments = (self.colors.len() - 1) as f32;
        let pos = t.clamp(0.0, 1.0) * segments;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let lower = (pos.floor() as usize).min(self.colors.len() - 2);
        #[allow(clippy::cast_precision_loss)]
        let frac = pos - lower as f32;
        self.colors[lower].lerp(self.colors[lower + 1], frac)
    }
}

impl ScalarMapper for LinearScalarMapper {
    #[allow(clippy::cast_possible_truncation)]
    fn map_to_texture_x(&self, value: f64) -> f32 {
        self.normalized(value) as f32
    }

    fn color_table(&self) -> Vec<Color3> {
        #[allow(clippy::cast_precision_loss)]
        let last = (COLOR_TABLE_SIZE - 1) as f64;
        (0..COLOR_TABLE_SIZE)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let t = i as f64 / last;
                let t = match self.levels {
                    Some(_) => self.normalized(self.range_min + t * (self.range_max - self.range_min)),
                    None => t,
                };
                #[allow(clippy::cast_possible_truncation)]
                let t = t as f32;
                self.ramp(t)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn continuous_maps_range_linearly() {
        let m = LinearScalarMapper::continuous(0.0, 10.0, Vec::new());
        assert_relative_eq!(m.map_to_texture_x(0.0), 0.0);
        assert_relative_eq!(m.map_to_texture_x(2.5), 0.25);
        assert_relative_eq!(m.map_to_texture_x(10.0), 1.0);
    }

    #[test]
    fn values_outside_range_are_clamped() {
        let m = LinearScalarMapper::continuous(0.0, 10.0, Vec::new());
        assert_relative_eq!(m.map_to_texture_x(-5.0), 0.0);
        assert_relative_eq!(m.map_to_texture_x(50.0), 1.0);
    }

    #[test]
    fn degenerate_range_maps_to_center() {
        let m = LinearScalarMapper::continuous(3.0, 3.0, Vec::new());
        assert_relative_eq!(m.map_to_texture_x(3.0), 0.5);
    }

    #[test]
    fn discrete_snaps_to_band_centers() {
        let m = LinearScalarMapper::discrete(0.0, 1.0, Vec::new(), 4);
        assert_relative_eq!(m.map_to_texture_x(0.1), 0.125);
        assert_relative_eq!(m.map_to_texture_x(0.99), 0.875);
        assert_relative_eq!(m.map_to_texture_x(1.0), 0.875);
    }

    #[test]
    fn table_endpoints_match_legend() {
        let colors = vec![Color3::BLACK, Color3::WHITE];
        let m = LinearScalarMapper::continuous(0.0, 1.0, colors);
        let table = m.color_table();
        assert_eq!(table.len(), COLOR_TABLE_SIZE);
        assert_eq!(table[0], Color3::BLACK);
        assert_eq!(table[COLOR_TABLE_SIZE - 1], Color3::WHITE);
        assert_eq!(m.map_to_color(1.0), Color3::WHITE);
    }
}
