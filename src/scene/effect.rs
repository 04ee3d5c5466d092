use crate::color::ScalarMapper;
use crate::math::Color3;

/// Depth offset tier applied to filled polygons.
///
/// Coincident surfaces must use different tiers to avoid z-fighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonOffset {
    None,
    Po1,
    Po2,
    /// Pulls geometry towards the camera.
    PoNegLarge,
}

/// Which polygon side is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaceCulling {
    #[default]
    None,
    Back,
    Front,
}

/// How a part is shaded.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Renderer defaults; used for text.
    Default,
    /// Flat, lit single color.
    Surface {
        color: Color3,
        polygon_offset: PolygonOffset,
        face_culling: FaceCulling,
    },
    /// Colors looked up through the drawable's texture coordinates.
    ///
    /// With `opacity < 1`, texture row [`TEXTURE_Y_OPAQUE_LINE`] still draws
    /// fully opaque and row [`TEXTURE_Y_UNDEFINED`] draws nothing.
    ///
    /// [`TEXTURE_Y_OPAQUE_LINE`]: crate::color::TEXTURE_Y_OPAQUE_LINE
    /// [`TEXTURE_Y_UNDEFINED`]: crate::color::TEXTURE_Y_UNDEFINED
    ScalarMapper {
        color_table: Vec<Color3>,
        polygon_offset: PolygonOffset,
        face_culling: FaceCulling,
        opacity: f32,
    },
    /// Unlit lines.
    Mesh { color: Color3 },
}

impl Effect {
    #[must_use]
    pub fn surface(color: Color3, polygon_offset: PolygonOffset, face_culling: FaceCulling) -> Self {
        Self::Surface {
            color,
            polygon_offset,
            face_culling,
        }
    }

    #[must_use]
    pub fn scalar_mapper(
        mapper: &dyn ScalarMapper,
        polygon_offset: PolygonOffset,
        face_culling: FaceCulling,
        opacity: f32,
    ) -> Self {
        Self::ScalarMapper {
            color_table: mapper.color_table(),
            polygon_offset,
            face_culling,
            opacity,
        }
    }

    #[must_use]
    pub fn polygon_offset(&self) -> PolygonOffset {
        match self {
            Self::Surface { polygon_offset, .. } | Self::ScalarMapper { polygon_offset, .. } => {
                *polygon_offset
            }
            Self::Default | Self::Mesh { .. } => PolygonOffset::None,
        }
    }

    #[must_use]
    pub fn face_culling(&self) -> FaceCulling {
        match self {
            Self::Surface { face_culling, .. } | Self::ScalarMapper { face_culling, .. } => {
                *face_culling
            }
            Self::Default | Self::Mesh { .. } => FaceCulling::None,
        }
    }
}
