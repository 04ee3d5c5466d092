/// The six canonical faces of a hexahedral grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceType {
    PosI,
    NegI,
    PosJ,
    NegJ,
    PosK,
    NegK,
}

impl FaceType {
    /// All faces, in canonical order.
    pub const ALL: [FaceType; 6] = [
        FaceType::PosI,
        FaceType::NegI,
        FaceType::PosJ,
        FaceType::NegJ,
        FaceType::PosK,
        FaceType::NegK,
    ];

    /// Returns the face on the other side of the shared cell boundary.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::PosI => Self::NegI,
            Self::NegI => Self::PosI,
            Self::PosJ => Self::NegJ,
            Self::NegJ => Self::PosJ,
            Self::PosK => Self::NegK,
            Self::NegK => Self::PosK,
        }
    }

    /// Index offset `(di, dj, dk)` to the neighbor cell across this face.
    #[must_use]
    pub fn ijk_offset(self) -> (isize, isize, isize) {
        match self {
            Self::PosI => (1, 0, 0),
            Self::NegI => (-1, 0, 0),
            Self::PosJ => (0, 1, 0),
            Self::NegJ => (0, -1, 0),
            Self::PosK => (0, 0, 1),
            Self::NegK => (0, 0, -1),
        }
    }

    /// Indices into the 8-corner cell layout of this face's corners.
    ///
    /// Corners 0..=3 lie on the K- side and 4..=7 on the K+ side, each
    /// counter-clockwise starting at (i, j). The returned winding gives a
    /// normal pointing along the face's positive index direction when the
    /// grid's i, j, k axes form a right-handed system.
    #[must_use]
    pub fn corner_indices(self) -> [usize; 4] {
        match self {
            Self::PosI => [1, 2, 6, 5],
            Self::NegI => [0, 4, 7, 3],
            Self::PosJ => [3, 7, 6, 2],
            Self::NegJ => [0, 1, 5, 4],
            Self::PosK => [4, 5, 6, 7],
            Self::NegK => [0, 3, 2, 1],
        }
    }

    /// Parses Eclipse face names such as `X`, `I-`, `Y+` or `K`.
    #[must_use]
    pub fn from_eclipse_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "X" | "X+" | "I" | "I+" => Some(Self::PosI),
            "X-" | "I-" => Some(Self::NegI),
            "Y" | "Y+" | "J" | "J+" => Some(Self::PosJ),
            "Y-" | "J-" => Some(Self::NegJ),
            "Z" | "Z+" | "K" | "K+" => Some(Self::PosK),
            "Z-" | "K-" => Some(Self::NegK),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_involution() {
        for face in FaceType::ALL {
            assert_eq!(face.opposite().opposite(), face);
            assert_ne!(face.opposite(), face);
        }
    }

    #[test]
    fn opposite_faces_share_no_corners() {
        for face in FaceType::ALL {
            let a = face.corner_indices();
            let b = face.opposite().corner_indices();
            assert!(a.iter().all(|c| !b.contains(c)));
        }
    }

    #[test]
    fn eclipse_face_names() {
        assert_eq!(FaceType::from_eclipse_name("x"), Some(FaceType::PosI));
        assert_eq!(FaceType::from_eclipse_name("I-"), Some(FaceType::NegI));
        assert_eq!(FaceType::from_eclipse_name(" Z "), Some(FaceType::PosK));
        assert_eq!(FaceType::from_eclipse_name("W"), None);
    }
}
