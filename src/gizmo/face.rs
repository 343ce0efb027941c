use std::fmt;

use glam::Vec3;

/// One of the six faces of the view cube, named after the direction the
/// main camera looks *from* when snapped to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFace {
    /// +X
    Right,
    /// -X
    Left,
    /// +Y
    Top,
    /// -Y
    Bottom,
    /// +Z
    Front,
    /// -Z
    Back,
}

impl CubeFace {
    /// All faces in texture-layer order.
    pub const ALL: [Self; 6] = [
        Self::Right,
        Self::Left,
        Self::Top,
        Self::Bottom,
        Self::Front,
        Self::Back,
    ];

    /// Text printed on the face.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Right => "RIGHT",
            Self::Left => "LEFT",
            Self::Top => "TOP",
            Self::Bottom => "BOTTOM",
            Self::Front => "FRONT",
            Self::Back => "BACK",
        }
    }

    /// Outward unit normal.
    #[must_use]
    pub fn axis(self) -> Vec3 {
        match self {
            Self::Right => Vec3::X,
            Self::Left => Vec3::NEG_X,
            Self::Top => Vec3::Y,
            Self::Bottom => Vec3::NEG_Y,
            Self::Front => Vec3::Z,
            Self::Back => Vec3::NEG_Z,
        }
    }

    /// Position in [`CubeFace::ALL`] (and texture layer).
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`CubeFace::index`].
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Face for an offset from the cube center: the first non-zero
    /// component, checked in x, y, z order, picks the axis and its sign
    /// picks the side.
    #[must_use]
    pub fn from_offset(offset: Vec3) -> Option<Self> {
        if offset.x != 0.0 {
            Some(if offset.x < 0.0 { Self::Left } else { Self::Right })
        } else if offset.y != 0.0 {
            Some(if offset.y < 0.0 { Self::Bottom } else { Self::Top })
        } else if offset.z != 0.0 {
            Some(if offset.z < 0.0 { Self::Back } else { Self::Front })
        } else {
            None
        }
    }
}

impl fmt::Display for CubeFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trip() {
        for (i, face) in CubeFace::ALL.iter().enumerate() {
            assert_eq!(face.index(), i);
            assert_eq!(CubeFace::from_index(i), Some(*face));
        }
        assert_eq!(CubeFace::from_index(6), None);
    }

    #[test]
    fn axis_identifies_face() {
        for face in CubeFace::ALL {
            assert_eq!(CubeFace::from_offset(face.axis() * 0.51), Some(face));
        }
        assert_eq!(CubeFace::from_offset(Vec3::ZERO), None);
    }

    #[test]
    fn x_component_wins() {
        assert_eq!(
            CubeFace::from_offset(Vec3::new(-0.1, 0.9, 0.9)),
            Some(CubeFace::Left)
        );
        assert_eq!(
            CubeFace::from_offset(Vec3::new(0.0, 0.2, -0.9)),
            Some(CubeFace::Top)
        );
    }

    #[test]
    fn labels() {
        let labels: Vec<_> = CubeFace::ALL.iter().map(|f| f.label()).collect();
        assert_eq!(labels, ["RIGHT", "LEFT", "TOP", "BOTTOM", "FRONT", "BACK"]);
        assert_eq!(CubeFace::Front.to_string(), "FRONT");
    }
}
