//! The six face directions and their per-face geometry tables.

use glam::{Vec2, Vec3};

/// Axis-aligned face direction. World Z is up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
    Forward = 4,
    Back = 5,
}

/// Which atlas tile of a block a face samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceTile {
    Top,
    Side,
    Bottom,
}

/// Unit-cube corners of each face, in vertex order.
const CORNERS: [[Vec3; 4]; 6] = [
    [
        Vec3::new(1.0, 0.0, 1.0),
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(0.0, 1.0, 1.0),
    ],
    [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
    ],
    [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(0.0, 1.0, 1.0),
    ],
    [
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(1.0, 0.0, 1.0),
    ],
    [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 1.0),
    ],
    [
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(0.0, 1.0, 1.0),
        Vec3::new(1.0, 1.0, 1.0),
    ],
];

/// Per-face unit-quad UVs, flipped for a V-down texture convention.
const UV_CORNERS: [[Vec2; 4]; 6] = [
    [
        Vec2::new(0.0, 1.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
    ],
    [
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(0.0, 0.0),
    ],
    [
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(0.0, 0.0),
    ],
    [
        Vec2::new(0.0, 1.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
    ],
    [
        Vec2::new(1.0, 1.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(0.0, 1.0),
        Vec2::new(0.0, 0.0),
    ],
    [
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(0.0, 0.0),
    ],
];

impl Direction {
    /// All directions in emission order.
    pub const ALL: [Self; 6] = [
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
        Self::Forward,
        Self::Back,
    ];

    /// Outward face normal.
    #[inline]
    pub const fn normal(self) -> Vec3 {
        match self {
            Self::Up => Vec3::Z,
            Self::Down => Vec3::NEG_Z,
            Self::Left => Vec3::NEG_X,
            Self::Right => Vec3::X,
            Self::Forward => Vec3::NEG_Y,
            Self::Back => Vec3::Y,
        }
    }

    /// Grid step `(di, dj, dk)` to the neighbor across this face.
    ///
    /// `i` follows world Z, `j` world Y and `k` world X.
    #[inline]
    pub const fn grid_offset(self) -> (i64, i64, i64) {
        match self {
            Self::Up => (1, 0, 0),
            Self::Down => (-1, 0, 0),
            Self::Left => (0, 0, -1),
            Self::Right => (0, 0, 1),
            Self::Forward => (0, -1, 0),
            Self::Back => (0, 1, 0),
        }
    }

    /// Tangent shared by all four vertices of the face.
    #[inline]
    pub const fn tangent(self) -> Vec3 {
        match self {
            Self::Up | Self::Down => Vec3::X,
            Self::Left | Self::Right | Self::Forward | Self::Back => Vec3::Z,
        }
    }

    /// Atlas tile the face samples.
    #[inline]
    pub const fn tile(self) -> FaceTile {
        match self {
            Self::Up => FaceTile::Top,
            Self::Down => FaceTile::Bottom,
            Self::Left | Self::Right | Self::Forward | Self::Back => FaceTile::Side,
        }
    }

    /// Unit-cube corners of the face.
    #[inline]
    pub const fn corners(self) -> &'static [Vec3; 4] {
        &CORNERS[self as usize]
    }

    /// Unit-quad UVs of the face, before atlas scaling.
    #[inline]
    pub const fn uv_corners(self) -> &'static [Vec2; 4] {
        &UV_CORNERS[self as usize]
    }
}
