//! Chunk coordinates and their packed map keys.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::WorldConfig;
use crate::error::CoreError;

/// Bias added to each axis before packing (2^15).
const KEY_BIAS: i64 = 1 << 15;

/// Column coordinate of a chunk on the horizontal plane.
///
/// `x` follows world X and `y` follows world Y; world Z is up and is not
/// part of the coordinate because a chunk spans the full column height.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoord {
    /// Smallest packable axis value.
    pub const MIN_AXIS: i32 = -(1 << 15);
    /// Largest packable axis value.
    pub const MAX_AXIS: i32 = (1 << 15) - 1;

    /// Create a new chunk coordinate
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chunk containing a world-space point (floor division on X and Y).
    #[inline]
    pub fn from_world(pos: Vec3, chunk_world_size: f32) -> Self {
        Self::new(
            (pos.x / chunk_world_size).floor() as i32,
            (pos.y / chunk_world_size).floor() as i32,
        )
    }

    /// Coordinate shifted by the given deltas, `None` if an axis overflows.
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        match (self.x.checked_add(dx), self.y.checked_add(dy)) {
            (Some(x), Some(y)) => Some(Self::new(x, y)),
            _ => None,
        }
    }

    /// Squared distance in chunk units.
    #[inline]
    pub const fn distance_sq(self, other: Self) -> i64 {
        let dx = (self.x as i64) - (other.x as i64);
        let dy = (self.y as i64) - (other.y as i64);
        dx * dx + dy * dy
    }

    /// Chebyshev distance, i.e. the ring this coordinate sits on around `other`.
    #[inline]
    pub const fn ring_distance(self, other: Self) -> i64 {
        let dx = ((self.x as i64) - (other.x as i64)).abs();
        let dy = ((self.y as i64) - (other.y as i64)).abs();
        if dx > dy {
            dx
        } else {
            dy
        }
    }

    /// Whether both axes fit the packed key encoding.
    #[inline]
    pub const fn is_packable(self) -> bool {
        self.x >= Self::MIN_AXIS
            && self.x <= Self::MAX_AXIS
            && self.y >= Self::MIN_AXIS
            && self.y <= Self::MAX_AXIS
    }

    /// World-space placement of the chunk's corner.
    #[inline]
    pub fn world_origin(self, config: &WorldConfig) -> Vec3 {
        let size = config.chunk_world_size();
        Vec3::new(
            self.x as f32 * size,
            self.y as f32 * size,
            config.base_elevation,
        )
    }
}

/// A chunk coordinate packed into 32 bits.
///
/// Each axis is biased by 2^15 and stored in its own 16-bit half, `x` high and
/// `y` low. Only coordinates in `[-32768, 32767]` can be packed; anything else
/// is rejected by [`ChunkKey::try_from`] instead of wrapping into another key.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[repr(transparent)]
pub struct ChunkKey(u32);

impl ChunkKey {
    /// Raw packed value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Unpack back into a chunk coordinate.
    #[inline]
    pub const fn coord(self) -> ChunkCoord {
        let x = ((self.0 >> 16) as i64 - KEY_BIAS) as i32;
        let y = ((self.0 & 0xFFFF) as i64 - KEY_BIAS) as i32;
        ChunkCoord::new(x, y)
    }
}

impl TryFrom<ChunkCoord> for ChunkKey {
    type Error = CoreError;

    fn try_from(coord: ChunkCoord) -> Result<Self, Self::Error> {
        if !coord.is_packable() {
            return Err(CoreError::CoordOutOfRange {
                x: coord.x,
                y: coord.y,
            });
        }
        let hi = (coord.x as i64 + KEY_BIAS) as u32;
        let lo = (coord.y as i64 + KEY_BIAS) as u32;
        Ok(Self((hi << 16) | lo))
    }
}

impl From<ChunkKey> for ChunkCoord {
    fn from(key: ChunkKey) -> Self {
        key.coord()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_roundtrip() {
        for x in [-32768, -1601, -1, 0, 1, 17, 32767] {
            for y in [-32768, -5, 0, 3, 32767] {
                let coord = ChunkCoord::new(x, y);
                let key = ChunkKey::try_from(coord).unwrap();
                assert_eq!(key.coord(), coord);
            }
        }
    }

    #[test]
    fn key_layout() {
        let key = ChunkKey::try_from(ChunkCoord::new(0, 0)).unwrap();
        assert_eq!(key.raw(), 0x8000_8000);

        let key = ChunkKey::try_from(ChunkCoord::new(-32768, 32767)).unwrap();
        assert_eq!(key.raw(), 0x0000_FFFF);
    }

    #[test]
    fn key_rejects_out_of_range() {
        assert_eq!(
            ChunkKey::try_from(ChunkCoord::new(32768, 0)),
            Err(CoreError::CoordOutOfRange { x: 32768, y: 0 })
        );
        assert!(ChunkKey::try_from(ChunkCoord::new(0, -32769)).is_err());
    }

    #[test]
    fn distinct_coords_distinct_keys() {
        let a = ChunkKey::try_from(ChunkCoord::new(1, 0)).unwrap();
        let b = ChunkKey::try_from(ChunkCoord::new(0, 1)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn world_to_chunk_floors() {
        // (1000,1000) -> (0,0); (-1000,-1000) -> (-1,-1); (-1601,-1601) -> (-2,-2); (1601,1601) -> (1,1)
        let size = 1600.0;
        assert_eq!(
            ChunkCoord::from_world(Vec3::new(1000.0, 1000.0, 50.0), size),
            ChunkCoord::new(0, 0)
        );
        assert_eq!(
            ChunkCoord::from_world(Vec3::new(-1000.0, -1000.0, 0.0), size),
            ChunkCoord::new(-1, -1)
        );
        assert_eq!(
            ChunkCoord::from_world(Vec3::new(-1601.0, -1601.0, 0.0), size),
            ChunkCoord::new(-2, -2)
        );
        assert_eq!(
            ChunkCoord::from_world(Vec3::new(1601.0, 1601.0, 0.0), size),
            ChunkCoord::new(1, 1)
        );
    }

    #[test]
    fn world_origin_uses_config() {
        let config = WorldConfig::default();
        let origin = ChunkCoord::new(2, -1).world_origin(&config);
        assert_eq!(origin, Vec3::new(3200.0, -1600.0, -1000.0));
    }

    #[test]
    fn ring_and_distance() {
        let c = ChunkCoord::new(0, 0);
        assert_eq!(ChunkCoord::new(3, -2).ring_distance(c), 3);
        assert_eq!(ChunkCoord::new(3, -2).distance_sq(c), 13);
    }

    #[test]
    fn extreme_coordinates_do_not_overflow() {
        let max = ChunkCoord::new(i32::MAX, i32::MIN);
        assert_eq!(max.offset(1, 0), None);
        assert_eq!(max.offset(0, -1), None);
        assert_eq!(max.offset(-1, 1), Some(ChunkCoord::new(i32::MAX - 1, i32::MIN + 1)));

        let far = ChunkCoord::new(i32::MIN, i32::MAX);
        assert_eq!(max.ring_distance(far), i64::from(u32::MAX));
        // An observer past f32 -> i32 range saturates instead of wrapping.
        assert_eq!(
            ChunkCoord::from_world(Vec3::new(1.0e12, -1.0e12, 0.0), 1600.0),
            ChunkCoord::new(i32::MAX, i32::MIN)
        );
    }
}
