//! Procedural terrain generation.

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use serde::{Deserialize, Serialize};
use voxcraft_core::{BlockType, ChunkCoord, WorldConfig};

use crate::WorldSeed;

/// Supplies the block at every voxel of a chunk being generated.
///
/// Called from worker threads, once per voxel. Implementations must be
/// deterministic for a given chunk coordinate and `(i, j, k)`.
pub trait BlockSource: Send + Sync {
    /// Block at vertical `i` and horizontal `(j, k)` of chunk `coord`.
    fn block_at(&self, coord: ChunkCoord, i: usize, j: usize, k: usize) -> BlockType;
}

impl<F> BlockSource for F
where
    F: Fn(ChunkCoord, usize, usize, usize) -> BlockType + Send + Sync,
{
    #[inline]
    fn block_at(&self, coord: ChunkCoord, i: usize, j: usize, k: usize) -> BlockType {
        self(coord, i, j, k)
    }
}

/// Terrain generator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Seed for noise generation.
    pub seed: WorldSeed,
    /// Lowest surface height, in voxels above the column bottom.
    pub sea_level: i32,
    /// Horizontal scale of terrain features, in voxels.
    pub terrain_scale: f64,
    /// Maximum terrain height variation.
    pub terrain_height: f64,
    /// Number of noise octaves for detail.
    pub octaves: usize,
    /// Frequency multiplier between octaves.
    pub lacunarity: f64,
    /// Amplitude multiplier between octaves.
    pub persistence: f64,
    /// Depth of dirt layer below surface.
    pub dirt_depth: u32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            sea_level: 64,
            terrain_scale: 100.0,
            terrain_height: 64.0,
            octaves: 4,
            lacunarity: 2.0,
            persistence: 0.5,
            dirt_depth: 4,
        }
    }
}

/// Procedural terrain generator using fractal noise.
pub struct TerrainGenerator {
    config: TerrainConfig,
    side_width: usize,
    height_noise: Fbm<Perlin>,
}

impl TerrainGenerator {
    /// Create a generator for chunks shaped like `world`.
    pub fn new(config: TerrainConfig, world: &WorldConfig) -> Self {
        let height_noise = Fbm::<Perlin>::new(config.seed as u32)
            .set_octaves(config.octaves)
            .set_lacunarity(config.lacunarity)
            .set_persistence(config.persistence);

        Self {
            config,
            side_width: world.side_width,
            height_noise,
        }
    }

    /// Create a terrain generator with default configuration.
    pub fn with_seed(seed: WorldSeed) -> Self {
        Self::new(
            TerrainConfig {
                seed,
                ..Default::default()
            },
            &WorldConfig::default(),
        )
    }

    /// Get the terrain configuration.
    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Surface height at a global voxel column.
    pub fn height_at(&self, world_x: i64, world_y: i64) -> i32 {
        let nx = world_x as f64 / self.config.terrain_scale;
        let ny = world_y as f64 / self.config.terrain_scale;

        // Noise returns [-1, 1], map to [0, terrain_height] and add sea_level
        let noise_value = self.height_noise.get([nx, ny]);
        ((noise_value + 1.0) * 0.5 * self.config.terrain_height) as i32 + self.config.sea_level
    }

    /// Determine block type at a given height relative to surface height.
    fn block_at_depth(&self, height: i32, surface_height: i32) -> BlockType {
        if height > surface_height {
            BlockType::Air
        } else if height == surface_height {
            BlockType::Grass
        } else if height > surface_height - self.config.dirt_depth as i32 {
            BlockType::Dirt
        } else {
            BlockType::Stone
        }
    }
}

impl BlockSource for TerrainGenerator {
    fn block_at(&self, coord: ChunkCoord, i: usize, j: usize, k: usize) -> BlockType {
        let side = self.side_width as i64;
        // k runs along world X, j along world Y.
        let world_x = coord.x as i64 * side + k as i64;
        let world_y = coord.y as i64 * side + j as i64;
        let surface = self.height_at(world_x, world_y);
        self.block_at_depth(i as i32, surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// First air voxel in a column, scanning up from the bottom.
    fn column_top(gen: &TerrainGenerator, coord: ChunkCoord, j: usize, k: usize) -> usize {
        let height = WorldConfig::default().column_height();
        (0..height)
            .find(|&i| gen.block_at(coord, i, j, k).is_air())
            .unwrap_or(height)
    }

    #[test]
    fn same_seed_same_columns() {
        let a = TerrainGenerator::with_seed(12345);
        let b = TerrainGenerator::with_seed(12345);

        for coord in [ChunkCoord::new(0, 0), ChunkCoord::new(-3, 5), ChunkCoord::new(40, -40)] {
            for (j, k) in [(0, 0), (7, 3), (15, 15)] {
                let column_a: Vec<_> = (0..256).map(|i| a.block_at(coord, i, j, k)).collect();
                let column_b: Vec<_> = (0..256).map(|i| b.block_at(coord, i, j, k)).collect();
                assert_eq!(column_a, column_b, "column {j},{k} of {coord:?}");
            }
        }
    }

    #[test]
    fn seed_changes_surface() {
        let a = TerrainGenerator::with_seed(12345);
        let b = TerrainGenerator::with_seed(54321);

        let mut differences = 0;
        for x in 0..10 {
            for y in 0..10 {
                let coord = ChunkCoord::new(x, y);
                if column_top(&a, coord, 3, 11) != column_top(&b, coord, 3, 11) {
                    differences += 1;
                }
            }
        }
        assert!(differences > 50, "only {differences} of 100 columns differ");
    }

    #[test]
    fn column_layers() {
        let gen = TerrainGenerator::with_seed(42);
        let coord = ChunkCoord::new(3, -2);
        let surface = gen.height_at(3 * 16 + 5, -2 * 16 + 7) as usize;

        assert_eq!(gen.block_at(coord, surface + 1, 7, 5), BlockType::Air);
        assert_eq!(gen.block_at(coord, surface, 7, 5), BlockType::Grass);
        assert_eq!(gen.block_at(coord, surface - 1, 7, 5), BlockType::Dirt);
        assert_eq!(gen.block_at(coord, 0, 7, 5), BlockType::Stone);
    }

    #[test]
    fn surface_stays_inside_default_column() {
        let gen = TerrainGenerator::with_seed(7);
        let height = WorldConfig::default().column_height() as i32;
        for x in -50..50 {
            let h = gen.height_at(x * 13, x * 5);
            assert!(h > 0 && h < height, "surface {h} out of column");
        }
    }

    #[test]
    fn closures_are_block_sources() {
        let flat = |_: ChunkCoord, i: usize, _: usize, _: usize| {
            if i < 2 {
                BlockType::Stone
            } else {
                BlockType::Air
            }
        };
        assert_eq!(flat.block_at(ChunkCoord::new(0, 0), 1, 0, 0), BlockType::Stone);
        assert_eq!(flat.block_at(ChunkCoord::new(0, 0), 2, 0, 0), BlockType::Air);
    }
}
