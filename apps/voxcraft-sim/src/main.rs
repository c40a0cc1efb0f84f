//! voxcraft headless simulation
//!
//! Walks an observer across procedurally generated terrain, streaming chunks
//! in around it and placing a block every so often, with a renderer that only
//! keeps statistics.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p voxcraft-sim -- [OPTIONS]
//! ```
//!
//! Run with `--help` for the option list.
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Set log level (e.g., info, debug, trace)

mod params;
mod stats;

use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::Vec3;
use tracing::info;
use tracing_subscriber::EnvFilter;
use voxcraft_core::{BlockType, WorldConfig};
use voxcraft_world::{
    BlockSource, ChunkStore, StreamingScheduler, TerrainConfig, TerrainGenerator,
};

use crate::params::{print_help, SimParams};
use crate::stats::StatsRenderer;

/// Ticks between sample edits.
const EDIT_INTERVAL: u32 = 60;
/// Frame pacing for the walk.
const TICK: Duration = Duration::from_millis(16);

fn main() -> anyhow::Result<()> {
    let params = SimParams::from_args();
    if params.help {
        print_help();
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let world = WorldConfig::default();
    let generator = Arc::new(TerrainGenerator::new(
        TerrainConfig {
            seed: params.seed,
            ..Default::default()
        },
        &world,
    ));
    let source: Arc<dyn BlockSource> = generator.clone();
    let store = Arc::new(ChunkStore::new());
    let mut scheduler = StreamingScheduler::new(
        params.streaming_config(),
        world.clone(),
        Arc::clone(&store),
        source,
    )?;
    let mut renderer = StatsRenderer::new(world.clone());

    info!(
        seed = params.seed,
        ticks = params.ticks,
        render_distance = params.render_distance,
        "Starting simulation"
    );

    // Build the chunk under the observer before the first frame.
    let mut observer = Vec3::new(
        world.chunk_world_size() * 0.5,
        world.chunk_world_size() * 0.5,
        0.0,
    );
    scheduler.load_blocking(scheduler.chunk_at(observer));

    let started = Instant::now();
    let mut edits = 0usize;
    for tick in 0..params.ticks {
        let frame_start = Instant::now();
        let report = scheduler.tick(observer, &mut renderer);
        if report.center_changed {
            info!(
                center = ?report.center,
                requested = report.requested,
                unloaded = report.unloaded.len(),
                "Observer crossed chunk border"
            );
        }

        if tick % EDIT_INTERVAL == 0 && place_marker(&scheduler, &generator, observer, &mut renderer)
        {
            edits += 1;
        }

        observer.x += params.speed;
        if let Some(rest) = TICK.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    info!(
        elapsed = ?started.elapsed(),
        resident = store.resident_count(),
        pending = store.pending_count(),
        in_flight = scheduler.in_flight_count(),
        live_chunks = renderer.live_chunks(),
        live_faces = renderer.live_faces(),
        live_bytes = renderer.live_bytes(),
        sections_created = renderer.sections_created,
        sections_replaced = renderer.sections_replaced,
        chunks_removed = renderer.chunks_removed,
        edits,
        "Simulation finished"
    );
    Ok(())
}

/// Place a wood block on the surface under the observer.
///
/// Returns `true` if the chunk was resident and the edit applied.
fn place_marker(
    scheduler: &StreamingScheduler,
    generator: &TerrainGenerator,
    observer: Vec3,
    renderer: &mut StatsRenderer,
) -> bool {
    let world = scheduler.world();
    let coord = scheduler.chunk_at(observer);
    let block_size = world.block_size;

    let local = observer - coord.world_origin(world);
    let world_x = (observer.x / block_size).floor() as i64;
    let world_y = (observer.y / block_size).floor() as i64;
    let surface = generator.height_at(world_x, world_y);
    let point = Vec3::new(local.x, local.y, (surface + 1) as f32 * block_size);

    let settings = scheduler.mesh_settings();
    let outcome = scheduler
        .store()
        .with_chunk_mut(coord, |chunk| {
            chunk.add_voxel(point, BlockType::Wood, settings, renderer)
        });

    match outcome {
        Some(outcome) => {
            info!(?coord, ?point, ?outcome, "Placed marker");
            outcome.is_applied()
        }
        None => {
            tracing::debug!(?coord, "Marker skipped, chunk not resident yet");
            false
        }
    }
}
