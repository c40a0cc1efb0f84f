//! Chunk streaming around a moving observer.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, Sender, TryRecvError};
use glam::Vec3;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use voxcraft_core::{ChunkCoord, CoreError, WorldConfig};
use voxcraft_mesh::{mesh_chunk, MeshBuffer, MeshSettings};
use voxcraft_voxel::VoxelGrid;

use crate::chunk::Chunk;
use crate::chunk_store::ChunkStore;
use crate::error::Result;
use crate::generation::BlockSource;
use crate::render::SectionRenderer;

/// Order in which the square around a new center is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoadOrder {
    /// Row by row: `x` outer, `y` inner, both ascending.
    Raster,
    /// Closest to the center first; ties keep raster order.
    #[default]
    NearestFirst,
}

/// Configuration for chunk streaming behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Chunks loaded in each direction around the center.
    pub render_distance: i32,
    /// Resident chunks farther than this (Chebyshev) are unloaded. `None` keeps everything.
    pub unload_radius: Option<i32>,
    /// Threads in the chunk worker pool.
    pub worker_threads: usize,
    /// Finished chunks installed per tick.
    pub max_completions_per_tick: usize,
    pub load_order: LoadOrder,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            render_distance: 10,
            unload_radius: None,
            worker_threads: std::thread::available_parallelism().map_or(4, |n| n.get()),
            max_completions_per_tick: 1,
            load_order: LoadOrder::NearestFirst,
        }
    }
}

impl StreamingConfig {
    pub fn with_render_distance(mut self, render_distance: i32) -> Self {
        self.render_distance = render_distance;
        self
    }

    pub fn with_unload_radius(mut self, unload_radius: Option<i32>) -> Self {
        self.unload_radius = unload_radius;
        self
    }

    pub fn with_worker_threads(mut self, worker_threads: usize) -> Self {
        self.worker_threads = worker_threads;
        self
    }

    pub fn with_max_completions_per_tick(mut self, max: usize) -> Self {
        self.max_completions_per_tick = max;
        self
    }

    pub fn with_load_order(mut self, load_order: LoadOrder) -> Self {
        self.load_order = load_order;
        self
    }

    /// Number of chunks requested around each new center.
    pub fn square_len(&self) -> usize {
        let edge = (2 * self.render_distance.max(0) + 1) as usize;
        edge * edge
    }

    /// Reject configurations the scheduler cannot run with.
    pub fn validate(&self) -> voxcraft_core::Result<()> {
        if self.render_distance < 0 {
            return Err(CoreError::InvalidConfig(format!(
                "render_distance must be >= 0, got {}",
                self.render_distance
            )));
        }
        if let Some(unload) = self.unload_radius {
            if unload < self.render_distance {
                return Err(CoreError::InvalidConfig(format!(
                    "unload_radius {unload} is inside render_distance {}",
                    self.render_distance
                )));
            }
        }
        if self.worker_threads == 0 {
            return Err(CoreError::InvalidConfig("worker_threads must be > 0".into()));
        }
        if self.max_completions_per_tick == 0 {
            return Err(CoreError::InvalidConfig(
                "max_completions_per_tick must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// Priority entry for the nearest-first load queue.
#[derive(Debug, Clone, Copy)]
struct LoadPriority {
    coord: ChunkCoord,
    /// Squared distance to the center (lower = higher priority).
    distance_sq: i64,
    /// Raster position, breaks distance ties.
    sequence: usize,
}

impl PartialEq for LoadPriority {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LoadPriority {}

impl PartialOrd for LoadPriority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LoadPriority {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (closer chunks have higher priority)
        other
            .distance_sq
            .cmp(&self.distance_sq)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// A chunk built off the main thread, ready to install.
pub struct ChunkBuildResult {
    pub coord: ChunkCoord,
    pub grid: VoxelGrid,
    /// One mesh per section, in section order.
    pub sections: Vec<MeshBuffer>,
    /// Time spent generating and meshing.
    pub build_time: Duration,
}

impl std::fmt::Debug for ChunkBuildResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkBuildResult")
            .field("coord", &self.coord)
            .field("sections", &self.sections.len())
            .field("faces", &self.face_count())
            .field("build_time", &self.build_time)
            .field("grid", &"<VoxelGrid>")
            .finish()
    }
}

impl ChunkBuildResult {
    /// Faces across all sections.
    pub fn face_count(&self) -> usize {
        self.sections.iter().map(MeshBuffer::face_count).sum()
    }
}

/// Generate a chunk's grid and mesh every section.
#[cfg_attr(
    feature = "profiling-tracy",
    tracing::instrument(level = "trace", skip_all)
)]
pub fn build_chunk(
    coord: ChunkCoord,
    world: &WorldConfig,
    source: &dyn BlockSource,
    settings: &MeshSettings,
) -> ChunkBuildResult {
    let started = Instant::now();
    let grid = VoxelGrid::generate(world.side_width, world.section_count, |i, j, k| {
        source.block_at(coord, i, j, k)
    });
    let sections = mesh_chunk(&grid, settings);

    ChunkBuildResult {
        coord,
        grid,
        sections,
        build_time: started.elapsed(),
    }
}

/// What one [`StreamingScheduler::tick`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Chunk containing the observer.
    pub center: ChunkCoord,
    /// Whether the center moved since the previous tick.
    pub center_changed: bool,
    /// Loads started this tick.
    pub requested: usize,
    /// Chunks installed this tick, in completion order.
    pub installed: Vec<ChunkCoord>,
    /// Chunks unloaded this tick.
    pub unloaded: Vec<ChunkCoord>,
}

/// Requests, builds and installs chunks around an observer.
///
/// Builds run on a rayon pool and report back over a channel; only `tick`
/// touches the renderer, and it never blocks.
pub struct StreamingScheduler {
    config: StreamingConfig,
    world: WorldConfig,
    mesh_settings: Arc<MeshSettings>,
    store: Arc<ChunkStore>,
    source: Arc<dyn BlockSource>,
    pool: rayon::ThreadPool,
    result_tx: Sender<ChunkBuildResult>,
    result_rx: Receiver<ChunkBuildResult>,
    /// Coordinates whose build result has not been installed yet.
    in_flight: HashSet<ChunkCoord>,
    last_center: Option<ChunkCoord>,
}

impl StreamingScheduler {
    /// Create a scheduler and its worker pool.
    pub fn new(
        config: StreamingConfig,
        world: WorldConfig,
        store: Arc<ChunkStore>,
        source: Arc<dyn BlockSource>,
    ) -> Result<Self> {
        config.validate()?;
        world.validate()?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_threads)
            .thread_name(|n| format!("chunk-worker-{n}"))
            .panic_handler(|_| tracing::error!("Chunk worker panicked; its chunk stays pending"))
            .build()?;
        let (result_tx, result_rx) = channel::unbounded();

        tracing::info!(
            render_distance = config.render_distance,
            workers = config.worker_threads,
            load_order = ?config.load_order,
            "Chunk streaming started"
        );

        Ok(Self {
            mesh_settings: Arc::new(MeshSettings::from_config(&world)),
            config,
            world,
            store,
            source,
            pool,
            result_tx,
            result_rx,
            in_flight: HashSet::new(),
            last_center: None,
        })
    }

    /// Get the streaming configuration.
    pub fn config(&self) -> &StreamingConfig {
        &self.config
    }

    pub fn world(&self) -> &WorldConfig {
        &self.world
    }

    /// Settings used for every mesh this scheduler builds.
    pub fn mesh_settings(&self) -> &MeshSettings {
        &self.mesh_settings
    }

    /// Shared chunk store.
    pub fn store(&self) -> &Arc<ChunkStore> {
        &self.store
    }

    /// Center used by the last tick, if any.
    pub fn last_center(&self) -> Option<ChunkCoord> {
        self.last_center
    }

    /// Get the number of chunks requested but not installed yet.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Chunk containing a world-space point.
    pub fn chunk_at(&self, pos: Vec3) -> ChunkCoord {
        ChunkCoord::from_world(pos, self.world.chunk_world_size())
    }

    /// Advance streaming by one frame.
    ///
    /// Requests the square around the observer's chunk when it changes,
    /// unloads chunks past `unload_radius`, then installs at most
    /// `max_completions_per_tick` finished chunks.
    #[cfg_attr(
        feature = "profiling-tracy",
        tracing::instrument(level = "trace", skip_all)
    )]
    pub fn tick<R>(&mut self, observer: Vec3, renderer: &mut R) -> TickReport
    where
        R: SectionRenderer + ?Sized,
    {
        let center = self.chunk_at(observer);
        let mut report = TickReport {
            center,
            ..TickReport::default()
        };

        if self.last_center != Some(center) {
            tracing::debug!(?center, previous = ?self.last_center, "Observer entered chunk");
            report.center_changed = true;
            report.requested = self.request_around(center);
            report.unloaded = self.unload_outside(center, renderer);
            self.last_center = Some(center);
        }

        report.installed = self.install_completed(renderer);
        report
    }

    /// Coordinates of the square around `center`, in request order.
    ///
    /// Neighbors past the `i32` range are left out.
    pub fn wanted_coords(&self, center: ChunkCoord) -> Vec<ChunkCoord> {
        let r = self.config.render_distance;
        let raster =
            (-r..=r).flat_map(move |dx| (-r..=r).filter_map(move |dy| center.offset(dx, dy)));

        match self.config.load_order {
            LoadOrder::Raster => raster.collect(),
            LoadOrder::NearestFirst => {
                let mut queue: BinaryHeap<LoadPriority> = raster
                    .enumerate()
                    .map(|(sequence, coord)| LoadPriority {
                        coord,
                        distance_sq: coord.distance_sq(center),
                        sequence,
                    })
                    .collect();

                let mut ordered = Vec::with_capacity(queue.len());
                while let Some(entry) = queue.pop() {
                    ordered.push(entry.coord);
                }
                ordered
            }
        }
    }

    /// Start a load for every absent chunk around `center`.
    fn request_around(&mut self, center: ChunkCoord) -> usize {
        let mut requested = 0;
        for coord in self.wanted_coords(center) {
            if self.store.try_begin_load(coord) {
                self.spawn_build(coord);
                requested += 1;
            }
        }
        if requested > 0 {
            tracing::debug!(?center, requested, "Requested chunk loads");
        }
        requested
    }

    fn spawn_build(&mut self, coord: ChunkCoord) {
        self.in_flight.insert(coord);

        let world = self.world.clone();
        let settings = Arc::clone(&self.mesh_settings);
        let source = Arc::clone(&self.source);
        let tx = self.result_tx.clone();

        self.pool.spawn(move || {
            let result = build_chunk(coord, &world, source.as_ref(), &settings);
            if tx.send(result).is_err() {
                tracing::debug!(?coord, "Scheduler gone, dropping built chunk");
            }
        });
    }

    /// Build one chunk on the calling thread.
    ///
    /// The result goes through the completion channel like any other, so it
    /// is installed by a later [`tick`](Self::tick). Returns `false` if the
    /// chunk was already pending or resident.
    pub fn load_blocking(&mut self, coord: ChunkCoord) -> bool {
        if !self.store.try_begin_load(coord) {
            return false;
        }
        self.in_flight.insert(coord);

        let result = build_chunk(coord, &self.world, self.source.as_ref(), &self.mesh_settings);
        tracing::debug!(?coord, build_time = ?result.build_time, "Built chunk synchronously");
        if self.result_tx.send(result).is_err() {
            tracing::debug!(?coord, "Completion channel closed, dropping built chunk");
        }
        true
    }

    fn unload_outside<R>(&mut self, center: ChunkCoord, renderer: &mut R) -> Vec<ChunkCoord>
    where
        R: SectionRenderer + ?Sized,
    {
        let Some(radius) = self.config.unload_radius else {
            return Vec::new();
        };

        let mut unloaded: Vec<ChunkCoord> = self
            .store
            .resident_coords()
            .into_iter()
            .filter(|coord| coord.ring_distance(center) > i64::from(radius))
            .collect();
        unloaded.sort_unstable();
        unloaded.retain(|&coord| {
            let removed = self.store.unload(coord).is_some();
            if removed {
                renderer.remove_chunk(coord);
            }
            removed
        });

        if !unloaded.is_empty() {
            tracing::debug!(?center, count = unloaded.len(), "Unloaded distant chunks");
        }
        unloaded
    }

    fn install_completed<R>(&mut self, renderer: &mut R) -> Vec<ChunkCoord>
    where
        R: SectionRenderer + ?Sized,
    {
        let mut installed = Vec::new();

        while installed.len() < self.config.max_completions_per_tick {
            let result = match self.result_rx.try_recv() {
                Ok(result) => result,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            };
            let faces = result.face_count();
            let ChunkBuildResult {
                coord,
                grid,
                sections,
                build_time,
            } = result;

            self.in_flight.remove(&coord);
            let latency = self.store.complete_load(coord, Chunk::new(coord, grid));
            let section_count = sections.len();
            for (index, mesh) in sections.into_iter().enumerate() {
                renderer.create_section(coord, index, mesh);
            }

            tracing::info!(
                ?coord,
                sections = section_count,
                faces,
                ?build_time,
                ?latency,
                "Installed chunk"
            );
            installed.push(coord);
        }

        installed
    }
}
