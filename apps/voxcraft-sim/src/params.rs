//! Command-line parameters.

use voxcraft_world::{LoadOrder, StreamingConfig, WorldSeed};

/// Simulation parameters parsed from command line.
#[derive(Debug, Clone, PartialEq)]
pub struct SimParams {
    pub render_distance: i32,
    pub seed: WorldSeed,
    /// Ticks to run before exiting.
    pub ticks: u32,
    /// Observer speed along +X, in world units per tick.
    pub speed: f32,
    /// Worker threads; `None` uses the streaming default.
    pub workers: Option<usize>,
    pub load_order: LoadOrder,
    pub help: bool,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            render_distance: 10,
            seed: 42,
            ticks: 600,
            speed: 50.0,
            workers: None,
            load_order: LoadOrder::NearestFirst,
            help: false,
        }
    }
}

impl SimParams {
    /// Parse from command line arguments.
    pub fn from_args() -> Self {
        Self::parse(std::env::args().skip(1))
    }

    /// Parse from an argument list without the program name.
    ///
    /// Unknown flags and unparsable values are ignored.
    pub fn parse<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut params = Self::default();
        let args: Vec<String> = args.into_iter().collect();

        let mut i = 0;
        while i < args.len() {
            let value = args.get(i + 1).map(String::as_str);
            let consumed = match args[i].as_str() {
                "--render-distance" => parse_into(value, &mut params.render_distance),
                "--seed" => parse_into(value, &mut params.seed),
                "--ticks" => parse_into(value, &mut params.ticks),
                "--speed" => parse_into(value, &mut params.speed),
                "--workers" => {
                    let mut workers = 0;
                    let consumed = parse_into(value, &mut workers);
                    if consumed {
                        params.workers = Some(workers);
                    }
                    consumed
                }
                "--raster" => {
                    params.load_order = LoadOrder::Raster;
                    false
                }
                "-h" | "--help" => {
                    params.help = true;
                    false
                }
                _ => false,
            };
            i += if consumed { 2 } else { 1 };
        }

        params
    }

    /// Streaming configuration for these parameters.
    pub fn streaming_config(&self) -> StreamingConfig {
        let config = StreamingConfig::default()
            .with_render_distance(self.render_distance)
            .with_load_order(self.load_order);
        match self.workers {
            Some(workers) => config.with_worker_threads(workers),
            None => config,
        }
    }
}

fn parse_into<T: std::str::FromStr>(value: Option<&str>, slot: &mut T) -> bool {
    match value.map(str::parse) {
        Some(Ok(v)) => {
            *slot = v;
            true
        }
        _ => false,
    }
}

pub fn print_help() {
    eprintln!(
        "voxcraft headless streaming simulation

USAGE:
    cargo run -p voxcraft-sim -- [OPTIONS]

STREAMING OPTIONS:
    --render-distance <N>   Chunks loaded around the observer (default: 10)
    --workers <N>           Chunk worker threads (default: available cores)
    --raster                Request chunks row by row instead of nearest first

WORLD OPTIONS:
    --seed <N>              World generation seed (default: 42)

SIMULATION OPTIONS:
    --ticks <N>             Ticks to run (default: 600)
    --speed <UNITS>         Observer speed along +X per tick (default: 50)

OTHER:
    -h, --help              Print this help message

EXAMPLES:
    # Short walk with a small view
    cargo run -p voxcraft-sim -- --render-distance 3 --ticks 200

    # Watch chunk installs
    RUST_LOG=voxcraft_world=debug cargo run -p voxcraft-sim

ENVIRONMENT:
    RUST_LOG                Log filter (default: info)"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> SimParams {
        SimParams::parse(args.iter().map(|s| (*s).to_string()))
    }

    #[test]
    fn defaults() {
        assert_eq!(parse(&[]), SimParams::default());
    }

    #[test]
    fn flags() {
        let params = parse(&[
            "--render-distance",
            "3",
            "--seed",
            "7",
            "--ticks",
            "20",
            "--speed",
            "12.5",
            "--workers",
            "2",
            "--raster",
        ]);

        assert_eq!(params.render_distance, 3);
        assert_eq!(params.seed, 7);
        assert_eq!(params.ticks, 20);
        assert!((params.speed - 12.5).abs() < f32::EPSILON);
        assert_eq!(params.workers, Some(2));
        assert_eq!(params.load_order, LoadOrder::Raster);

        let config = params.streaming_config();
        assert_eq!(config.render_distance, 3);
        assert_eq!(config.worker_threads, 2);
    }

    #[test]
    fn bad_values_are_skipped() {
        let params = parse(&["--seed", "abc", "--ticks", "5"]);
        assert_eq!(params.seed, 42);
        assert_eq!(params.ticks, 5);
    }

    #[test]
    fn help() {
        assert!(parse(&["-h"]).help);
        assert!(parse(&["--help"]).help);
    }
}
