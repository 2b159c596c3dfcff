//! Terminal viewer: renders a viewport of the procedural terrain as
//! ANSI-colored cells.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI
//! flags. Run with `cargo run -p veld-view` for the default viewport, or
//! `cargo run -p veld-view -- --center-x 120 --width 80` to look elsewhere.
//!
//! The viewer is a plain consumer of the terrain core: it pre-submits the
//! viewport's chunk rectangle to a [`ChunkStreamer`], installs the results,
//! then queries `get_block` per cell -- all cache hits by that point.

use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use tracing::info;

use veld_config::{CliArgs, Config, ViewerConfig, default_config_dir};
use veld_log::init_logging;
use veld_terrain::{BlockType, ChunkCoord};
use veld_world::{ChunkStreamer, World};

fn main() -> ExitCode {
    let args = CliArgs::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);
    let mut config = Config::load_or_create(&config_dir)?;
    config.apply_cli_overrides(args);

    init_logging(
        Some(&config_dir.join("logs")),
        cfg!(debug_assertions),
        Some(&config),
    );

    let settings = config.generation.to_build_settings()?;
    if config.world.chunk_size < 1 {
        return Err("world.chunk_size must be at least 1".into());
    }
    if config.viewer.width < 1 || config.viewer.height < 1 {
        return Err("viewer.width and viewer.height must be at least 1".into());
    }

    let world = World::with_chunk_size(settings, config.world.chunk_size);
    let started = Instant::now();

    prefetch_viewport(&world, &config.viewer)?;
    let frame = render_viewport(&world, &config.viewer)?;
    print!("{frame}");

    info!(
        chunks = world.loaded_chunk_count(),
        cells = config.viewer.width * config.viewer.height,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "rendered viewport"
    );
    Ok(())
}

/// World-coordinate rectangle covered by the viewport: `(x0, z0)` inclusive
/// origin, centered on the configured center.
fn viewport_origin(viewer: &ViewerConfig) -> (i32, i32) {
    (
        viewer.center_x - (viewer.width / 2) as i32,
        viewer.center_z - (viewer.height / 2) as i32,
    )
}

/// Chunk coordinates covering the viewport, nearest to the center first.
fn viewport_chunks(viewer: &ViewerConfig, chunk_size: u32) -> Vec<ChunkCoord> {
    let (x0, z0) = viewport_origin(viewer);
    let min = ChunkCoord::from_world(x0, z0, chunk_size);
    let max = ChunkCoord::from_world(
        x0 + viewer.width as i32 - 1,
        z0 + viewer.height as i32 - 1,
        chunk_size,
    );
    let center = ChunkCoord::from_world(viewer.center_x, viewer.center_z, chunk_size);

    let mut coords = Vec::new();
    for cx in min.x..=max.x {
        for cz in min.z..=max.z {
            coords.push(ChunkCoord::new(cx, cz));
        }
    }
    coords.sort_by_key(|c| {
        let dx = (c.x - center.x) as i64;
        let dz = (c.z - center.z) as i64;
        dx * dx + dz * dz
    });
    coords
}

/// Generate the viewport's chunks on the streamer's workers and install
/// them into the world, so the render pass below is pure cache hits.
fn prefetch_viewport(
    world: &World,
    viewer: &ViewerConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let streamer = ChunkStreamer::with_defaults(*world.settings(), world.chunk_size());

    let mut submitted = 0usize;
    let mut installed = 0usize;
    for coord in viewport_chunks(viewer, world.chunk_size()) {
        if world.is_loaded(coord) {
            continue;
        }
        // A full task queue rejects the submission; drain what has finished
        // and try again.
        while streamer.submit(coord).is_err() {
            installed += install_results(world, &streamer)?;
            std::thread::sleep(Duration::from_millis(1));
        }
        submitted += 1;
    }

    while installed < submitted {
        installed += install_results(world, &streamer)?;
        if installed < submitted {
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    info!(chunks = submitted, "prefetched viewport chunks");
    Ok(())
}

fn install_results(world: &World, streamer: &ChunkStreamer) -> Result<usize, Box<dyn std::error::Error>> {
    let mut count = 0;
    for streamed in streamer.drain_results() {
        world.insert_generated(streamed.result?);
        count += 1;
    }
    Ok(count)
}

/// RGB color for a block type.
fn block_color(block: BlockType) -> (u8, u8, u8) {
    match block {
        BlockType::Ocean => (0, 0, 255),
        BlockType::River => (0, 0, 150),
        BlockType::Grassland => (34, 139, 34),
        BlockType::Mountain => (139, 69, 19),
    }
}

/// Render the viewport into a string of ANSI-colored cells plus a legend.
fn render_viewport(
    world: &World,
    viewer: &ViewerConfig,
) -> Result<String, Box<dyn std::error::Error>> {
    let (x0, z0) = viewport_origin(viewer);
    let mut out = String::new();

    out.push_str(&format!(
        "viewport {}x{} centered at ({}, {})\n",
        viewer.width, viewer.height, viewer.center_x, viewer.center_z
    ));

    for row in 0..viewer.height as i32 {
        for col in 0..viewer.width as i32 {
            let block = world.get_block(x0 + col, z0 + row)?;
            let (r, g, b) = block_color(block);
            out.push_str(&format!("\x1b[48;2;{r};{g};{b}m  "));
        }
        out.push_str("\x1b[0m\n");
    }

    for block in BlockType::ALL {
        let (r, g, b) = block_color(block);
        out.push_str(&format!("\x1b[48;2;{r};{g};{b}m  \x1b[0m {}  ", block.label()));
    }
    out.push('\n');
    out.push_str(&format!(
        "center block: {}\n",
        world.get_prettified_block(viewer.center_x, viewer.center_z)?
    ));

    Ok(out)
}
