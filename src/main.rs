//! Life View CLI - Run a headless animated view from JSON configuration.

use std::path::PathBuf;
use std::time::Instant;

use life_view::{
    animation::HeadlessHost,
    engine::Universe,
    render::{PixelSurface, RasterBackend, RenderBackend, SceneBackend, SoftwareRenderer},
    schema::{BackendKind, ViewConfig},
    view::AnimationView,
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [frames]", args[0]);
        eprintln!();
        eprintln!("Run a Game of Life view headlessly from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to view configuration file");
        eprintln!("  frames       Number of animation frames (default: 100)");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let frames: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100);

    let config = ViewConfig::load(&config_path).unwrap_or_else(|e| {
        eprintln!("Error loading config: {}", e);
        std::process::exit(1);
    });

    println!("Life View");
    println!("=========");
    println!(
        "Universe: {}x{} ({} cells)",
        config.universe.width,
        config.universe.height,
        config.cell_count()
    );
    println!(
        "Surface: {}x{} ({:?} backend)",
        config.surface.width, config.surface.height, config.backend
    );
    println!("Steps per frame: {}", config.steps_per_frame);
    println!("Frames: {}", frames);
    println!();

    let universe = Universe::new(
        config.universe.width,
        config.universe.height,
        config.universe.seed,
    );
    println!("Initial live cells: {}", universe.live_count());

    let backend = build_backend(&config, &universe).unwrap_or_else(|e| {
        eprintln!("Error initializing renderer: {}", e);
        std::process::exit(1);
    });

    let mut view = AnimationView::mount(universe, backend, HeadlessHost::default(), &config)
        .unwrap_or_else(|e| {
            eprintln!("Error mounting view: {}", e);
            std::process::exit(1);
        });

    println!("Running animation...");
    let start = Instant::now();
    view.start();

    for i in 0..frames {
        match view.pump() {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                eprintln!("Error drawing frame {}: {}", i + 1, e);
                std::process::exit(1);
            }
        }

        // Print progress every 10%
        if (i + 1) % (frames / 10).max(1) == 0 {
            println!(
                "  Frame {}/{}: live={}",
                i + 1,
                frames,
                view.engine().live_count()
            );
        }
    }

    let elapsed = start.elapsed();
    let stats = view.frame_rate();
    let drawn = view.frames();
    let parts = view.unmount();

    println!();
    println!("Final state:");
    println!("  Live cells: {}", parts.engine.live_count());
    println!(
        "  Frame rate: latest={} mean={} min={} max={}",
        stats.latest, stats.mean, stats.min, stats.max
    );
    println!(
        "Time: {:.2}s ({} frames, {:.1} frames/s)",
        elapsed.as_secs_f32(),
        drawn,
        drawn as f32 / elapsed.as_secs_f32()
    );
    println!();
    print!("{}", parts.engine);
}

fn build_backend(
    config: &ViewConfig,
    universe: &Universe,
) -> Result<Box<dyn RenderBackend>, life_view::RenderError> {
    let surface = PixelSurface::new(config.surface.width, config.surface.height);
    Ok(match config.backend {
        BackendKind::Raster => {
            let mut backend = RasterBackend::new(config.palette);
            backend.initialize(surface, universe)?;
            Box::new(backend)
        }
        BackendKind::Scene => {
            let mut backend = SceneBackend::new(config.palette, config.field_of_view);
            backend.initialize(SoftwareRenderer::new(surface), universe)?;
            Box::new(backend)
        }
    })
}

fn print_example_config() {
    let config = ViewConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing config: {}", e);
            std::process::exit(1);
        }
    }
}
