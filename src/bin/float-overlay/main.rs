use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use env_logger::Env;
use log::{debug, error, info, warn};

use float_overlay::assets::AssetCatalog;
use float_overlay::engine_config::load_config_from_file;
use float_overlay::pipeline::{CaptureWatchdog, TickOutcome, run_tick};
use float_overlay::systems::Systems;

mod capture;
mod cli;
mod pose_backend;
mod preview;

use crate::capture::CameraSource;
use crate::cli::Cli;
use crate::pose_backend::SidecarDetector;
use crate::preview::PreviewWindow;

fn main() {
    let cli = Cli::parse();

    // Initialize the logger from the environment

    env_logger::Builder::from_env(Env::default().default_filter_or(&cli.log_level)).init();

    debug!("Started; args: {:?}", cli);

    let config = load_config_from_file(&cli.config_path).expect("failed to load engine config");
    let mut systems = Systems::new(&config);

    let catalog = match AssetCatalog::scan(Path::new(&cli.assets_dir)) {
        Ok(catalog) => catalog,
        Err(e) => {
            warn!("No asset catalog available: {}", e);
            AssetCatalog::empty()
        }
    };

    for path in &cli.images {
        if let Err(e) = systems.import_image(path, config.default_import_width) {
            error!("Failed to import \"{}\": {}", path, e);
        }
    }

    let mut source = CameraSource::open(cli.capture_device, cli.capture_width, cli.capture_height)
        .expect("failed to open capture device");
    let mut pose = SidecarDetector::spawn(&cli.pose_command).expect("failed to start pose detector");
    let mut sink = PreviewWindow::new(
        "Float",
        cli.capture_width as usize,
        cli.capture_height as usize,
        cli.preview_mirror,
    )
    .expect("failed to create preview window");

    let mut watchdog = CaptureWatchdog::new(config.capture_failures_before_reopen);
    let tick_interval = Duration::from_millis(config.tick_interval_ms);

    loop {
        let tick_started = Instant::now();

        for slot in sink.pressed_import_slots() {
            match catalog.get(slot) {
                Some((name, path)) => {
                    info!("Importing \"{}\" from catalog", name);
                    let path = path.to_string_lossy().into_owned();
                    if let Err(e) = systems.import_image(&path, config.default_import_width) {
                        error!("Failed to import \"{}\": {}", path, e);
                    }
                }
                None => debug!("No catalog entry for key {}", slot + 1),
            }
        }

        match run_tick(&mut source, &mut pose, &mut sink, &mut systems, &mut watchdog) {
            TickOutcome::Closed => break,
            TickOutcome::SkippedCapture { reopened: true } => {
                thread::sleep(Duration::from_millis(config.capture_retry_backoff_ms));
            }
            _ => {}
        }

        // Overruns just schedule the next tick late; no frames are dropped.
        let elapsed = tick_started.elapsed();
        if elapsed < tick_interval {
            thread::sleep(tick_interval - elapsed);
        }
    }

    info!("Preview window closed; exiting");
}
