//! Snapbooth CLI
//!
//! Command-line demo for the capture/composite/export flow. Uses the
//! mock camera by default; build with `--features camera` to drive real
//! hardware.

use clap::Parser;
use snapbooth::{
    assets::OverlayCache,
    capture::{Facing, FileConfig, SessionManager},
    export::{Booth, FileSink},
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "snapbooth", version, about = "Branded camera capture demo")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overlay asset directory (overrides config).
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Output directory for captures (overrides config).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Initial camera facing: front or rear.
    #[arg(long)]
    facing: Option<String>,

    /// Preview frames to render before snapping.
    #[arg(long, default_value_t = 30)]
    frames: u32,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Snapbooth v{}", snapbooth::VERSION);

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load config: {}", e);
                std::process::exit(1);
            }
        },
        None => FileConfig::default(),
    };
    if let Some(dir) = args.assets {
        config.overlay.assets_dir = dir;
    }
    if let Some(dir) = args.out {
        config.export.output_dir = dir;
    }
    let facing = match args.facing.as_deref() {
        Some("rear") => Facing::Rear,
        Some("front") | None => config.capture.facing,
        Some(other) => {
            eprintln!("Unknown facing '{}', expected front or rear", other);
            std::process::exit(1);
        }
    };

    // Load overlays once; failures degrade to frame-only rendering.
    let mut overlays = OverlayCache::new(config.overlay.variant);
    let report = overlays.load_all(&config.overlay.assets_dir);
    info!(
        loaded = report.loaded.len(),
        failed = report.failed.len(),
        "overlay assets settled"
    );

    let device = make_device();
    let session = SessionManager::new(device, config.capture.clone());
    let mut booth = Booth::new(session, overlays, config.export.retake, 1);

    // Clean camera teardown on Ctrl-C.
    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        if let Err(e) = ctrlc::set_handler(move || running.store(false, Ordering::SeqCst)) {
            warn!(error = %e, "failed to install signal handler");
        }
    }

    if let Err(e) = booth.start(facing, Instant::now()) {
        use snapbooth::export::Notice;
        let message = match booth.notice() {
            Some(Notice::Persistent(m)) | Some(Notice::Transient(m)) => m.clone(),
            None => e.to_string(),
        };
        eprintln!("{}", message);
        std::process::exit(1);
    }
    let (w, h) = booth.capture_dims();
    info!(width = w, height = h, mirror = booth.mirror(), "session live");

    // Short preview loop standing in for the continuous render.
    let frame_interval = Duration::from_millis(1000 / u64::from(config.capture.fps.max(1)));
    for i in 0..args.frames {
        if !running.load(Ordering::SeqCst) {
            info!("interrupted, shutting down");
            booth.teardown();
            return;
        }
        booth.tick(Instant::now());
        match booth.render_preview() {
            Ok(surface) => {
                if i == 0 {
                    info!(
                        width = surface.width(),
                        height = surface.height(),
                        "preview rendering"
                    );
                }
            }
            Err(e) => warn!(error = %e, "preview frame skipped"),
        }
        std::thread::sleep(frame_interval);
    }

    match booth.snap() {
        Ok(()) => {
            let result = booth.result().expect("snap succeeded");
            info!(
                width = result.width(),
                height = result.height(),
                bytes = result.bytes().len(),
                "capture taken"
            );
        }
        Err(e) => {
            eprintln!("Capture failed: {}", e);
            booth.teardown();
            std::process::exit(1);
        }
    }

    let mut sink = FileSink::new(&config.export.output_dir, &config.export.file_prefix);
    match booth.export(&mut sink, "Snapbooth Capture") {
        Ok(outcome) => println!("Export outcome: {:?}", outcome),
        Err(e) => warn!(error = %e, "export failed"),
    }

    booth.teardown();
    info!("Done.");
}

#[cfg(feature = "camera")]
fn make_device() -> snapbooth::capture::NokhwaCamera {
    snapbooth::capture::NokhwaCamera::new()
}

#[cfg(not(feature = "camera"))]
fn make_device() -> snapbooth::capture::MockCamera {
    snapbooth::capture::MockCamera::new()
}
