//! Headless driver for the starfield viewer
//!
//! Loads the catalog buffers from a data directory (or generates a demo
//! cloud), then plays a scripted pointer session through the real input,
//! picking and frame logic, logging what a renderer would have been asked to
//! draw.

use anyhow::{Context, Result};
use clap::Parser;
use nalgebra::Matrix4;
use starfield_core::{MarkerStyle, Point3f, PointDataset, Readout, ReadoutSink, Renderer, SpriteStyle};
use starfield_io::{default_catalog, DatasetLoader, OfflineCatalog};
use starfield_viewer::{InputEvent, LookupServices, PointerTracker, PolarChart, Session, ViewerConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "starview", version, about = "Headless starfield navigation session")]
struct Args {
    /// Directory holding the catalog `.f32` buffers
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// JSON viewer configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON file with offline 2MRS/SIMBAD records
    #[arg(long)]
    records: Option<PathBuf>,

    /// Identifier to search once SIMBAD is loaded
    #[arg(long)]
    find: Option<String>,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 180)]
    frames: u32,

    /// Simulated frame interval in milliseconds
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    #[arg(long, default_value_t = 1280)]
    width: u32,

    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Draw the reference grid
    #[arg(long, default_value_t = false)]
    show_grid: bool,

    /// Scan every point instead of using the spatial index
    #[arg(long, default_value_t = false)]
    brute_force: bool,
}

/// Renderer that only records and logs requests
#[derive(Default)]
struct HeadlessRenderer {
    chart_segments: usize,
    frames: u64,
    points_drawn: u64,
    grid_draws: u64,
    marker_draws: u64,
    sprite_width: f32,
}

impl HeadlessRenderer {
    fn new() -> Self {
        let chart = PolarChart::default().line_vertices();
        Self {
            chart_segments: chart.len() / 2,
            ..Self::default()
        }
    }
}

impl Renderer for HeadlessRenderer {
    fn set_viewport(&mut self, width: u32, height: u32) {
        log::debug!("viewport {}x{}", width, height);
    }

    fn set_camera(&mut self, _view: &Matrix4<f32>, _projection: &Matrix4<f32>) {}

    fn set_sprite_width(&mut self, style: SpriteStyle, width: f32) {
        if style == SpriteStyle::Point {
            self.sprite_width = width;
        }
    }

    fn draw_dataset(&mut self, dataset: &PointDataset) {
        self.points_drawn += dataset.len() as u64;
    }

    fn draw_marker(&mut self, style: MarkerStyle, position: &Point3f) {
        self.marker_draws += 1;
        log::trace!("{:?} marker at {}", style, position);
    }

    fn draw_grid(&mut self, center: &Point3f, scale: f64, alpha: f64) {
        self.grid_draws += 1;
        log::trace!(
            "grid ({} segments) at {} scale {} alpha {:.3}",
            self.chart_segments,
            center,
            scale,
            alpha
        );
    }

    fn request_next_frame(&mut self) {
        self.frames += 1;
    }
}

struct LogReadout;

impl ReadoutSink for LogReadout {
    fn show_readout(&mut self, readout: &Readout) {
        log::info!(
            "distance {} | orbit {} | {}",
            readout.distance_text(),
            readout.orbit_text(),
            readout.grid_label()
        );
    }
}

/// Points on nested Fibonacci spheres, a stand-in for a redshift survey
fn demo_cloud(count: usize, shells: usize, max_radius: f32) -> Vec<Point3f> {
    let golden = std::f32::consts::PI * (3.0 - 5f32.sqrt());
    let per_shell = (count / shells.max(1)).max(1);
    (0..count)
        .map(|i| {
            let shell = i / per_shell;
            let k = i % per_shell;
            let radius = max_radius * (shell + 1) as f32 / shells as f32;
            let y = 1.0 - 2.0 * (k as f32 + 0.5) / per_shell as f32;
            let ring = (1.0 - y * y).sqrt();
            let theta = golden * k as f32;
            Point3f::new(ring * theta.cos(), y, ring * theta.sin()) * radius
        })
        .collect()
}

fn load_config(args: &Args) -> Result<ViewerConfig> {
    let mut config = match &args.config {
        Some(path) => ViewerConfig::from_json_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => ViewerConfig::default(),
    };
    if args.show_grid {
        config.show_grid = true;
    }
    if args.brute_force {
        config.use_spatial_index = false;
    }
    if args.find.is_some() {
        config.initial_search = args.find.clone();
    }
    Ok(config)
}

/// Scripted pointer input for one frame
fn scripted_input(frame: u32, tracker: &mut PointerTracker, width: f64, height: f64) -> Vec<InputEvent> {
    let (cx, cy) = (width * 0.5, height * 0.5);
    match frame {
        0 => tracker.cursor_moved(cx, cy),
        10 => tracker.button(true),
        11..=30 => tracker.cursor_moved(cx + 6.0 * (frame - 10) as f64, cy),
        31 => tracker.button(false),
        40 => tracker.cursor_moved(cx, cy),
        45 => tracker.button(true),
        46 => tracker.button(false),
        60..=90 => tracker.wheel(120.0),
        120..=135 => tracker.wheel(-240.0),
        _ => Vec::new(),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = load_config(&args)?;

    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;

    let mut services = LookupServices::none();
    if let Some(path) = &args.records {
        let catalog = Arc::new(
            OfflineCatalog::from_json_file(path)
                .with_context(|| format!("reading records {}", path.display()))?,
        );
        services = services.with_search(catalog.clone()).with_detail(catalog);
    }

    let mut session = Session::new(config, runtime.handle().clone(), services);

    match &args.data_dir {
        Some(dir) => {
            let (loader, inbox) = DatasetLoader::new(runtime.handle().clone(), dir);
            let handles: Vec<_> = default_catalog().iter().map(|s| loader.load(s)).collect();
            runtime.block_on(async {
                for handle in handles {
                    if let Err(e) = handle.await {
                        log::error!("Load task panicked: {}", e);
                    }
                }
            });
            session.attach_inbox(inbox);
        }
        None => {
            log::info!("No data directory given, generating a demo cloud");
            session.insert_dataset(PointDataset::new("2MRS", demo_cloud(20_000, 8, 200.0)))?;
            session.insert_dataset(PointDataset::new("SIMBAD", demo_cloud(5_000, 3, 80.0)))?;
        }
    }

    let mut renderer = HeadlessRenderer::new();
    let mut readout = LogReadout;
    let mut tracker = PointerTracker::new(args.width, args.height);
    for event in tracker.resized(args.width, args.height) {
        session.handle_input(event);
    }

    let start = Instant::now();
    let frame_interval = Duration::from_millis(args.frame_ms);
    for frame in 0..args.frames {
        for event in scripted_input(frame, &mut tracker, args.width as f64, args.height as f64) {
            session.handle_input(event);
        }
        session.tick(start + frame_interval * frame, &mut renderer, &mut readout);
    }

    // Let outstanding lookups land, then run one last frame to apply them
    let deadline = Instant::now() + Duration::from_secs(5);
    while session.lookup().is_busy() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(10));
    }
    session.tick(start + frame_interval * args.frames, &mut renderer, &mut readout);

    let selected = session
        .selection()
        .selected()
        .target()
        .map(|(dataset, index)| format!("point {} of '{}'", index, dataset.title()))
        .unwrap_or_else(|| "nothing".to_string());
    log::info!(
        "{} frames, {} points drawn, {} grid draws, {} marker draws, sprite width {:.4}",
        renderer.frames,
        renderer.points_drawn,
        renderer.grid_draws,
        renderer.marker_draws,
        renderer.sprite_width
    );
    log::info!("Selected {}", selected);
    if let Some(record) = session.lookup().record() {
        for (label, value) in record.fields() {
            log::info!("  {}: {}", label, value);
        }
    }

    Ok(())
}
