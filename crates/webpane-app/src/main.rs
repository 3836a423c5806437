//! webpane demo entry point.
//!
//! Drives the surface core against the in-memory engine: loads the home
//! page, streams progress, long-presses a link, navigates back and forth,
//! then resets and tears the session down. Every host notification is
//! logged. Pass a TOML config path as the first argument or via
//! `WEBPANE_CONFIG`; defaults are used otherwise.

use anyhow::{Result, anyhow};

use webpane_surface::geometry::{Point, Rect};
use webpane_surface::input::TouchEvent;
use webpane_surface::{
    HeadlessEngine, HeadlessHandle, HostListener, SurfaceConfig, SurfaceInfo, SurfaceLifecycle,
};

/// Simulated frame length.
const FRAME_MS: u32 = 16;

const SCREEN: Rect = Rect::new(0.0, 0.0, 375.0, 667.0);
const NAVIGATION_BAR_HEIGHT: f32 = 44.0;

/// Host that only logs what the core tells it.
struct LoggingHost;

impl HostListener for LoggingHost {
    fn attached(&mut self, surface: &SurfaceInfo) {
        log::info!(
            "host: {} attached at {}x{}",
            surface.id,
            surface.frame.width,
            surface.frame.height
        );
    }

    fn page_load_started(&mut self) {
        log::info!("host: page load started");
    }

    fn page_load_finished(&mut self) {
        log::info!("host: page load finished");
    }

    fn long_press_on_link(&mut self, url: &str) {
        log::info!("host: long press on {url}");
    }

    fn session_cleared(&mut self) {
        log::info!("host: web session cleared");
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Resolve config from CLI arg, WEBPANE_CONFIG env var, or defaults.
    let config = match std::env::args()
        .nth(1)
        .or_else(|| std::env::var("WEBPANE_CONFIG").ok())
    {
        Some(path) => {
            log::info!("Loading config from {path}");
            SurfaceConfig::from_file(&path)?
        },
        None => SurfaceConfig::default(),
    };
    log::info!("Starting webpane session (home: {})", config.home_url);

    let engine = HeadlessEngine::new();
    let mut lifecycle =
        SurfaceLifecycle::new(config, Box::new(engine.clone()), Box::new(LoggingHost), SCREEN);
    lifecycle.embed_in_navigation_stack(NAVIGATION_BAR_HEIGHT);
    let policy = lifecycle.long_press_policy();
    log::info!(
        "Long press: yields to others {}, requires others to fail {}",
        policy.yields_to_others,
        policy.requires_others_to_fail
    );

    // First page: load with streamed progress.
    lifecycle.ensure_surface()?;
    let page = active_handle(&lifecycle, &engine)?;
    page.begin_load();
    for sample in [0.1, 0.35, 0.8, 1.0] {
        page.report_progress(sample);
        run_frames(&mut lifecycle, 1);
        log::info!("progress {:.0}%", lifecycle.indicator().value() * 100.0);
    }
    page.finish_load("DuckDuckGo");
    run_until_hidden(&mut lifecycle);
    if let Some(link) = lifecycle.link() {
        log::info!("Current page: {} <{}>", link.title, link.url);
    }

    // Long press on a link below the chrome.
    let link_rect = Rect::new(16.0, 120.0, 200.0, 32.0);
    page.add_link(link_rect, "https://duckduckgo.com/about");
    let offset = lifecycle.chrome_insets().vertical_offset();
    let touch = Point::new(40.0, link_rect.y + offset + 8.0);
    if lifecycle.handle_touch(&TouchEvent::Down(touch)) {
        let hold_frames = lifecycle.config().long_press_hold_ms / FRAME_MS + 1;
        run_frames(&mut lifecycle, hold_frames);
        lifecycle.handle_touch(&TouchEvent::Up(touch));
        page.complete_hit_tests();
        lifecycle.pump();
    }

    // Second page, then back and forward.
    lifecycle.load("https://example.com")?;
    page.begin_load();
    page.finish_load("Example Domain");
    run_until_hidden(&mut lifecycle);
    if lifecycle.go_back() {
        log::info!("Back to {}", lifecycle.url().unwrap_or_default());
    }
    if lifecycle.go_forward() {
        log::info!("Forward to {}", lifecycle.url().unwrap_or_default());
    }

    // Start over on a fresh surface, then shut down.
    lifecycle.reset()?;
    run_frames(&mut lifecycle, 1);
    lifecycle.tear_down();
    run_frames(&mut lifecycle, 1);

    log::info!(
        "Session finished ({} surfaces created)",
        engine.surfaces_created()
    );
    Ok(())
}

fn active_handle(lifecycle: &SurfaceLifecycle, engine: &HeadlessEngine) -> Result<HeadlessHandle> {
    lifecycle
        .active_surface_id()
        .and_then(|id| engine.handle(id))
        .ok_or_else(|| anyhow!("no active surface"))
}

fn run_frames(lifecycle: &mut SurfaceLifecycle, frames: u32) {
    for _ in 0..frames {
        lifecycle.pump();
        lifecycle.tick(FRAME_MS);
    }
}

/// Run frames until the progress indicator has faded out.
fn run_until_hidden(lifecycle: &mut SurfaceLifecycle) {
    let max_frames = lifecycle.config().progress_fade_ms / FRAME_MS + 2;
    for _ in 0..max_frames {
        run_frames(lifecycle, 1);
        if !lifecycle.indicator().is_visible() {
            break;
        }
    }
}
