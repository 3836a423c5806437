//! Surface lifecycle: the owner of the active surface.
//!
//! Creates, wires, replaces and tears down surfaces so that at most one
//! is ever attached to the view slot and registered with the navigation
//! coordinator, the progress tracker and the long-press recognizer.
//! Engine callbacks come back through the dispatch queue and are routed
//! here by [`SurfaceLifecycle::pump`].

use webpane_types::error::Result;
use webpane_types::geometry::Rect;
use webpane_types::input::TouchEvent;

use crate::chrome::ChromeInsets;
use crate::config::SurfaceConfig;
use crate::dispatch::{Dispatcher, Envelope, MessageSink, SurfaceMessage};
use crate::engine::{RenderEngine, Surface, SurfaceId};
use crate::gesture::{GestureDisambiguator, GestureState, RecognizerPolicy};
use crate::host::{HostListener, SurfaceInfo};
use crate::link::Link;
use crate::navigation::NavigationCoordinator;
use crate::progress::{ProgressIndicator, ProgressTracker};
use crate::slot::ViewSlot;

/// The wired surface plus the sink its callbacks post through.
struct ActiveSurface {
    surface: Box<dyn Surface>,
    sink: MessageSink,
}

/// Owns the active surface and everything wired to it.
pub struct SurfaceLifecycle {
    config: SurfaceConfig,
    engine: Box<dyn RenderEngine>,
    host: Box<dyn HostListener>,

    /// The one wired surface, if any.
    active: Option<ActiveSurface>,

    slot: ViewSlot,
    chrome: ChromeInsets,
    dispatcher: Dispatcher,

    coordinator: NavigationCoordinator,
    tracker: ProgressTracker,
    gesture: GestureDisambiguator,
    indicator: ProgressIndicator,
}

impl SurfaceLifecycle {
    /// Create a lifecycle with no surface attached. Call
    /// [`ensure_surface`](Self::ensure_surface) once the host view exists.
    pub fn new(
        config: SurfaceConfig,
        engine: Box<dyn RenderEngine>,
        host: Box<dyn HostListener>,
        bounds: Rect,
    ) -> Self {
        let indicator = ProgressIndicator::new(config.progress_fade_ms);
        let gesture =
            GestureDisambiguator::new(config.long_press_hold_ms, config.long_press_tolerance);
        Self {
            config,
            engine,
            host,
            active: None,
            slot: ViewSlot::new(bounds),
            chrome: ChromeInsets::None,
            dispatcher: Dispatcher::new(),
            coordinator: NavigationCoordinator::new(),
            tracker: ProgressTracker::new(),
            gesture,
            indicator,
        }
    }

    // ---------------------------------------------------------------
    // Attach / replace / detach
    // ---------------------------------------------------------------

    /// Attach a home-page surface unless one is already active.
    pub fn ensure_surface(&mut self) -> Result<SurfaceId> {
        match self.active_surface_id() {
            Some(id) => Ok(id),
            None => self.attach_new(None),
        }
    }

    /// Create a fresh surface, make it the active one and navigate it to
    /// `start_url`, or the configured home page when `None`.
    pub fn attach_new(&mut self, start_url: Option<&str>) -> Result<SurfaceId> {
        let url = start_url.unwrap_or(&self.config.home_url).to_string();
        webpane_types::url::validate(&url)?;

        let surface = self.engine.create_surface(self.slot.bounds());
        let id = self.attach(surface);
        self.load_into_active(&url);
        Ok(id)
    }

    /// Make an externally created surface (e.g. a popup) the active one.
    /// No navigation is started.
    pub fn replace(&mut self, surface: Box<dyn Surface>) -> SurfaceId {
        self.attach(surface)
    }

    /// Unwire the active surface and take it out of the view. Returns it,
    /// or `None` when nothing was attached. Safe to call repeatedly.
    pub fn detach(&mut self) -> Option<Box<dyn Surface>> {
        let ActiveSurface { mut surface, .. } = self.active.take()?;
        let id = surface.id();
        self.tracker.detach(surface.as_mut());
        self.coordinator.unbind(surface.as_mut());
        self.gesture.unbind();
        surface.remove_from_view();
        self.slot.remove(id);
        log::info!("{id} detached");
        Some(surface)
    }

    /// Clear the cache and drop the active surface, leaving none.
    pub fn tear_down(&mut self) {
        self.clear_cache();
        if let Some(surface) = self.detach() {
            log::debug!("{} released", surface.id());
        }
    }

    /// Clear the cache and start over on a brand-new home-page surface.
    pub fn reset(&mut self) -> Result<SurfaceId> {
        self.clear_cache();
        self.attach_new(None)
    }

    fn attach(&mut self, mut surface: Box<dyn Surface>) -> SurfaceId {
        if let Some(previous) = self.detach() {
            log::debug!("{} released", previous.id());
        }

        let id = surface.id();
        let sink = self.dispatcher.sink(id);

        self.gesture.bind(id);
        self.indicator.reset();
        surface.set_back_forward_gestures(self.config.back_forward_gestures);
        self.tracker.attach(surface.as_mut(), &sink);
        self.coordinator.bind(surface.as_mut(), &sink);

        let frame = self.slot.insert(id);
        surface.set_frame(frame);
        self.active = Some(ActiveSurface { surface, sink });

        log::info!("{id} attached");
        self.host.attached(&SurfaceInfo { id, frame });
        id
    }

    // ---------------------------------------------------------------
    // Navigation
    // ---------------------------------------------------------------

    /// Load `url` in the active surface, attaching a blank one first if
    /// needed.
    pub fn load(&mut self, url: &str) -> Result<()> {
        webpane_types::url::validate(url)?;
        if self.active.is_none() {
            let surface = self.engine.create_surface(self.slot.bounds());
            self.attach(surface);
        }
        self.load_into_active(url);
        Ok(())
    }

    pub fn load_home(&mut self) -> Result<()> {
        let url = self.config.home_url.clone();
        self.load(&url)
    }

    fn load_into_active(&mut self, url: &str) {
        if let Some(active) = self.active.as_mut() {
            log::info!("{}: loading {url}", active.surface.id());
            active.surface.load(url);
        }
    }

    /// Go back if the active surface can. Returns whether it did.
    pub fn go_back(&mut self) -> bool {
        match self.active.as_mut() {
            Some(active) if active.surface.can_go_back() => {
                active.surface.go_back();
                true
            },
            _ => false,
        }
    }

    /// Go forward if the active surface can. Returns whether it did.
    pub fn go_forward(&mut self) -> bool {
        match self.active.as_mut() {
            Some(active) if active.surface.can_go_forward() => {
                active.surface.go_forward();
                true
            },
            _ => false,
        }
    }

    pub fn reload(&mut self) -> bool {
        match self.active.as_mut() {
            Some(active) => {
                active.surface.reload();
                true
            },
            None => false,
        }
    }

    /// Ask the active surface to drop its cached web data. The
    /// acknowledgment is only logged. Returns whether a request was made.
    pub fn clear_cache(&mut self) -> bool {
        let Some(active) = self.active.as_mut() else {
            log::debug!("cache clear skipped, no active surface");
            return false;
        };
        let completion = active.sink.cache_callback();
        active.surface.clear_cache(completion);
        self.host.session_cleared();
        true
    }

    // ---------------------------------------------------------------
    // Host-driven updates
    // ---------------------------------------------------------------

    /// Host view resized. The active surface follows.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.slot.set_bounds(bounds);
        if let Some(active) = self.active.as_mut() {
            active.surface.set_frame(bounds);
        }
    }

    pub fn set_chrome_insets(&mut self, chrome: ChromeInsets) {
        self.chrome = chrome;
    }

    /// The host view was pushed onto a navigation stack whose bar is
    /// `navigation_bar_height` tall, under the configured status bar.
    pub fn embed_in_navigation_stack(&mut self, navigation_bar_height: f32) {
        self.chrome = ChromeInsets::stacked(self.config.status_bar_height, navigation_bar_height);
    }

    pub fn set_navigation_bar_hidden(&mut self, hidden: bool) {
        self.chrome.set_navigation_bar_hidden(hidden);
    }

    /// Feed a touch event to the long-press recognizer. Returns `true` if
    /// the recognizer claimed the event.
    pub fn handle_touch(&mut self, event: &TouchEvent) -> bool {
        match *event {
            TouchEvent::Down(point) => {
                let Some(active) = self.active.as_ref() else {
                    return false;
                };
                self.gesture
                    .should_begin(active.surface.as_ref(), point, &self.chrome)
            },
            TouchEvent::Moved(point) => self.gesture.touch_moved(point),
            TouchEvent::Up(_) => self.gesture.touch_up(),
            TouchEvent::Cancelled => {
                self.gesture.cancel();
                false
            },
        }
    }

    /// Advance animations and the long-press hold timer.
    pub fn tick(&mut self, dt_ms: u32) {
        self.indicator.tick(dt_ms);
        if let Some(active) = self.active.as_ref()
            && self
                .gesture
                .tick(dt_ms, active.surface.as_ref(), &self.chrome, &active.sink)
        {
            log::debug!("{}: long press began", active.surface.id());
        }
    }

    /// Route every queued engine callback. Returns how many were handled.
    pub fn pump(&mut self) -> usize {
        let envelopes: Vec<Envelope> = self.dispatcher.drain().collect();
        let count = envelopes.len();
        for envelope in envelopes {
            self.route(envelope);
        }
        count
    }

    fn route(&mut self, envelope: Envelope) {
        let Envelope {
            attachment,
            message,
        } = envelope;
        let active = self.active_surface_id();
        let current = self.active.as_ref().map(|a| a.sink.attachment());
        match message {
            SurfaceMessage::CacheCleared { surface, result } => match result {
                Ok(()) => log::info!("{surface}: cache cleared"),
                Err(e) => log::warn!("{surface}: {e}"),
            },
            stale if current != Some(attachment) => {
                log::debug!("dropping message from stale attachment of {}", stale.surface());
            },
            SurfaceMessage::Navigation { surface, event } => {
                self.coordinator
                    .handle(surface, event, &mut self.indicator, self.host.as_mut());
            },
            SurfaceMessage::Progress { surface, value } => {
                self.tracker.on_sample(surface, value, &mut self.indicator);
            },
            SurfaceMessage::HitTest { surface, url } => {
                if let Some(url) = self.gesture.complete(surface, active, url) {
                    log::info!("{surface}: long press on {url}");
                    self.host.long_press_on_link(&url);
                }
            },
        }
    }

    // ---------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------

    pub fn active_surface_id(&self) -> Option<SurfaceId> {
        self.active.as_ref().map(|a| a.surface.id())
    }

    /// Title of the current page.
    pub fn title(&self) -> Option<String> {
        self.active.as_ref().and_then(|a| a.surface.title())
    }

    /// URL of the current page.
    pub fn url(&self) -> Option<String> {
        self.active.as_ref().and_then(|a| a.surface.url())
    }

    /// The current page as a link, when both title and URL are known.
    pub fn link(&self) -> Option<Link> {
        self.active
            .as_ref()
            .and_then(|a| Link::from_surface(a.surface.as_ref()))
    }

    pub fn can_go_back(&self) -> bool {
        self.active.as_ref().is_some_and(|a| a.surface.can_go_back())
    }

    pub fn can_go_forward(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|a| a.surface.can_go_forward())
    }

    pub fn indicator(&self) -> &ProgressIndicator {
        &self.indicator
    }

    pub fn gesture_state(&self) -> &GestureState {
        self.gesture.state()
    }

    /// Arbitration policy hosts apply to the long-press recognizer.
    pub fn long_press_policy(&self) -> RecognizerPolicy {
        self.gesture.policy()
    }

    pub fn chrome_insets(&self) -> ChromeInsets {
        self.chrome
    }

    pub fn bounds(&self) -> Rect {
        self.slot.bounds()
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        HOST_BOUNDS, HostEvent, active_handle, make_lifecycle, make_lifecycle_with,
    };
    use webpane_types::error::WebpaneError;
    use webpane_types::geometry::Point;

    const LINK_RECT: Rect = Rect::new(0.0, 100.0, 300.0, 40.0);

    fn hold(lc: &mut SurfaceLifecycle) {
        let ms = lc.config().long_press_hold_ms;
        lc.tick(ms);
    }

    // -- attach / replace / detach -------------------------------------

    #[test]
    fn attach_new_wires_and_loads_home() {
        let (mut lc, engine, log) = make_lifecycle();
        let id = lc.attach_new(None).unwrap();
        let h = engine.handle(id).unwrap();

        assert_eq!(lc.active_surface_id(), Some(id));
        assert_eq!(h.live_subscriptions(), 1);
        assert!(h.has_navigation_observer());
        assert!(h.back_forward_gestures());
        assert_eq!(h.frame(), Some(HOST_BOUNDS));
        assert_eq!(h.initial_bounds(), HOST_BOUNDS);
        assert_eq!(h.loads(), vec!["https://duckduckgo.com"]);
        assert_eq!(log.events(), vec![HostEvent::Attached(id)]);
    }

    #[test]
    fn attach_new_with_start_url() {
        let (mut lc, engine, _) = make_lifecycle();
        let id = lc.attach_new(Some("https://example.com")).unwrap();
        assert_eq!(engine.handle(id).unwrap().loads(), vec!["https://example.com"]);
    }

    #[test]
    fn attach_new_rejects_invalid_url_without_touching_state() {
        let (mut lc, engine, log) = make_lifecycle();
        let first = lc.attach_new(None).unwrap();
        let err = lc.attach_new(Some("no scheme here")).unwrap_err();
        assert!(matches!(err, WebpaneError::InvalidUrl(_)));
        assert_eq!(lc.active_surface_id(), Some(first));
        assert_eq!(engine.surfaces_created(), 1);
        assert_eq!(log.events().len(), 1);
    }

    #[test]
    fn attach_new_detaches_previous() {
        let (mut lc, engine, _) = make_lifecycle();
        let a = lc.attach_new(None).unwrap();
        let b = lc.attach_new(None).unwrap();
        let ha = engine.handle(a).unwrap();
        let hb = engine.handle(b).unwrap();

        assert_ne!(a, b);
        assert_eq!(ha.live_subscriptions(), 0);
        assert_eq!(ha.unobserve_calls(), 1);
        assert!(!ha.has_navigation_observer());
        assert!(!ha.in_view());
        assert_eq!(hb.live_subscriptions(), 1);
        assert!(hb.in_view());
    }

    #[test]
    fn replace_wires_without_navigation() {
        let (mut lc, engine, log) = make_lifecycle();
        let old = lc.attach_new(None).unwrap();

        let popup = engine.clone().create_surface(HOST_BOUNDS);
        let popup_id = lc.replace(popup);
        let hp = engine.handle(popup_id).unwrap();

        assert_eq!(lc.active_surface_id(), Some(popup_id));
        assert!(hp.loads().is_empty());
        assert_eq!(hp.live_subscriptions(), 1);
        assert!(!engine.handle(old).unwrap().in_view());
        assert_eq!(
            log.events(),
            vec![HostEvent::Attached(old), HostEvent::Attached(popup_id)]
        );
    }

    #[test]
    fn detach_returns_surface_once() {
        let (mut lc, engine, _) = make_lifecycle();
        let id = lc.attach_new(None).unwrap();
        let surface = lc.detach().unwrap();
        assert_eq!(surface.id(), id);
        assert!(lc.detach().is_none());
        assert_eq!(engine.handle(id).unwrap().unobserve_calls(), 1);
    }

    #[test]
    fn detached_surface_can_be_reattached() {
        let (mut lc, engine, _) = make_lifecycle();
        let id = lc.attach_new(None).unwrap();
        let surface = lc.detach().unwrap();
        assert_eq!(lc.replace(surface), id);
        let h = engine.handle(id).unwrap();
        assert_eq!(h.live_subscriptions(), 1);
        assert!(h.in_view());
    }

    #[test]
    fn reattached_surface_ignores_messages_from_earlier_attachment() {
        let (mut lc, engine, log) = make_lifecycle();
        let id = lc.attach_new(None).unwrap();
        let h = engine.handle(id).unwrap();

        h.begin_load();
        h.report_progress(0.6);
        let surface = lc.detach().unwrap();
        assert_eq!(lc.replace(surface), id);
        log.clear();

        assert_eq!(lc.pump(), 2);
        assert!(log.events().is_empty());
        assert_eq!(lc.indicator().value(), 0.0);
        assert_eq!(lc.indicator().alpha(), 0.0);

        // The new attachment reports normally.
        h.report_progress(0.3);
        lc.pump();
        assert!((lc.indicator().value() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn replace_hides_previous_progress() {
        let (mut lc, engine, _) = make_lifecycle();
        lc.attach_new(None).unwrap();
        let h = active_handle(&lc, &engine);
        h.begin_load();
        h.report_progress(0.6);
        lc.pump();
        assert_eq!(lc.indicator().alpha(), 1.0);

        let popup = engine.clone().create_surface(HOST_BOUNDS);
        lc.replace(popup);
        lc.tick(5000);

        assert_eq!(lc.indicator().alpha(), 0.0);
        assert_eq!(lc.indicator().value(), 0.0);
    }

    #[test]
    fn ensure_surface_is_idempotent() {
        let (mut lc, engine, _) = make_lifecycle();
        let a = lc.ensure_surface().unwrap();
        let b = lc.ensure_surface().unwrap();
        assert_eq!(a, b);
        assert_eq!(engine.surfaces_created(), 1);
    }

    // -- tear_down / reset ---------------------------------------------

    #[test]
    fn tear_down_twice_is_safe() {
        let (mut lc, engine, log) = make_lifecycle();
        let id = lc.attach_new(None).unwrap();
        let h = engine.handle(id).unwrap();

        lc.tear_down();
        lc.tear_down();

        assert_eq!(lc.active_surface_id(), None);
        assert_eq!(h.unobserve_calls(), 1);
        assert_eq!(h.cache_clears(), 1);
        assert!(!h.in_view());
        assert_eq!(
            log.events(),
            vec![HostEvent::Attached(id), HostEvent::SessionCleared]
        );
        // The cache acknowledgment still drains cleanly.
        assert_eq!(lc.pump(), 1);
    }

    #[test]
    fn reset_clears_cache_and_replaces_surface() {
        let (mut lc, engine, log) = make_lifecycle();
        let old = lc.attach_new(Some("https://example.com")).unwrap();
        let new = lc.reset().unwrap();

        assert_ne!(old, new);
        let ho = engine.handle(old).unwrap();
        let hn = engine.handle(new).unwrap();
        assert_eq!(ho.cache_clears(), 1);
        assert_eq!(ho.live_subscriptions(), 0);
        assert_eq!(hn.loads(), vec!["https://duckduckgo.com"]);
        assert_eq!(
            log.events(),
            vec![
                HostEvent::Attached(old),
                HostEvent::SessionCleared,
                HostEvent::Attached(new),
            ]
        );
    }

    #[test]
    fn reset_proceeds_when_cache_clear_fails() {
        let (mut lc, engine, _) = make_lifecycle();
        let old = lc.attach_new(None).unwrap();
        engine.handle(old).unwrap().fail_next_cache_clear("store locked");

        let new = lc.reset().unwrap();
        assert_eq!(lc.pump(), 1);
        assert_eq!(lc.active_surface_id(), Some(new));
    }

    #[test]
    fn reset_without_surface_attaches_one() {
        let (mut lc, _, log) = make_lifecycle();
        let id = lc.reset().unwrap();
        assert_eq!(log.events(), vec![HostEvent::Attached(id)]);
    }

    // -- navigation and progress ---------------------------------------

    #[test]
    fn started_then_finished_drives_indicator_and_host() {
        let (mut lc, engine, log) = make_lifecycle();
        lc.attach_new(None).unwrap();
        let h = active_handle(&lc, &engine);
        log.clear();

        assert_eq!(lc.indicator().alpha(), 0.0);
        h.begin_load();
        lc.pump();
        assert_eq!(lc.indicator().alpha(), 1.0);

        h.finish_load("DuckDuckGo");
        lc.pump();
        assert!(lc.indicator().is_fading());
        lc.tick(500);
        assert!((lc.indicator().alpha() - 0.5).abs() < 1e-6);
        lc.tick(500);
        assert_eq!(lc.indicator().alpha(), 0.0);

        assert_eq!(
            log.events(),
            vec![HostEvent::PageLoadStarted, HostEvent::PageLoadFinished]
        );
    }

    #[test]
    fn failed_navigation_reports_finished() {
        let (mut lc, engine, log) = make_lifecycle();
        lc.attach_new(None).unwrap();
        let h = active_handle(&lc, &engine);
        log.clear();

        h.begin_load();
        h.fail_load("connection refused");
        lc.pump();

        assert!(lc.indicator().is_fading());
        assert_eq!(
            log.events(),
            vec![HostEvent::PageLoadStarted, HostEvent::PageLoadFinished]
        );
    }

    #[test]
    fn progress_samples_set_indicator() {
        let (mut lc, engine, _) = make_lifecycle();
        lc.attach_new(None).unwrap();
        let h = active_handle(&lc, &engine);

        h.report_progress(0.42);
        lc.pump();
        assert!((lc.indicator().value() - 0.42).abs() < 1e-6);

        h.report_progress(1.5);
        lc.pump();
        assert_eq!(lc.indicator().value(), 1.0);
    }

    #[test]
    fn queued_events_from_replaced_surface_are_dropped() {
        let (mut lc, engine, log) = make_lifecycle();
        lc.attach_new(None).unwrap();
        let old = active_handle(&lc, &engine);

        old.begin_load();
        old.report_progress(0.7);
        lc.attach_new(None).unwrap();
        log.clear();

        assert_eq!(lc.pump(), 2);
        assert!(log.events().is_empty());
        assert_eq!(lc.indicator().value(), 0.0);
        assert_eq!(lc.indicator().alpha(), 0.0);
    }

    #[test]
    fn detached_surface_no_longer_reports() {
        let (mut lc, engine, log) = make_lifecycle();
        lc.attach_new(None).unwrap();
        let old = active_handle(&lc, &engine);
        lc.attach_new(None).unwrap();
        log.clear();

        old.begin_load();
        old.report_progress(0.3);
        assert_eq!(lc.pump(), 0);
        assert!(log.events().is_empty());
    }

    #[test]
    fn back_forward_reload() {
        let (mut lc, engine, _) = make_lifecycle();
        lc.load("https://a.com").unwrap();
        lc.load("https://b.com").unwrap();
        let h = active_handle(&lc, &engine);

        assert!(lc.can_go_back());
        assert!(!lc.can_go_forward());
        assert!(!lc.go_forward());

        assert!(lc.go_back());
        assert_eq!(lc.url().as_deref(), Some("https://a.com"));
        assert!(lc.go_forward());
        assert_eq!(h.url().as_deref(), Some("https://b.com"));

        assert!(lc.reload());
        assert_eq!(h.reloads(), 1);
    }

    #[test]
    fn controls_without_surface_are_noops() {
        let (mut lc, _, _) = make_lifecycle();
        assert!(!lc.go_back());
        assert!(!lc.go_forward());
        assert!(!lc.reload());
        assert!(!lc.clear_cache());
        assert_eq!(lc.title(), None);
        assert_eq!(lc.link(), None);
    }

    #[test]
    fn load_without_surface_attaches_blank_one() {
        let (mut lc, engine, _) = make_lifecycle();
        lc.load("https://x.com").unwrap();
        assert_eq!(active_handle(&lc, &engine).loads(), vec!["https://x.com"]);
    }

    #[test]
    fn load_rejects_invalid_url() {
        let (mut lc, engine, _) = make_lifecycle();
        assert!(lc.load("").is_err());
        assert_eq!(engine.surfaces_created(), 0);
    }

    #[test]
    fn load_home_uses_config() {
        let (mut lc, engine, _) = make_lifecycle();
        lc.load_home().unwrap();
        assert_eq!(
            active_handle(&lc, &engine).loads(),
            vec!["https://duckduckgo.com"]
        );
    }

    #[test]
    fn link_reflects_title_and_url() {
        let (mut lc, engine, _) = make_lifecycle();
        lc.attach_new(Some("https://example.com")).unwrap();
        assert_eq!(lc.link(), None);

        active_handle(&lc, &engine).finish_load("Example");
        assert_eq!(
            lc.link(),
            Some(Link::new("Example", "https://example.com"))
        );
        assert_eq!(lc.title().as_deref(), Some("Example"));
    }

    #[test]
    fn set_bounds_reframes_active_surface() {
        let (mut lc, engine, _) = make_lifecycle();
        lc.attach_new(None).unwrap();
        let bounds = Rect::new(0.0, 0.0, 667.0, 375.0);
        lc.set_bounds(bounds);
        assert_eq!(lc.bounds(), bounds);
        assert_eq!(active_handle(&lc, &engine).frame(), Some(bounds));
    }

    // -- long press ------------------------------------------------------

    #[test]
    fn touch_on_plain_content_is_not_admitted() {
        let (mut lc, engine, log) = make_lifecycle();
        lc.attach_new(None).unwrap();
        let h = active_handle(&lc, &engine);
        h.add_link(LINK_RECT, "https://link.one");
        log.clear();

        assert!(!lc.handle_touch(&TouchEvent::Down(Point::new(10.0, 10.0))));
        hold(&mut lc);
        lc.handle_touch(&TouchEvent::Up(Point::new(10.0, 10.0)));
        h.complete_hit_tests();
        lc.pump();

        assert_eq!(h.pending_hit_tests(), 0);
        assert!(log.long_presses().is_empty());
    }

    #[test]
    fn long_press_reports_async_url() {
        let (mut lc, engine, log) = make_lifecycle();
        lc.attach_new(None).unwrap();
        let h = active_handle(&lc, &engine);
        h.add_link(LINK_RECT, "https://link.one");

        assert!(lc.handle_touch(&TouchEvent::Down(Point::new(10.0, 110.0))));
        hold(&mut lc);
        assert!(matches!(lc.gesture_state(), GestureState::Began { .. }));

        // Page content changed between admission and completion.
        h.clear_links();
        h.add_link(LINK_RECT, "https://link.two");
        h.complete_hit_tests();
        lc.pump();

        assert_eq!(log.long_presses(), vec!["https://link.two".to_string()]);
    }

    #[test]
    fn long_press_respects_chrome_offset() {
        let (mut lc, engine, log) = make_lifecycle();
        lc.attach_new(None).unwrap();
        let h = active_handle(&lc, &engine);
        h.add_link(LINK_RECT, "https://link.one");
        lc.set_chrome_insets(ChromeInsets::stacked(20.0, 44.0));

        // Raw y=174 maps to surface y=110.
        assert!(lc.handle_touch(&TouchEvent::Down(Point::new(10.0, 174.0))));
        hold(&mut lc);
        h.complete_hit_tests();
        lc.pump();

        assert_eq!(log.long_presses(), vec!["https://link.one".to_string()]);
    }

    #[test]
    fn hidden_navigation_bar_leaves_status_offset() {
        let (mut lc, engine, log) = make_lifecycle();
        lc.attach_new(None).unwrap();
        let h = active_handle(&lc, &engine);
        h.add_link(LINK_RECT, "https://link.one");
        lc.embed_in_navigation_stack(44.0);
        lc.set_navigation_bar_hidden(true);
        assert_eq!(lc.chrome_insets().vertical_offset(), 20.0);

        // Raw y=130 maps to surface y=110.
        assert!(lc.handle_touch(&TouchEvent::Down(Point::new(10.0, 130.0))));
        hold(&mut lc);
        assert!(lc.handle_touch(&TouchEvent::Up(Point::new(10.0, 130.0))));
        h.complete_hit_tests();
        lc.pump();

        assert_eq!(log.long_presses(), vec!["https://link.one".to_string()]);
    }

    #[test]
    fn async_result_after_reset_is_discarded() {
        let (mut lc, engine, log) = make_lifecycle();
        lc.attach_new(None).unwrap();
        let s1 = active_handle(&lc, &engine);
        s1.add_link(LINK_RECT, "https://link.one");

        assert!(lc.handle_touch(&TouchEvent::Down(Point::new(10.0, 110.0))));
        hold(&mut lc);
        assert_eq!(s1.pending_hit_tests(), 1);

        let s2 = lc.reset().unwrap();
        assert_ne!(Some(s2), Some(s1.id()));

        s1.complete_hit_tests();
        lc.pump();

        assert!(log.long_presses().is_empty());
        assert_eq!(lc.gesture_state(), &GestureState::Idle);
    }

    #[test]
    fn configured_hold_and_gestures_apply() {
        let config = SurfaceConfig {
            long_press_hold_ms: 200,
            back_forward_gestures: false,
            ..SurfaceConfig::default()
        };
        let (mut lc, engine, log) = make_lifecycle_with(config);
        lc.attach_new(None).unwrap();
        let h = active_handle(&lc, &engine);
        assert!(!h.back_forward_gestures());
        h.add_link(LINK_RECT, "https://link.one");

        assert!(lc.handle_touch(&TouchEvent::Down(Point::new(10.0, 110.0))));
        lc.tick(200);
        h.complete_hit_tests();
        lc.pump();

        assert_eq!(log.long_presses(), vec!["https://link.one".to_string()]);
    }

    #[test]
    fn tap_on_plain_content_keeps_pending_long_press() {
        let (mut lc, engine, log) = make_lifecycle();
        lc.attach_new(None).unwrap();
        let h = active_handle(&lc, &engine);
        h.add_link(LINK_RECT, "https://link.one");

        assert!(lc.handle_touch(&TouchEvent::Down(Point::new(10.0, 110.0))));
        hold(&mut lc);
        lc.handle_touch(&TouchEvent::Up(Point::new(10.0, 110.0)));
        assert!(!lc.handle_touch(&TouchEvent::Down(Point::new(10.0, 10.0))));

        h.complete_hit_tests();
        lc.pump();

        assert_eq!(log.long_presses(), vec!["https://link.one".to_string()]);
    }

    #[test]
    fn long_press_policy_is_fixed() {
        let (lc, _, _) = make_lifecycle();
        let policy = lc.long_press_policy();
        assert!(!policy.yields_to_others);
        assert!(policy.requires_others_to_fail);
    }

    #[test]
    fn touch_without_surface_is_ignored() {
        let (mut lc, _, _) = make_lifecycle();
        assert!(!lc.handle_touch(&TouchEvent::Down(Point::new(10.0, 110.0))));
        lc.tick(1000);
    }

    #[test]
    fn short_tap_on_link_does_not_fire() {
        let (mut lc, engine, log) = make_lifecycle();
        lc.attach_new(None).unwrap();
        let h = active_handle(&lc, &engine);
        h.add_link(LINK_RECT, "https://link.one");

        assert!(lc.handle_touch(&TouchEvent::Down(Point::new(10.0, 110.0))));
        lc.tick(100);
        assert!(!lc.handle_touch(&TouchEvent::Up(Point::new(10.0, 110.0))));
        hold(&mut lc);

        assert_eq!(h.pending_hit_tests(), 0);
        assert!(log.long_presses().is_empty());
    }

    // -- invariants ------------------------------------------------------

    mod prop {
        use super::*;
        use crate::headless::HeadlessEngine;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            AttachNew,
            Replace,
            Detach,
            TearDown,
            Reset,
            Pump,
        }

        fn arb_op() -> impl Strategy<Value = Op> {
            prop_oneof![
                Just(Op::AttachNew),
                Just(Op::Replace),
                Just(Op::Detach),
                Just(Op::TearDown),
                Just(Op::Reset),
                Just(Op::Pump),
            ]
        }

        fn wired_counts(engine: &HeadlessEngine) -> (usize, usize, usize) {
            let mut subscribed = 0;
            let mut in_view = 0;
            let mut observed = 0;
            for n in 1..=engine.surfaces_created() as u64 {
                let h = engine.handle(SurfaceId(n)).unwrap();
                subscribed += h.live_subscriptions();
                in_view += usize::from(h.in_view());
                observed += usize::from(h.has_navigation_observer());
            }
            (subscribed, in_view, observed)
        }

        proptest! {
            #[test]
            fn at_most_one_surface_is_wired(ops in proptest::collection::vec(arb_op(), 1..40)) {
                let (mut lc, engine, _) = make_lifecycle();
                for op in ops {
                    match op {
                        Op::AttachNew => { lc.attach_new(None).unwrap(); },
                        Op::Replace => {
                            let surface = engine.clone().create_surface(HOST_BOUNDS);
                            lc.replace(surface);
                        },
                        Op::Detach => { lc.detach(); },
                        Op::TearDown => lc.tear_down(),
                        Op::Reset => { lc.reset().unwrap(); },
                        Op::Pump => { lc.pump(); },
                    }

                    let (subscribed, in_view, observed) = wired_counts(&engine);
                    let expected = usize::from(lc.active_surface_id().is_some());
                    prop_assert_eq!(subscribed, expected);
                    prop_assert_eq!(in_view, expected);
                    prop_assert_eq!(observed, expected);

                    if let Some(id) = lc.active_surface_id() {
                        let h = engine.handle(id).unwrap();
                        prop_assert_eq!(h.live_subscriptions(), 1);
                        prop_assert!(h.in_view());
                    }
                }
            }

            #[test]
            fn every_detached_surface_unobserved_exactly_once(
                ops in proptest::collection::vec(arb_op(), 1..40),
            ) {
                let (mut lc, engine, _) = make_lifecycle();
                for op in ops {
                    match op {
                        Op::AttachNew => { lc.attach_new(None).unwrap(); },
                        Op::Replace => {
                            let surface = engine.clone().create_surface(HOST_BOUNDS);
                            lc.replace(surface);
                        },
                        Op::Detach | Op::TearDown => lc.tear_down(),
                        Op::Reset => { lc.reset().unwrap(); },
                        Op::Pump => { lc.pump(); },
                    }
                }
                lc.tear_down();
                for n in 1..=engine.surfaces_created() as u64 {
                    let h = engine.handle(SurfaceId(n)).unwrap();
                    prop_assert_eq!(h.unobserve_calls(), 1);
                }
            }
        }
    }
}
