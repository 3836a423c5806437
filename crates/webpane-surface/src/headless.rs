//! In-memory render engine.
//!
//! [`HeadlessEngine`] implements the engine traits without rendering
//! anything. Surfaces keep a back/forward history, a list of link regions
//! for hit testing, and their registered callbacks. A
//! [`HeadlessHandle`] lets the caller play the engine's side: start and
//! finish navigations, push progress samples, complete pending hit tests.
//! The demo binary scripts a browsing session with it and the test suites
//! use it as their engine.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use webpane_types::geometry::{Point, Rect, SurfacePoint};

use crate::engine::{
    CacheClearCallback, CacheError, HitTestCallback, NavigationError, NavigationObserver,
    ProgressCallback, RenderEngine, SubscriptionId, Surface, SurfaceId,
};

// -----------------------------------------------------------------------
// History
// -----------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Page {
    url: String,
    title: Option<String>,
}

/// Back/forward stacks around the current page.
#[derive(Debug, Default)]
struct History {
    back_stack: Vec<Page>,
    forward_stack: Vec<Page>,
    current: Option<Page>,
}

impl History {
    /// Push the current page to the back stack and clear forward history.
    fn navigate(&mut self, url: &str) {
        if let Some(page) = self.current.take() {
            self.back_stack.push(page);
        }
        self.forward_stack.clear();
        self.current = Some(Page {
            url: url.to_string(),
            title: None,
        });
    }

    fn go_back(&mut self) -> Option<&Page> {
        let prev = self.back_stack.pop()?;
        if let Some(current) = self.current.take() {
            self.forward_stack.push(current);
        }
        self.current = Some(prev);
        self.current.as_ref()
    }

    fn go_forward(&mut self) -> Option<&Page> {
        let next = self.forward_stack.pop()?;
        if let Some(current) = self.current.take() {
            self.back_stack.push(current);
        }
        self.current = Some(next);
        self.current.as_ref()
    }

    fn can_go_back(&self) -> bool {
        !self.back_stack.is_empty()
    }

    fn can_go_forward(&self) -> bool {
        !self.forward_stack.is_empty()
    }
}

// -----------------------------------------------------------------------
// Shared surface state
// -----------------------------------------------------------------------

#[derive(Default)]
struct SurfaceState {
    history: History,
    progress: f64,
    initial_bounds: Rect,
    frame: Option<Rect>,
    back_forward_gestures: bool,
    subscriptions: Vec<(SubscriptionId, ProgressCallback)>,
    next_subscription: u64,
    unobserve_calls: usize,
    observer: Option<Box<dyn NavigationObserver>>,
    links: Vec<(Rect, String)>,
    pending_hit_tests: Vec<(SurfacePoint, HitTestCallback)>,
    loads: Vec<String>,
    reloads: usize,
    cache_clears: usize,
    cache_failure: Option<String>,
}

impl SurfaceState {
    fn link_at(&self, point: SurfacePoint) -> Option<String> {
        let p = Point::new(point.x as f32, point.y as f32);
        self.links
            .iter()
            .find(|(rect, _)| rect.contains(p))
            .map(|(_, url)| url.clone())
    }
}

type SharedState = Arc<Mutex<SurfaceState>>;

// -----------------------------------------------------------------------
// HeadlessEngine
// -----------------------------------------------------------------------

#[derive(Default)]
struct EngineState {
    next_id: u64,
    surfaces: HashMap<SurfaceId, SharedState>,
}

/// Engine whose surfaces live in memory. Clones share the same surfaces.
#[derive(Clone, Default)]
pub struct HeadlessEngine {
    state: Arc<Mutex<EngineState>>,
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine-side handle to a surface created by this engine.
    pub fn handle(&self, id: SurfaceId) -> Option<HeadlessHandle> {
        let state = self.state.lock();
        state.surfaces.get(&id).map(|shared| HeadlessHandle {
            id,
            state: Arc::clone(shared),
        })
    }

    pub fn surfaces_created(&self) -> usize {
        self.state.lock().surfaces.len()
    }
}

impl RenderEngine for HeadlessEngine {
    fn create_surface(&mut self, bounds: Rect) -> Box<dyn Surface> {
        let mut engine = self.state.lock();
        engine.next_id += 1;
        let id = SurfaceId(engine.next_id);
        let shared: SharedState = Arc::new(Mutex::new(SurfaceState {
            initial_bounds: bounds,
            ..SurfaceState::default()
        }));
        engine.surfaces.insert(id, Arc::clone(&shared));
        log::debug!("headless: created {id}");
        Box::new(HeadlessSurface { id, state: shared })
    }
}

// -----------------------------------------------------------------------
// HeadlessSurface
// -----------------------------------------------------------------------

struct HeadlessSurface {
    id: SurfaceId,
    state: SharedState,
}

impl Surface for HeadlessSurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn url(&self) -> Option<String> {
        self.state.lock().history.current.as_ref().map(|p| p.url.clone())
    }

    fn title(&self) -> Option<String> {
        self.state
            .lock()
            .history
            .current
            .as_ref()
            .and_then(|p| p.title.clone())
    }

    fn can_go_back(&self) -> bool {
        self.state.lock().history.can_go_back()
    }

    fn can_go_forward(&self) -> bool {
        self.state.lock().history.can_go_forward()
    }

    fn estimated_progress(&self) -> f64 {
        self.state.lock().progress
    }

    fn load(&mut self, url: &str) {
        let mut state = self.state.lock();
        state.history.navigate(url);
        state.progress = 0.0;
        state.loads.push(url.to_string());
    }

    fn go_back(&mut self) {
        let mut state = self.state.lock();
        if let Some(url) = state.history.go_back().map(|p| p.url.clone()) {
            state.loads.push(url);
        }
    }

    fn go_forward(&mut self) {
        let mut state = self.state.lock();
        if let Some(url) = state.history.go_forward().map(|p| p.url.clone()) {
            state.loads.push(url);
        }
    }

    fn reload(&mut self) {
        self.state.lock().reloads += 1;
    }

    fn observe_progress(&mut self, callback: ProgressCallback) -> SubscriptionId {
        let mut state = self.state.lock();
        state.next_subscription += 1;
        let handle = SubscriptionId(state.next_subscription);
        state.subscriptions.push((handle, callback));
        handle
    }

    fn unobserve(&mut self, subscription: SubscriptionId) {
        let mut state = self.state.lock();
        state.unobserve_calls += 1;
        state.subscriptions.retain(|(id, _)| *id != subscription);
    }

    fn set_navigation_observer(&mut self, observer: Box<dyn NavigationObserver>) {
        self.state.lock().observer = Some(observer);
    }

    fn clear_navigation_observer(&mut self) {
        self.state.lock().observer = None;
    }

    fn hit_test_async(&self, point: SurfacePoint, completion: HitTestCallback) {
        self.state.lock().pending_hit_tests.push((point, completion));
    }

    fn hit_test_sync(&self, point: SurfacePoint) -> Option<String> {
        self.state.lock().link_at(point)
    }

    fn clear_cache(&mut self, completion: CacheClearCallback) {
        let result = {
            let mut state = self.state.lock();
            state.cache_clears += 1;
            match state.cache_failure.take() {
                Some(reason) => Err(CacheError(reason)),
                None => Ok(()),
            }
        };
        completion(result);
    }

    fn set_frame(&mut self, frame: Rect) {
        self.state.lock().frame = Some(frame);
    }

    fn remove_from_view(&mut self) {
        self.state.lock().frame = None;
    }

    fn set_back_forward_gestures(&mut self, enabled: bool) {
        self.state.lock().back_forward_gestures = enabled;
    }
}

// -----------------------------------------------------------------------
// HeadlessHandle
// -----------------------------------------------------------------------

/// Engine-side view of a headless surface.
#[derive(Clone)]
pub struct HeadlessHandle {
    id: SurfaceId,
    state: SharedState,
}

impl HeadlessHandle {
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    // ---------------------------------------------------------------
    // Page content
    // ---------------------------------------------------------------

    /// Add a link region in surface coordinates.
    pub fn add_link(&self, rect: Rect, url: &str) {
        self.state.lock().links.push((rect, url.to_string()));
    }

    pub fn clear_links(&self) {
        self.state.lock().links.clear();
    }

    // ---------------------------------------------------------------
    // Engine-side events
    // ---------------------------------------------------------------

    pub fn begin_load(&self) {
        if let Some(observer) = self.state.lock().observer.as_mut() {
            observer.on_started();
        }
    }

    /// Push a progress sample to every live subscription.
    pub fn report_progress(&self, progress: f64) {
        let mut state = self.state.lock();
        state.progress = progress;
        for (_, callback) in state.subscriptions.iter_mut() {
            callback(progress);
        }
    }

    /// Commit the current page with `title` and report success.
    pub fn finish_load(&self, title: &str) {
        let mut state = self.state.lock();
        if let Some(page) = state.history.current.as_mut() {
            page.title = Some(title.to_string());
        }
        if let Some(observer) = state.observer.as_mut() {
            observer.on_finished();
        }
    }

    pub fn fail_load(&self, reason: &str) {
        if let Some(observer) = self.state.lock().observer.as_mut() {
            observer.on_failed(NavigationError::new(reason));
        }
    }

    /// Answer every pending async hit test against the current link
    /// regions. Returns how many were answered.
    pub fn complete_hit_tests(&self) -> usize {
        let answered: Vec<(Option<String>, HitTestCallback)> = {
            let mut state = self.state.lock();
            let pending = std::mem::take(&mut state.pending_hit_tests);
            pending
                .into_iter()
                .map(|(point, callback)| (state.link_at(point), callback))
                .collect()
        };
        let count = answered.len();
        for (url, callback) in answered {
            callback(url);
        }
        count
    }

    /// Make the next cache clear report failure.
    pub fn fail_next_cache_clear(&self, reason: &str) {
        self.state.lock().cache_failure = Some(reason.to_string());
    }

    // ---------------------------------------------------------------
    // Inspection
    // ---------------------------------------------------------------

    pub fn url(&self) -> Option<String> {
        self.state.lock().history.current.as_ref().map(|p| p.url.clone())
    }

    pub fn initial_bounds(&self) -> Rect {
        self.state.lock().initial_bounds
    }

    /// Frame in the host view, or `None` when not in the view.
    pub fn frame(&self) -> Option<Rect> {
        self.state.lock().frame
    }

    pub fn in_view(&self) -> bool {
        self.state.lock().frame.is_some()
    }

    pub fn live_subscriptions(&self) -> usize {
        self.state.lock().subscriptions.len()
    }

    pub fn unobserve_calls(&self) -> usize {
        self.state.lock().unobserve_calls
    }

    pub fn has_navigation_observer(&self) -> bool {
        self.state.lock().observer.is_some()
    }

    pub fn back_forward_gestures(&self) -> bool {
        self.state.lock().back_forward_gestures
    }

    pub fn pending_hit_tests(&self) -> usize {
        self.state.lock().pending_hit_tests.len()
    }

    /// URLs requested via load/back/forward, oldest first.
    pub fn loads(&self) -> Vec<String> {
        self.state.lock().loads.clone()
    }

    pub fn reloads(&self) -> usize {
        self.state.lock().reloads
    }

    pub fn cache_clears(&self) -> usize {
        self.state.lock().cache_clears
    }
}
