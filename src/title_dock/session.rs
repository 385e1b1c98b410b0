use super::config::DockConfig;
use super::frame::{plan_frame, TitleFrame};
use super::geometry::Measurement;
use super::motion::ScrollState;
use super::tracker::DockTracker;

/// Owns everything the docking title knows for one page view.
///
/// Every input re-derives progress against the current threshold and lets
/// the tracker observe it in the same update, so the completion latch is
/// already set when the next frame is planned.
#[derive(Clone, Debug, PartialEq)]
pub struct DockSession {
    tracker: DockTracker,
    scroll: ScrollState,
}

impl DockSession {
    pub fn new(config: DockConfig) -> Self {
        let tracker = DockTracker::new(config);
        let scroll = ScrollState::sample(0.0, tracker.threshold(), false);

        Self { tracker, scroll }
    }

    pub fn tracker(&self) -> &DockTracker {
        &self.tracker
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn fonts_ready(&self) -> bool {
        self.tracker.fonts_ready()
    }

    pub fn is_floating_clone_active(&self) -> bool {
        self.tracker.is_floating_clone_active(&self.scroll)
    }

    pub fn on_fonts_ready(&mut self) {
        self.tracker.fonts_resolved();
        self.resample(self.scroll.scroll_y, self.scroll.prefers_reduced_motion);
    }

    pub fn on_measurement(&mut self, measurement: Measurement) {
        let scroll_y = measurement.scroll_y;
        self.tracker.apply_measurement(measurement);
        self.resample(scroll_y, self.scroll.prefers_reduced_motion);
    }

    pub fn on_scroll(&mut self, scroll_y: f64) {
        self.resample(scroll_y, self.scroll.prefers_reduced_motion);
    }

    pub fn on_reduced_motion(&mut self, prefers_reduced_motion: bool) {
        self.resample(self.scroll.scroll_y, prefers_reduced_motion);
    }

    pub fn frame(&self) -> TitleFrame {
        plan_frame(&self.tracker, &self.scroll)
    }

    fn resample(&mut self, scroll_y: f64, prefers_reduced_motion: bool) {
        self.scroll = ScrollState::sample(scroll_y, self.tracker.threshold(), prefers_reduced_motion);
        self.tracker.observe_progress(self.scroll.progress);
    }
}
