use super::config::DockConfig;
use super::geometry::{docking_threshold, Measurement, Rect, TextStyleSnapshot};
use super::motion::ScrollState;

/// Two-slot anchor table. Slots only change through the register calls.
#[derive(Debug)]
pub struct AnchorSlots<H> {
    source: Option<H>,
    target: Option<H>,
}

impl<H> Default for AnchorSlots<H> {
    fn default() -> Self {
        Self {
            source: None,
            target: None,
        }
    }
}

impl<H> AnchorSlots<H> {
    pub fn register_source(&mut self, handle: Option<H>) {
        self.source = handle;
    }

    pub fn register_target(&mut self, handle: Option<H>) {
        self.target = handle;
    }

    pub fn source(&self) -> Option<&H> {
        self.source.as_ref()
    }

    pub fn target(&self) -> Option<&H> {
        self.target.as_ref()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DockPhase {
    Unmeasured,
    Measuring,
    Tracking { eligible: bool },
    Completed,
}

/// Page-lifetime flags. The last two are latches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnimationEligibility {
    pub fonts_ready: bool,
    pub source_was_visible: bool,
    pub animation_has_completed: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DockTracker {
    config: DockConfig,
    eligibility: AnimationEligibility,
    tracking: bool,
    source_rect: Option<Rect>,
    target_rect: Option<Rect>,
    source_style: Option<TextStyleSnapshot>,
}

impl DockTracker {
    pub fn new(config: DockConfig) -> Self {
        Self {
            config,
            eligibility: AnimationEligibility::default(),
            tracking: false,
            source_rect: None,
            target_rect: None,
            source_style: None,
        }
    }

    pub fn config(&self) -> &DockConfig {
        &self.config
    }

    pub fn eligibility(&self) -> AnimationEligibility {
        self.eligibility
    }

    pub fn fonts_ready(&self) -> bool {
        self.eligibility.fonts_ready
    }

    pub fn animation_has_completed(&self) -> bool {
        self.eligibility.animation_has_completed
    }

    pub fn source_rect(&self) -> Option<&Rect> {
        self.source_rect.as_ref()
    }

    pub fn target_rect(&self) -> Option<&Rect> {
        self.target_rect.as_ref()
    }

    pub fn source_style(&self) -> Option<&TextStyleSnapshot> {
        self.source_style.as_ref()
    }

    pub fn phase(&self) -> DockPhase {
        if self.eligibility.animation_has_completed {
            DockPhase::Completed
        } else if self.tracking {
            DockPhase::Tracking {
                eligible: self.eligibility.source_was_visible,
            }
        } else if self.eligibility.fonts_ready {
            DockPhase::Measuring
        } else {
            DockPhase::Unmeasured
        }
    }

    /// Font metrics are final (or the runtime cannot tell us).
    pub fn fonts_resolved(&mut self) {
        if self.eligibility.fonts_ready {
            return;
        }
        self.eligibility.fonts_ready = true;
        tracing::debug!(phase = ?self.phase(), "fonts resolved");
    }

    pub fn apply_measurement(&mut self, measurement: Measurement) {
        if !self.eligibility.fonts_ready {
            tracing::debug!("measurement before fonts resolved, dropped");
            return;
        }

        let first_complete = !self.tracking && measurement.is_complete();
        let source_in_view = measurement.source_in_view();

        self.source_rect = measurement.source_rect;
        self.source_style = measurement.source_style;
        self.target_rect = measurement.target_rect;

        if first_complete {
            self.tracking = true;
            if source_in_view {
                self.eligibility.source_was_visible = true;
            }
            tracing::debug!(
                eligible = self.eligibility.source_was_visible,
                scroll_y = measurement.scroll_y,
                "first measurement of both anchors"
            );
        }

        tracing::debug!(
            threshold = self.threshold(),
            has_source = self.source_rect.is_some(),
            has_target = self.target_rect.is_some(),
            "anchors measured"
        );
    }

    /// Latches completion the first time an eligible animation reaches the
    /// nav. Returns `true` only on the call that latched.
    pub fn observe_progress(&mut self, progress: f64) -> bool {
        if self.eligibility.animation_has_completed
            || !self.eligibility.source_was_visible
            || progress < 1.0
        {
            return false;
        }

        self.eligibility.animation_has_completed = true;
        tracing::info!("title docked; floating clone retired for this page view");
        true
    }

    pub fn threshold(&self) -> f64 {
        docking_threshold(
            self.source_rect.as_ref(),
            self.target_rect.as_ref(),
            &self.config,
        )
    }

    pub fn is_floating_clone_active(&self, scroll: &ScrollState) -> bool {
        !scroll.prefers_reduced_motion
            && self.eligibility.fonts_ready
            && self.eligibility.source_was_visible
            && !self.eligibility.animation_has_completed
            && scroll.is_mid_flight()
    }
}
