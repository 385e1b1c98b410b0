/// Scroll offset normalized against the docking distance.
///
/// Degenerate thresholds (zero, negative, NaN) pin progress to 0 instead of
/// dividing by them.
pub fn progress_for(scroll_y: f64, threshold: f64) -> f64 {
    if !(threshold > 0.0) || !scroll_y.is_finite() {
        return 0.0;
    }

    (scroll_y / threshold).clamp(0.0, 1.0)
}

pub fn ease_in_out_cubic(x: f64) -> f64 {
    let x = x.clamp(0.0, 1.0);
    if x < 0.5 {
        4.0 * x * x * x
    } else {
        1.0 - (-2.0 * x + 2.0).powi(3) / 2.0
    }
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollState {
    pub scroll_y: f64,
    pub progress: f64,
    pub prefers_reduced_motion: bool,
}

impl ScrollState {
    pub fn sample(scroll_y: f64, threshold: f64, prefers_reduced_motion: bool) -> Self {
        Self {
            scroll_y,
            progress: progress_for(scroll_y, threshold),
            prefers_reduced_motion,
        }
    }

    /// Strictly between the two docked ends.
    pub fn is_mid_flight(&self) -> bool {
        self.progress > 0.0 && self.progress < 1.0
    }

    pub fn is_docked(&self) -> bool {
        self.progress >= 1.0
    }
}
