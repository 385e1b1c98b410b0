use super::geometry::{Rect, TextStyleSnapshot};
use super::motion::{ease_in_out_cubic, lerp, ScrollState};
use super::tracker::DockTracker;

const CLONE_Z_INDEX: u32 = 60;

/// Which of the three title renderings is on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TitleOwner {
    Source,
    Clone,
    Target,
}

/// Geometry of the floating clone for one render pass.
#[derive(Clone, Debug, PartialEq)]
pub struct ClonePlan {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub style: TextStyleSnapshot,
}

impl ClonePlan {
    /// `None` when the source has no area to scale from.
    pub fn interpolate(
        source: &Rect,
        target: &Rect,
        scroll_y: f64,
        progress: f64,
        style: &TextStyleSnapshot,
    ) -> Option<Self> {
        if !source.has_area() {
            return None;
        }

        let t = ease_in_out_cubic(progress);
        let origin = source.to_viewport(scroll_y);

        Some(Self {
            top: origin.top,
            left: origin.left,
            width: source.width,
            height: source.height,
            translate_x: (target.left - origin.left) * t,
            translate_y: (target.top - origin.top) * t,
            scale_x: lerp(1.0, target.width / source.width, t),
            scale_y: lerp(1.0, target.height / source.height, t),
            style: style.clone(),
        })
    }

    pub fn transform(&self) -> String {
        format!(
            "translate3d({:.3}px, {:.3}px, 0) scale({:.5}, {:.5})",
            self.translate_x, self.translate_y, self.scale_x, self.scale_y
        )
    }

    pub fn container_style(&self, revealed: bool) -> String {
        let opacity = if revealed { 1 } else { 0 };
        let will_change = if revealed {
            " will-change: transform, opacity;"
        } else {
            ""
        };

        format!(
            "position: fixed; top: {:.2}px; left: {:.2}px; width: {:.2}px; height: {:.2}px; z-index: {CLONE_Z_INDEX}; pointer-events: none; transform-origin: top left; transform: {}; opacity: {opacity};{will_change}",
            self.top,
            self.left,
            self.width,
            self.height,
            self.transform(),
        )
    }

    pub fn text_style(&self) -> String {
        format!("display: block; white-space: nowrap; {}", self.style.inline_style())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TitleFrame {
    pub owner: TitleOwner,
    pub clone: Option<ClonePlan>,
}

impl TitleFrame {
    fn owned_by(owner: TitleOwner) -> Self {
        Self { owner, clone: None }
    }

    pub fn source_visible(&self) -> bool {
        self.owner == TitleOwner::Source
    }

    pub fn target_visible(&self) -> bool {
        self.owner == TitleOwner::Target
    }

    pub fn clone_mounted(&self) -> bool {
        self.clone.is_some()
    }

    pub fn visible_count(&self) -> usize {
        [self.source_visible(), self.target_visible(), self.clone_mounted()]
            .into_iter()
            .filter(|visible| *visible)
            .count()
    }
}

/// Resolves the single visible title for the current state.
///
/// Before fonts resolve the real heading stays put. While the clone is active
/// and fully measured it covers both real elements; an active clone with
/// missing geometry is skipped for the pass and the heading shows instead.
/// At or past the dock point the nav brand owns the title, provided it has
/// been measured; otherwise the heading keeps it.
pub fn plan_frame(tracker: &DockTracker, scroll: &ScrollState) -> TitleFrame {
    if !tracker.fonts_ready() {
        return TitleFrame::owned_by(TitleOwner::Source);
    }

    if tracker.is_floating_clone_active(scroll) {
        let plan = match (
            tracker.source_rect(),
            tracker.target_rect(),
            tracker.source_style(),
        ) {
            (Some(source), Some(target), Some(style)) => {
                ClonePlan::interpolate(source, target, scroll.scroll_y, scroll.progress, style)
            }
            _ => None,
        };

        return match plan {
            Some(plan) => TitleFrame {
                owner: TitleOwner::Clone,
                clone: Some(plan),
            },
            None => TitleFrame::owned_by(TitleOwner::Source),
        };
    }

    if scroll.is_docked() && tracker.target_rect().is_some() {
        return TitleFrame::owned_by(TitleOwner::Target);
    }

    TitleFrame::owned_by(TitleOwner::Source)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> TextStyleSnapshot {
        TextStyleSnapshot {
            font_family: "Inter".to_string(),
            font_weight: "600".to_string(),
            font_size: "60px".to_string(),
            line_height: "66px".to_string(),
            letter_spacing: "-0.5px".to_string(),
            color: "rgb(17, 17, 17)".to_string(),
            text_rendering_hint: "antialiased".to_string(),
        }
    }

    #[test]
    fn endpoints_land_on_source_and_target() {
        let source = Rect::new(400.0, 40.0, 480.0, 60.0);
        let target = Rect::new(20.0, 24.0, 160.0, 24.0);

        let start = ClonePlan::interpolate(&source, &target, 0.0, 0.0, &style()).expect("plan");
        assert_eq!((start.translate_x, start.translate_y), (0.0, 0.0));
        assert_eq!((start.scale_x, start.scale_y), (1.0, 1.0));

        let end = ClonePlan::interpolate(&source, &target, 560.0, 1.0, &style()).expect("plan");
        assert!((end.top + end.translate_y - target.top).abs() < 1e-9);
        assert!((end.left + end.translate_x - target.left).abs() < 1e-9);
        assert!((end.width * end.scale_x - target.width).abs() < 1e-9);
        assert!((end.height * end.scale_y - target.height).abs() < 1e-9);
    }

    #[test]
    fn zero_area_source_yields_no_plan() {
        let source = Rect::new(400.0, 40.0, 0.0, 60.0);
        let target = Rect::new(20.0, 24.0, 160.0, 24.0);

        assert!(ClonePlan::interpolate(&source, &target, 0.0, 0.5, &style()).is_none());
    }

    #[test]
    fn container_style_is_gated_by_reveal() {
        let source = Rect::new(400.0, 40.0, 480.0, 60.0);
        let target = Rect::new(20.0, 24.0, 160.0, 24.0);
        let plan = ClonePlan::interpolate(&source, &target, 100.0, 0.3, &style()).expect("plan");

        let hidden = plan.container_style(false);
        let shown = plan.container_style(true);
        assert!(hidden.contains("opacity: 0;"));
        assert!(!hidden.contains("will-change"));
        assert!(shown.contains("opacity: 1;"));
        assert!(shown.contains("transform-origin: top left;"));
        assert!(shown.contains("pointer-events: none;"));
        assert!(plan.text_style().contains("letter-spacing: -0.5px;"));
    }
}
