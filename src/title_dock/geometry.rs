use super::config::DockConfig;

/// Axis-aligned box in CSS pixels. Which coordinate space it lives in is
/// decided by the owner: the hero rect is stored in document space, the nav
/// brand rect in viewport space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Shifts a document-space rect into viewport space.
    pub fn to_viewport(self, scroll_y: f64) -> Self {
        Self {
            top: self.top - scroll_y,
            ..self
        }
    }

    /// Shifts a viewport-space rect into document space.
    pub fn to_document(self, scroll_y: f64) -> Self {
        Self {
            top: self.top + scroll_y,
            ..self
        }
    }

    /// Viewport-space overlap test; touching edges do not count.
    pub fn intersects(&self, viewport: Viewport) -> bool {
        self.has_area()
            && self.bottom() > 0.0
            && self.right() > 0.0
            && self.top < viewport.height
            && self.left < viewport.width
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Resolved text style of the hero heading, kept as the opaque strings the
/// browser reported so the clone renders with identical metrics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextStyleSnapshot {
    pub font_family: String,
    pub font_weight: String,
    pub font_size: String,
    pub line_height: String,
    pub letter_spacing: String,
    pub color: String,
    pub text_rendering_hint: String,
}

impl TextStyleSnapshot {
    pub const DEFAULT_RENDERING_HINT: &'static str = "antialiased";

    /// Inline declarations for the clone's text node.
    pub fn inline_style(&self) -> String {
        let hint = if self.text_rendering_hint.is_empty() {
            Self::DEFAULT_RENDERING_HINT
        } else {
            self.text_rendering_hint.as_str()
        };

        format!(
            "font-family: {}; font-weight: {}; font-size: {}; line-height: {}; letter-spacing: {}; color: {}; -webkit-font-smoothing: {hint};",
            self.font_family,
            self.font_weight,
            self.font_size,
            self.line_height,
            self.letter_spacing,
            self.color,
        )
    }
}

/// One read of both anchors. Absent anchors stay `None`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Measurement {
    /// Hero heading in document coordinates.
    pub source_rect: Option<Rect>,
    pub source_style: Option<TextStyleSnapshot>,
    /// Nav brand in viewport coordinates.
    pub target_rect: Option<Rect>,
    pub viewport: Viewport,
    /// Scroll offset at the moment of the read.
    pub scroll_y: f64,
}

impl Measurement {
    pub fn is_complete(&self) -> bool {
        self.source_rect.is_some() && self.source_style.is_some() && self.target_rect.is_some()
    }

    pub fn source_in_view(&self) -> bool {
        self.source_rect
            .map(|rect| rect.to_viewport(self.scroll_y).intersects(self.viewport))
            .unwrap_or(false)
    }
}

/// Scroll distance over which the title travels from hero to nav.
pub fn docking_threshold(source: Option<&Rect>, target: Option<&Rect>, config: &DockConfig) -> f64 {
    let raw = match (source, target) {
        (Some(source), Some(target)) => {
            let computed = (source.top - target.top) * config.threshold_scale;
            if computed > 0.0 {
                computed
            } else {
                config.fallback_threshold
            }
        }
        _ => config.fallback_threshold,
    };

    raw.max(config.min_threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_scales_geometric_distance() {
        let config = DockConfig::default();
        let hero = Rect::new(420.0, 32.0, 480.0, 60.0);
        let nav = Rect::new(20.0, 32.0, 150.0, 24.0);

        let threshold = docking_threshold(Some(&hero), Some(&nav), &config);
        assert!((threshold - 560.0).abs() < 1e-9);
    }

    #[test]
    fn threshold_falls_back_without_rects() {
        let config = DockConfig::default();
        let nav = Rect::new(20.0, 32.0, 150.0, 24.0);

        assert_eq!(docking_threshold(None, Some(&nav), &config), 700.0);
        assert_eq!(docking_threshold(None, None, &config), 700.0);
    }

    #[test]
    fn overlapping_anchors_use_fallback_not_negative_distance() {
        let config = DockConfig::default();
        let hero = Rect::new(10.0, 0.0, 480.0, 60.0);
        let nav = Rect::new(20.0, 0.0, 150.0, 24.0);

        assert_eq!(docking_threshold(Some(&hero), Some(&nav), &config), 700.0);
    }

    #[test]
    fn short_distance_is_floored_at_minimum() {
        let config = DockConfig::default();
        let hero = Rect::new(100.0, 0.0, 480.0, 60.0);
        let nav = Rect::new(20.0, 0.0, 150.0, 24.0);

        assert_eq!(docking_threshold(Some(&hero), Some(&nav), &config), 250.0);
    }

    #[test]
    fn intersection_respects_viewport_edges() {
        let viewport = Viewport {
            width: 800.0,
            height: 600.0,
        };

        assert!(Rect::new(100.0, 10.0, 200.0, 40.0).intersects(viewport));
        assert!(!Rect::new(600.0, 10.0, 200.0, 40.0).intersects(viewport));
        assert!(!Rect::new(-40.0, 10.0, 200.0, 40.0).intersects(viewport));
        assert!(!Rect::new(100.0, 10.0, 0.0, 40.0).intersects(viewport));
    }

    #[test]
    fn deep_link_measurement_sees_source_out_of_view() {
        let measurement = Measurement {
            source_rect: Some(Rect::new(300.0, 24.0, 400.0, 56.0)),
            source_style: Some(TextStyleSnapshot::default()),
            target_rect: Some(Rect::new(20.0, 24.0, 150.0, 24.0)),
            viewport: Viewport {
                width: 1024.0,
                height: 768.0,
            },
            scroll_y: 2_400.0,
        };

        assert!(measurement.is_complete());
        assert!(!measurement.source_in_view());
    }

    #[test]
    fn inline_style_copies_values_verbatim() {
        let style = TextStyleSnapshot {
            font_family: "\"JetBrains Mono\", monospace".to_string(),
            font_weight: "600".to_string(),
            font_size: "60px".to_string(),
            line_height: "75px".to_string(),
            letter_spacing: "normal".to_string(),
            color: "rgb(10, 10, 10)".to_string(),
            text_rendering_hint: String::new(),
        };

        let css = style.inline_style();
        assert!(css.contains("font-family: \"JetBrains Mono\", monospace;"));
        assert!(css.contains("font-weight: 600;"));
        assert!(css.contains("line-height: 75px;"));
        assert!(css.contains("color: rgb(10, 10, 10);"));
        assert!(css.ends_with("-webkit-font-smoothing: antialiased;"));
    }
}
