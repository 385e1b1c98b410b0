use js_sys::{Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{window, Element, MediaQueryList};

use crate::title_dock::{Rect, TextStyleSnapshot, Viewport};

pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

pub fn scroll_y() -> f64 {
    window().and_then(|w| w.scroll_y().ok()).unwrap_or(0.0)
}

pub fn viewport() -> Viewport {
    let fallback = Viewport::default();
    let Some(win) = window() else {
        return fallback;
    };

    let width = win
        .inner_width()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(fallback.width);
    let height = win
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(fallback.height);

    Viewport { width, height }
}

pub fn reduced_motion_query() -> Option<MediaQueryList> {
    window()?.match_media(REDUCED_MOTION_QUERY).ok().flatten()
}

pub fn prefers_reduced_motion() -> bool {
    reduced_motion_query().map(|mq| mq.matches()).unwrap_or(false)
}

/// Bounding box relative to the viewport.
pub fn client_rect(element: &Element) -> Rect {
    let rect = element.get_bounding_client_rect();
    Rect::new(rect.top(), rect.left(), rect.width(), rect.height())
}

pub fn text_style(element: &Element) -> Option<TextStyleSnapshot> {
    let style = window()?.get_computed_style(element).ok().flatten()?;
    let read = |name: &str| style.get_property_value(name).unwrap_or_default();

    Some(TextStyleSnapshot {
        font_family: read("font-family"),
        font_weight: read("font-weight"),
        font_size: read("font-size"),
        line_height: read("line-height"),
        letter_spacing: read("letter-spacing"),
        color: read("color"),
        text_rendering_hint: read("-webkit-font-smoothing"),
    })
}

/// `document.fonts.ready`, when the runtime has it.
fn fonts_ready_promise() -> Option<Promise> {
    let document: JsValue = window()?.document()?.into();
    let fonts = Reflect::get(&document, &JsValue::from_str("fonts")).ok()?;
    if fonts.is_undefined() || fonts.is_null() {
        return None;
    }

    Reflect::get(&fonts, &JsValue::from_str("ready"))
        .ok()?
        .dyn_into::<Promise>()
        .ok()
}

/// Resolves once web fonts have settled. Runtimes without the font loading
/// API resolve immediately.
pub async fn fonts_settled() {
    match fonts_ready_promise() {
        Some(promise) => {
            if JsFuture::from(promise).await.is_err() {
                tracing::debug!("fonts.ready rejected; measuring with current metrics");
            }
        }
        None => tracing::debug!("no font loading API; measuring immediately"),
    }
}

pub fn mount_dataset(mount: &Element, key: &str) -> Option<String> {
    mount
        .get_attribute(&format!("data-{key}"))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
