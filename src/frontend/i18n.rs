use super::local_storage;
pub use crate::locale::Locale;

const LOCALE_KEY: &str = "preferred-locale";

pub fn resolve_locale() -> Locale {
    local_storage()
        .and_then(|storage| storage.get_item(LOCALE_KEY).ok().flatten())
        .and_then(|value| Locale::from_str(&value))
        .unwrap_or(Locale::En)
}

pub fn persist_locale(locale: Locale) {
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(LOCALE_KEY, locale.as_str());
    }
    apply_document_lang(locale);
}

/// Mirrors the active locale onto `<html lang>`.
pub fn apply_document_lang(locale: Locale) {
    if let Some(root) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    {
        let _ = root.set_attribute("lang", locale.as_str());
    }
}
