mod contact;
mod dock;
mod dom;
mod floating_title;
mod i18n;

use std::cell::Cell;
use std::rc::Rc;

use js_sys::{Function, Reflect};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{window, Storage};
use yew::prelude::*;

use crate::title_dock::DockConfig;
use contact::ContactForm;
use dock::{use_dock, use_dock_anchor, DockProvider};
use floating_title::FloatingTitle;
use i18n::{apply_document_lang, persist_locale, resolve_locale, Locale};

const THEME_KEY: &str = "portfolio-theme";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    fn from_str(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    fn toggle_label(self) -> String {
        let next = self.toggled().as_str();
        format!("Switch to {next} theme")
    }

    fn pressed(self) -> bool {
        matches!(self, Self::Dark)
    }

    fn icon(self) -> &'static str {
        match self {
            Self::Light => "◐",
            Self::Dark => "◑",
        }
    }
}

pub(crate) fn local_storage() -> Option<Storage> {
    window()?.local_storage().ok().flatten()
}

fn read_stored_theme() -> Option<Theme> {
    let value = local_storage()?.get_item(THEME_KEY).ok().flatten()?;
    Theme::from_str(&value)
}

fn system_prefers_dark() -> bool {
    window()
        .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

fn resolve_theme() -> Theme {
    read_stored_theme().unwrap_or_else(|| {
        if system_prefers_dark() {
            Theme::Dark
        } else {
            Theme::Light
        }
    })
}

fn apply_theme(theme: Theme) {
    if let Some(document) = window().and_then(|w| w.document()) {
        if let Some(root) = document.document_element() {
            let _ = root.set_attribute("data-theme", theme.as_str());
        }
    }
}

/// Applies `theme`, inside a view transition when the browser offers one.
/// `on_applied` fires once `data-theme` has actually changed, which with a
/// transition is only after the old state has been captured.
fn apply_theme_with_transition(theme: Theme, on_applied: Callback<Theme>) {
    let commit = move || {
        apply_theme(theme);
        on_applied.emit(theme);
    };

    if dom::prefers_reduced_motion() {
        commit();
        return;
    }

    let Some(document) = window().and_then(|w| w.document()) else {
        commit();
        return;
    };

    let document_js: JsValue = document.into();
    let Ok(start_view_transition) =
        Reflect::get(&document_js, &JsValue::from_str("startViewTransition"))
    else {
        commit();
        return;
    };

    let Some(start_view_transition) = start_view_transition.dyn_ref::<Function>() else {
        commit();
        return;
    };

    let committed = Rc::new(Cell::new(false));
    let callback = {
        let committed = committed.clone();
        let commit = commit.clone();
        Closure::once_into_js(move || {
            committed.set(true);
            commit();
        })
    };

    if start_view_transition.call1(&document_js, &callback).is_err() && !committed.get() {
        commit();
    }
}

fn persist_theme(theme: Theme) {
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(THEME_KEY, theme.as_str());
    }
}

#[derive(Properties, PartialEq)]
struct ExternalLinkProps {
    href: AttrValue,
    label: AttrValue,
}

#[function_component(ExternalLink)]
fn external_link(props: &ExternalLinkProps) -> Html {
    html! {
        <a class="link" href={props.href.clone()} target="_blank" rel="noopener noreferrer">
            {props.label.clone()}
            <span class="external-mark" aria-hidden="true">{"↗"}</span>
            <span class="sr-only">{" (opens in a new tab)"}</span>
        </a>
    }
}

/// Inline so the swap holds even before the stylesheet loads.
fn conceal(visible: bool) -> Option<&'static str> {
    (!visible).then_some("opacity: 0;")
}

#[derive(Properties, PartialEq)]
struct NavigationProps {
    locale: Locale,
    theme: Theme,
    on_toggle_theme: Callback<()>,
    on_toggle_locale: Callback<()>,
}

#[function_component(Navigation)]
fn navigation(props: &NavigationProps) -> Html {
    let dock = use_dock();
    let brand_ref = use_dock_anchor(dock.register_target.clone());
    let locale = props.locale;
    let theme = props.theme;

    let on_theme = {
        let on_toggle_theme = props.on_toggle_theme.clone();
        Callback::from(move |_| on_toggle_theme.emit(()))
    };
    let on_locale = {
        let on_toggle_locale = props.on_toggle_locale.clone();
        Callback::from(move |_| on_toggle_locale.emit(()))
    };

    html! {
        <nav class="site-nav">
            <a
                class={classes!("nav-brand", (!dock.frame.target_visible()).then_some("is-concealed"))}
                style={conceal(dock.frame.target_visible())}
                href="/"
            >
                <span ref={brand_ref}>{locale.t("hero.name")}</span>
            </a>
            <ul class="nav-links">
                <li><a href="#about">{locale.t("navigation.about")}</a></li>
                <li><a href="#projects">{locale.t("navigation.projects")}</a></li>
                <li><a href="#contact">{locale.t("navigation.contact")}</a></li>
            </ul>
            <div class="nav-controls">
                <button
                    class="theme-toggle"
                    type="button"
                    aria-label={theme.toggle_label()}
                    aria-pressed={theme.pressed().to_string()}
                    onclick={on_theme}
                >
                    <span aria-hidden="true">{theme.icon()}</span>
                </button>
                <button class="locale-toggle" type="button" onclick={on_locale}>
                    {locale.switch_label()}
                </button>
            </div>
        </nav>
    }
}

#[derive(Properties, PartialEq)]
struct HeroProps {
    locale: Locale,
}

#[function_component(Hero)]
fn hero(props: &HeroProps) -> Html {
    let dock = use_dock();
    let title_ref = use_dock_anchor(dock.register_source.clone());
    let locale = props.locale;

    html! {
        <header class="hero" aria-labelledby="identity-heading">
            <h1
                id="identity-heading"
                ref={title_ref}
                class={classes!("hero-title", (!dock.frame.source_visible()).then_some("is-concealed"))}
                style={conceal(dock.frame.source_visible())}
            >
                {locale.t("hero.name")}
            </h1>
            <h2 class="hero-subtitle">{locale.t("hero.title")}</h2>
            <p class="muted">{locale.t("hero.description")}</p>
            <div class="hero-actions">
                <a class="button" href="#projects">{locale.t("hero.cta.projects")}</a>
                <ExternalLink href={locale.resume_url()} label={locale.t("hero.cta.resume").to_string()} />
            </div>
            <a class="scroll-hint" href="#about">{locale.t("hero.scroll")}</a>
        </header>
    }
}

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub config: DockConfig,
}

#[function_component(App)]
fn app(props: &AppProps) -> Html {
    let theme = use_state(resolve_theme);
    // Trails `theme` until the document carries the new `data-theme`. The
    // dock remeasures on this one, so copied colours are never stale.
    let applied_theme = use_state_eq(|| *theme);
    let locale = use_state(resolve_locale);

    {
        let current = *theme;
        let current_locale = *locale;
        use_effect_with((), move |_| {
            apply_theme(current);
            apply_document_lang(current_locale);
            || ()
        });
    }

    let on_toggle_theme = {
        let theme = theme.clone();
        let on_applied = {
            let applied_theme = applied_theme.clone();
            Callback::from(move |applied: Theme| applied_theme.set(applied))
        };
        Callback::from(move |_| {
            let next = (*theme).toggled();
            persist_theme(next);
            theme.set(next);
            apply_theme_with_transition(next, on_applied.clone());
        })
    };

    let on_toggle_locale = {
        let locale = locale.clone();
        Callback::from(move |_| {
            let next = (*locale).toggled();
            persist_locale(next);
            locale.set(next);
        })
    };

    let current_locale = *locale;

    html! {
        <DockProvider config={props.config} locale={current_locale} theme={*applied_theme}>
            <a class="skip-link" href="#content">{"Skip to main content"}</a>
            <Navigation
                locale={current_locale}
                theme={*theme}
                on_toggle_theme={on_toggle_theme}
                on_toggle_locale={on_toggle_locale}
            />
            <div class="page-shell">
                <Hero locale={current_locale} />

                <main id="content">
                    <section id="about" aria-labelledby="about-heading" class="section-block">
                        <h2 id="about-heading">{current_locale.t("about.title")}</h2>
                        <p>{current_locale.t("about.body")}</p>
                    </section>

                    <section id="projects" aria-labelledby="projects-heading" class="section-block">
                        <h2 id="projects-heading">{current_locale.t("projects.title")}</h2>
                        <ul class="row-list">
                            <li>
                                <strong>{"Stockwise"}</strong>
                                <span class="muted">{" — "}{current_locale.t("projects.inventory")}</span>
                            </li>
                            <li>
                                <strong>{"DocFlow"}</strong>
                                <span class="muted">{" — "}{current_locale.t("projects.automation")}</span>
                            </li>
                            <li>
                                <strong>{"Inspecta"}</strong>
                                <span class="muted">{" — "}{current_locale.t("projects.vision")}</span>
                            </li>
                        </ul>
                    </section>

                    <section id="contact" aria-labelledby="contact-heading" class="section-block">
                        <h2 id="contact-heading">{current_locale.t("contact.title")}</h2>
                        <ContactForm locale={current_locale} />
                    </section>
                </main>
            </div>
            <FloatingTitle text={current_locale.t("hero.name").to_string()} />
        </DockProvider>
    }
}

pub fn run() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    let mount = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id("app"))
        .expect("missing #app mount point");
    let config = DockConfig::from_lookup(|key| dom::mount_dataset(&mount, key));
    tracing::debug!(?config, "dock config resolved");

    yew::Renderer::<App>::with_root_and_props(mount, AppProps { config }).render();
}
