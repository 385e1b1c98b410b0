use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use gloo::render::{request_animation_frame, AnimationFrame};
use gloo::timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{window, Element, MediaQueryListEvent};
use yew::prelude::*;

use super::dom;
use super::i18n::Locale;
use super::Theme;
use crate::title_dock::{AnchorSlots, DockConfig, DockSession, Measurement, TitleFrame, TitleOwner};

const PASSIVE: EventListenerOptions = EventListenerOptions {
    phase: EventListenerPhase::Bubble,
    passive: true,
};

pub enum DockAction {
    FontsReady,
    Measured(Measurement),
    Scrolled(f64),
    ReducedMotion(bool),
}

#[derive(PartialEq)]
pub struct DockModel {
    session: DockSession,
}

impl Reducible for DockModel {
    type Action = DockAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut session = self.session.clone();

        match action {
            DockAction::FontsReady => session.on_fonts_ready(),
            DockAction::Measured(measurement) => session.on_measurement(measurement),
            DockAction::Scrolled(scroll_y) => session.on_scroll(scroll_y),
            DockAction::ReducedMotion(prefers_reduced_motion) => {
                session.on_reduced_motion(prefers_reduced_motion)
            }
        }

        Rc::new(Self { session })
    }
}

#[derive(Default, PartialEq)]
struct AnchorGeneration(u32);

impl Reducible for AnchorGeneration {
    type Action = ();

    fn reduce(self: Rc<Self>, _action: ()) -> Rc<Self> {
        Rc::new(Self(self.0.wrapping_add(1)))
    }
}

/// What title consumers read from the provider.
#[derive(Clone, PartialEq)]
pub struct DockContext {
    pub frame: TitleFrame,
    pub register_source: Callback<Option<Element>>,
    pub register_target: Callback<Option<Element>>,
}

impl DockContext {
    /// Used outside a provider: the real heading always shows.
    fn detached() -> Self {
        Self {
            frame: TitleFrame {
                owner: TitleOwner::Source,
                clone: None,
            },
            register_source: Callback::noop(),
            register_target: Callback::noop(),
        }
    }
}

#[hook]
pub fn use_dock() -> DockContext {
    use_context::<DockContext>().unwrap_or_else(DockContext::detached)
}

/// Registers the returned node with the tracker while it is mounted.
#[hook]
pub fn use_dock_anchor(register: Callback<Option<Element>>) -> NodeRef {
    let node = use_node_ref();

    {
        let node = node.clone();
        use_effect_with(register, move |register| {
            register.emit(node.cast::<Element>());
            let register = register.clone();
            move || register.emit(None)
        });
    }

    node
}

/// Feeds scroll offsets (at most one per frame) and the reduced-motion
/// preference into the session.
#[hook]
fn use_scroll_sampler(dispatcher: UseReducerDispatcher<DockModel>) {
    use_effect_with(dispatcher, |dispatcher| {
        let pending: Rc<RefCell<Option<AnimationFrame>>> = Rc::default();
        let mut listeners = Vec::new();

        let schedule: Rc<dyn Fn()> = {
            let pending = pending.clone();
            let dispatcher = dispatcher.clone();
            Rc::new(move || {
                let slot = pending.clone();
                let dispatcher = dispatcher.clone();
                let frame = request_animation_frame(move |_| {
                    slot.borrow_mut().take();
                    dispatcher.dispatch(DockAction::Scrolled(dom::scroll_y()));
                });
                // Replacing the handle cancels a frame that has not run yet.
                *pending.borrow_mut() = Some(frame);
            })
        };

        if let Some(win) = window() {
            let on_scroll = schedule.clone();
            listeners.push(EventListener::new_with_options(
                &win,
                "scroll",
                PASSIVE,
                move |_| on_scroll(),
            ));

            // Mobile URL bar and keyboard changes only show up here.
            if let Some(visual) = win.visual_viewport() {
                for event_type in ["resize", "scroll"] {
                    let on_change = schedule.clone();
                    listeners.push(EventListener::new_with_options(
                        &visual,
                        event_type,
                        PASSIVE,
                        move |_| on_change(),
                    ));
                }
            }
        }

        if let Some(query) = dom::reduced_motion_query() {
            dispatcher.dispatch(DockAction::ReducedMotion(query.matches()));
            let dispatcher = dispatcher.clone();
            listeners.push(EventListener::new(&query, "change", move |event| {
                let matches = event
                    .dyn_ref::<MediaQueryListEvent>()
                    .map(|event| event.matches())
                    .unwrap_or_else(dom::prefers_reduced_motion);
                dispatcher.dispatch(DockAction::ReducedMotion(matches));
            }));
        }

        schedule();

        move || {
            drop(listeners);
            pending.borrow_mut().take();
        }
    });
}

fn measure_anchors(slots: &RefCell<AnchorSlots<Element>>, dispatcher: &UseReducerDispatcher<DockModel>) {
    let scroll_y = dom::scroll_y();
    let measurement = {
        let slots = slots.borrow();
        let source = slots.source();

        Measurement {
            source_rect: source.map(|element| dom::client_rect(element).to_document(scroll_y)),
            source_style: source.and_then(dom::text_style),
            target_rect: slots.target().map(dom::client_rect),
            viewport: dom::viewport(),
            scroll_y,
        }
    };

    dispatcher.dispatch(DockAction::Measured(measurement));
}

/// Waits for fonts, then measures both anchors and keeps them fresh on
/// resize, visual viewport resize, anchor (re)registration, locale and theme
/// changes.
#[hook]
fn use_anchor_measurement(
    dispatcher: UseReducerDispatcher<DockModel>,
    slots: Rc<RefCell<AnchorSlots<Element>>>,
    fonts_ready: bool,
    generation: u32,
    locale: Locale,
    theme: Theme,
    debounce_ms: u32,
) {
    use_effect_with(
        (fonts_ready, generation, locale, theme),
        move |(fonts_ready, _, _, _)| {
            let cancelled = Rc::new(Cell::new(false));
            let debounce: Rc<RefCell<Option<Timeout>>> = Rc::default();
            let mut listeners = Vec::new();

            if *fonts_ready {
                measure_anchors(&slots, &dispatcher);

                let remeasure: Rc<dyn Fn()> = {
                    let debounce = debounce.clone();
                    Rc::new(move || {
                        let slots = slots.clone();
                        let dispatcher = dispatcher.clone();
                        let timer = Timeout::new(debounce_ms, move || {
                            measure_anchors(&slots, &dispatcher);
                        });
                        *debounce.borrow_mut() = Some(timer);
                    })
                };

                if let Some(win) = window() {
                    let on_resize = remeasure.clone();
                    listeners.push(EventListener::new(&win, "resize", move |_| on_resize()));

                    if let Some(visual) = win.visual_viewport() {
                        let on_resize = remeasure.clone();
                        listeners.push(EventListener::new(&visual, "resize", move |_| on_resize()));
                    }
                }
            } else {
                let cancelled = cancelled.clone();
                spawn_local(async move {
                    dom::fonts_settled().await;
                    if !cancelled.get() {
                        dispatcher.dispatch(DockAction::FontsReady);
                    }
                });
            }

            move || {
                cancelled.set(true);
                drop(listeners);
                debounce.borrow_mut().take();
            }
        },
    );
}

#[derive(Properties, PartialEq)]
pub struct DockProviderProps {
    pub config: DockConfig,
    pub locale: Locale,
    pub theme: Theme,
    #[prop_or_default]
    pub children: Children,
}

#[function_component(DockProvider)]
pub fn dock_provider(props: &DockProviderProps) -> Html {
    let config = props.config;
    let model = use_reducer_eq(move || DockModel {
        session: DockSession::new(config),
    });
    let slots = use_mut_ref(AnchorSlots::<Element>::default);
    let generation = use_reducer_eq(AnchorGeneration::default);

    let register_source = {
        let slots = slots.clone();
        let bump = generation.dispatcher();
        use_callback((), move |element: Option<Element>, _| {
            slots.borrow_mut().register_source(element);
            bump.dispatch(());
        })
    };

    let register_target = {
        let slots = slots.clone();
        let bump = generation.dispatcher();
        use_callback((), move |element: Option<Element>, _| {
            slots.borrow_mut().register_target(element);
            bump.dispatch(());
        })
    };

    use_scroll_sampler(model.dispatcher());
    use_anchor_measurement(
        model.dispatcher(),
        slots,
        model.session.fonts_ready(),
        generation.0,
        props.locale,
        props.theme,
        config.remeasure_debounce_ms,
    );

    let context = DockContext {
        frame: model.session.frame(),
        register_source,
        register_target,
    };

    html! {
        <ContextProvider<DockContext> context={context}>
            { for props.children.iter() }
        </ContextProvider<DockContext>>
    }
}
