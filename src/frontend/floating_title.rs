use gloo::render::{request_animation_frame, AnimationFrame};
use yew::prelude::*;

use super::dock::use_dock;

#[derive(Properties, PartialEq)]
pub struct FloatingTitleProps {
    pub text: AttrValue,
}

/// Decorative copy of the hero heading that travels to the nav brand.
///
/// It mounts at opacity 0 and is revealed two frames later, once the browser
/// has applied the copied font and transform.
#[function_component(FloatingTitle)]
pub fn floating_title(props: &FloatingTitleProps) -> Html {
    let dock = use_dock();
    let revealed = use_state_eq(|| false);
    let reveal_frame = use_mut_ref(|| None::<AnimationFrame>);
    let mounted = dock.frame.clone_mounted();

    {
        let revealed = revealed.clone();
        let reveal_frame = reveal_frame.clone();
        use_effect_with(mounted, move |mounted| {
            if *mounted {
                let slot = reveal_frame.clone();
                let first = request_animation_frame(move |_| {
                    let second = request_animation_frame(move |_| revealed.set(true));
                    *slot.borrow_mut() = Some(second);
                });
                *reveal_frame.borrow_mut() = Some(first);
            } else {
                revealed.set(false);
            }

            move || {
                reveal_frame.borrow_mut().take();
            }
        });
    }

    let Some(plan) = dock.frame.clone.as_ref() else {
        return html! {};
    };

    html! {
        <div class="floating-title" style={plan.container_style(*revealed)} aria-hidden="true">
            <span style={plan.text_style()}>{props.text.clone()}</span>
        </div>
    }
}
