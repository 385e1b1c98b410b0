use gloo_net::http::Request;
use serde::{Deserialize, Serialize};
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

use super::i18n::Locale;

const CONTACT_ENDPOINT: &str = "/api/contact";

#[derive(Clone, Default, PartialEq, Serialize)]
struct ContactDraft {
    name: String,
    email: String,
    subject: String,
    message: String,
}

#[derive(Deserialize)]
struct ContactReply {
    success: bool,
    message: Option<String>,
    error: Option<String>,
}

#[derive(Clone, PartialEq)]
enum SendState {
    Idle,
    Sending,
    Sent(String),
    Failed(String),
}

async fn submit(draft: &ContactDraft) -> Result<String, Option<String>> {
    let response = Request::post(CONTACT_ENDPOINT)
        .json(draft)
        .map_err(|_| None)?
        .send()
        .await
        .map_err(|_| None)?;
    let reply = response.json::<ContactReply>().await.map_err(|_| None)?;

    if reply.success {
        Ok(reply.message.unwrap_or_default())
    } else {
        Err(reply.error)
    }
}

#[derive(Properties, PartialEq)]
pub struct ContactFormProps {
    pub locale: Locale,
}

#[function_component(ContactForm)]
pub fn contact_form(props: &ContactFormProps) -> Html {
    let draft = use_state(ContactDraft::default);
    let state = use_state(|| SendState::Idle);
    let locale = props.locale;

    let on_input = |apply: fn(&mut ContactDraft, String)| {
        let draft = draft.clone();
        Callback::from(move |event: InputEvent| {
            let value = event
                .target_dyn_into::<HtmlInputElement>()
                .map(|input| input.value())
                .or_else(|| {
                    event
                        .target_dyn_into::<HtmlTextAreaElement>()
                        .map(|area| area.value())
                })
                .unwrap_or_default();
            let mut next = (*draft).clone();
            apply(&mut next, value);
            draft.set(next);
        })
    };

    let onsubmit = {
        let draft = draft.clone();
        let state = state.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            if *state == SendState::Sending {
                return;
            }

            state.set(SendState::Sending);
            let payload = (*draft).clone();
            let draft = draft.clone();
            let state = state.clone();
            spawn_local(async move {
                match submit(&payload).await {
                    Ok(message) => {
                        draft.set(ContactDraft::default());
                        state.set(SendState::Sent(message));
                    }
                    Err(error) => {
                        tracing::debug!(?error, "contact submission rejected");
                        let message = error.unwrap_or_else(|| locale.t("contact.failed").to_string());
                        state.set(SendState::Failed(message));
                    }
                }
            });
        })
    };

    let status = match &*state {
        SendState::Idle | SendState::Sending => html! {},
        SendState::Sent(message) => html! { <p class="form-status" role="status">{message.clone()}</p> },
        SendState::Failed(message) => html! { <p class="form-status is-error" role="alert">{message.clone()}</p> },
    };
    let sending = *state == SendState::Sending;

    html! {
        <form class="contact-form" onsubmit={onsubmit}>
            <label>
                <span>{locale.t("contact.name")}</span>
                <input type="text" name="name" required=true maxlength="100" value={draft.name.clone()}
                    oninput={on_input(|draft, value| draft.name = value)} />
            </label>
            <label>
                <span>{locale.t("contact.email")}</span>
                <input type="email" name="email" required=true maxlength="254" value={draft.email.clone()}
                    oninput={on_input(|draft, value| draft.email = value)} />
            </label>
            <label>
                <span>{locale.t("contact.subject")}</span>
                <input type="text" name="subject" required=true maxlength="200" value={draft.subject.clone()}
                    oninput={on_input(|draft, value| draft.subject = value)} />
            </label>
            <label>
                <span>{locale.t("contact.message")}</span>
                <textarea name="message" required=true maxlength="5000" rows="6" value={draft.message.clone()}
                    oninput={on_input(|draft, value| draft.message = value)} />
            </label>
            <button type="submit" disabled={sending}>
                { if sending { locale.t("contact.sending") } else { locale.t("contact.send") } }
            </button>
            {status}
        </form>
    }
}
