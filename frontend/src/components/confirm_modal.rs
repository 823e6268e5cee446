//! Confirmation Modal Component
//!
//! Overlay asking the user to confirm a destructive action. When a phrase
//! is required the confirm button stays disabled until it is typed exactly.

use yew::prelude::*;

/// A destructive action waiting for confirmation
#[derive(Clone, PartialEq)]
pub struct PendingConfirm {
    pub message: String,
    /// Phrase the user must type, if any
    pub phrase: Option<&'static str>,
    /// Receives the typed text (empty when no phrase is required)
    pub on_confirm: Callback<String>,
}

impl PendingConfirm {
    pub fn new(message: impl Into<String>, on_confirm: Callback<String>) -> Self {
        Self {
            message: message.into(),
            phrase: None,
            on_confirm,
        }
    }

    pub fn with_phrase(mut self, phrase: &'static str) -> Self {
        self.phrase = Some(phrase);
        self
    }
}

#[derive(Properties, PartialEq)]
pub struct ConfirmModalProps {
    pub pending: PendingConfirm,
    pub on_close: Callback<()>,
}

#[function_component(ConfirmModal)]
pub fn confirm_modal(props: &ConfirmModalProps) -> Html {
    let typed = use_state(String::new);
    let pending = &props.pending;

    let cancel = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    let on_input = {
        let typed = typed.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            typed.set(input.value());
        })
    };

    let confirm = {
        let typed = typed.clone();
        let on_confirm = pending.on_confirm.clone();
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| {
            on_confirm.emit((*typed).clone());
            on_close.emit(());
        })
    };

    let ready = pending
        .phrase
        .map_or(true, |phrase| typed.trim() == phrase);

    html! {
        <div class="modal-overlay" onclick={cancel.clone()}>
            <div class="confirm-modal" onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}>
                <p>{ &pending.message }</p>
                if let Some(phrase) = pending.phrase {
                    <label class="confirm-phrase">
                        { "Type " }<code>{ phrase }</code>{ " to continue" }
                        <input type="text" value={(*typed).clone()} oninput={on_input} />
                    </label>
                }
                <div class="confirm-actions">
                    <button class="cancel-button" onclick={cancel}>
                        { "Cancel" }
                    </button>
                    <button class="confirm-button" onclick={confirm} disabled={!ready}>
                        { "Confirm" }
                    </button>
                </div>
            </div>
        </div>
    }
}
