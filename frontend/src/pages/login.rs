use studyflow_lib::SignUpOutcome;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::hooks::use_auth;
use crate::transport::web_api;
use crate::utils;

#[derive(Clone, Copy, PartialEq)]
enum AuthMode {
    SignIn,
    SignUp,
}

#[function_component(LoginPage)]
pub fn login_page() -> Html {
    let auth = use_auth();
    let email = use_state(String::new);
    let password = use_state(String::new);
    let busy = use_state(|| false);
    let notice = use_state(|| None::<String>);

    let on_email = {
        let email = email.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            email.set(input.value());
        })
    };

    let on_password = {
        let password = password.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            password.set(input.value());
        })
    };

    let submit = {
        let manager = auth.manager.clone();
        let email = email.clone();
        let password = password.clone();
        let busy = busy.clone();
        let notice = notice.clone();
        Callback::from(move |mode: AuthMode| {
            let manager = manager.clone();
            let email = (*email).clone();
            let password = (*password).clone();
            let busy = busy.clone();
            let notice = notice.clone();
            busy.set(true);
            notice.set(None);
            spawn_local(async move {
                let api = web_api();
                let result = match mode {
                    AuthMode::SignIn => manager
                        .sign_in(&api, &email, &password)
                        .await
                        .map(|_| None),
                    AuthMode::SignUp => {
                        manager
                            .sign_up(&api, &email, &password)
                            .await
                            .map(|outcome| match outcome {
                                SignUpOutcome::SignedIn(_) => None,
                                SignUpOutcome::ConfirmationRequired => Some(format!(
                                    "Account created. Check {} for a confirmation link, then sign in.",
                                    email
                                )),
                            })
                    }
                };
                match result {
                    Ok(message) => notice.set(message),
                    Err(e) => utils::report_error(&e),
                }
                busy.set(false);
            });
        })
    };

    let on_submit = {
        let submit = submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            submit.emit(AuthMode::SignIn);
        })
    };
    let on_sign_up = {
        let submit = submit.clone();
        Callback::from(move |_: MouseEvent| submit.emit(AuthMode::SignUp))
    };

    html! {
        <div class="login-container">
            <form class="login-card" onsubmit={on_submit}>
                <h1>{ "StudyFlow" }</h1>
                <p class="tagline">{ "Track subjects, flashcards and study time" }</p>
                <input
                    type="email"
                    placeholder="Email"
                    autocomplete="email"
                    value={(*email).clone()}
                    oninput={on_email}
                />
                <input
                    type="password"
                    placeholder="Password"
                    autocomplete="current-password"
                    value={(*password).clone()}
                    oninput={on_password}
                />
                <div class="login-actions">
                    <button type="submit" class="primary" disabled={*busy}>
                        { "Sign in" }
                    </button>
                    <button type="button" onclick={on_sign_up} disabled={*busy}>
                        { "Sign up" }
                    </button>
                </div>
                if let Some(message) = &*notice {
                    <p class="login-notice">{ message }</p>
                }
            </form>
        </div>
    }
}
