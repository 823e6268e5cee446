mod components;
mod hooks;
mod pages;
mod storage;
mod transport;
pub mod utils;

use components::TimerWidget;
use hooks::{use_session, use_store, AuthContext, StoreHandle};
use pages::{
    flashcards::FlashcardsPage, login::LoginPage, report::ReportPage, schedule::SchedulePage,
    subjects::SubjectsPage,
};
use shared::Session;
use studyflow_lib::SessionManager;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::transport::web_api;

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Subjects,
    #[at("/flashcards")]
    Flashcards,
    #[at("/report")]
    Report,
    #[at("/schedule")]
    Schedule,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Subjects => html! { <SubjectsPage /> },
        Route::Flashcards => html! { <FlashcardsPage /> },
        Route::Report => html! { <ReportPage /> },
        Route::Schedule => html! { <SchedulePage /> },
        Route::NotFound => html! { <Redirect<Route> to={Route::Subjects} /> },
    }
}

#[function_component(App)]
fn app() -> Html {
    let auth = use_session();

    let body = match (&auth.session, auth.restoring) {
        (_, true) => html! { <div class="loading">{ "Loading..." }</div> },
        (None, false) => html! { <LoginPage /> },
        (Some(session), false) => html! {
            <StudyShell session={session.clone()} manager={auth.manager.clone()} />
        },
    };

    html! {
        <ContextProvider<AuthContext> context={auth}>
            <BrowserRouter>
                { body }
            </BrowserRouter>
        </ContextProvider<AuthContext>>
    }
}

#[derive(Properties, PartialEq)]
struct StudyShellProps {
    session: Session,
    manager: SessionManager,
}

/// Signed-in layout: navigation, the study timer and the routed page
#[function_component(StudyShell)]
fn study_shell(props: &StudyShellProps) -> Html {
    let store = use_store(props.session.clone(), props.manager.clone());

    let on_sign_out = {
        let manager = props.manager.clone();
        Callback::from(move |_: MouseEvent| {
            let manager = manager.clone();
            spawn_local(async move {
                manager.sign_out(&web_api()).await;
            });
        })
    };

    let email = props.session.user.email.clone().unwrap_or_default();

    html! {
        <ContextProvider<StoreHandle> context={store.clone()}>
            <div class="app-shell">
                <header class="app-header">
                    <h1 class="brand">{ "StudyFlow" }</h1>
                    <nav class="tabs">
                        <Link<Route> to={Route::Subjects} classes="tab">{ "Subjects" }</Link<Route>>
                        <Link<Route> to={Route::Flashcards} classes="tab">{ "Flashcards" }</Link<Route>>
                        <Link<Route> to={Route::Report} classes="tab">{ "Report" }</Link<Route>>
                        <Link<Route> to={Route::Schedule} classes="tab">{ "Schedule" }</Link<Route>>
                    </nav>
                    <TimerWidget />
                    <div class="account">
                        <span class="account-email">{ email }</span>
                        <button class="sign-out" onclick={on_sign_out}>{ "Sign out" }</button>
                    </div>
                </header>
                if store.loading {
                    <div class="loading-bar" />
                }
                <main class="app-main">
                    <Switch<Route> render={switch} />
                </main>
            </div>
        </ContextProvider<StoreHandle>>
    }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn run_app() {
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
