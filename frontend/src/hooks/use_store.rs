//! Hook owning the signed-in user's [`Store`] and dispatching actions on it.

use std::rc::Rc;

use shared::Session;
use studyflow_lib::{Command, SessionManager, Store};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::transport::{web_api, WebApi};
use crate::utils;

pub type WebStore = Store<WebApi>;

type Dispatch = Callback<(Command, Option<Callback<bool>>)>;

/// Read access to the loaded data plus a way to run actions
#[derive(Clone)]
pub struct StoreHandle {
    pub store: Rc<WebStore>,
    pub loading: bool,
    dispatch: Dispatch,
}

impl PartialEq for StoreHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.store, &other.store) && self.loading == other.loading
    }
}

impl StoreHandle {
    /// Run an action; failures are alerted unless silent
    pub fn send(&self, command: Command) {
        self.dispatch.emit((command, None));
    }

    /// Run an action and call `on_success` once it has completed
    pub fn send_then(&self, command: Command, on_success: Callback<()>) {
        let on_done = Callback::from(move |ok: bool| {
            if ok {
                on_success.emit(());
            }
        });
        self.dispatch.emit((command, Some(on_done)));
    }

    /// Run an action and call `on_done` with whether it succeeded
    pub fn send_settled(&self, command: Command, on_done: Callback<bool>) {
        self.dispatch.emit((command, Some(on_done)));
    }
}

/// Hook for the store of the signed-in user.
///
/// The store is loaded when the user changes. Each dispatched command runs
/// against a copy of the current store; the copy (with its reloaded
/// snapshot) replaces the state when the command finishes, so the last
/// action to finish wins.
#[hook]
pub fn use_store(session: Session, manager: SessionManager) -> StoreHandle {
    let store = {
        let session = session.clone();
        use_state(move || Rc::new(Store::new(web_api(), session)))
    };
    let loading = use_state(|| true);

    {
        let store = store.clone();
        let loading = loading.clone();
        let session = session.clone();
        use_effect_with(session.owner_id(), move |_| {
            loading.set(true);
            spawn_local(async move {
                let mut fresh = Store::new(web_api(), session);
                fresh.refresh().await;
                store.set(Rc::new(fresh));
                loading.set(false);
            });
            || ()
        });
    }

    let dispatch = {
        let store = store.clone();
        Callback::from(
            move |(command, on_done): (Command, Option<Callback<bool>>)| {
                let store = store.clone();
                let manager = manager.clone();
                spawn_local(async move {
                    let mut next: WebStore = (**store).clone();
                    let result = match manager.active(next.api(), utils::now_secs()).await {
                        Ok(session) => {
                            next.set_session(session);
                            let result = next.apply(command).await;
                            store.set(Rc::new(next));
                            result
                        }
                        Err(e) => Err(e),
                    };

                    if let Err(e) = &result {
                        utils::report_error(e);
                    }
                    if let Some(on_done) = on_done {
                        on_done.emit(result.is_ok());
                    }
                });
            },
        )
    };

    StoreHandle {
        store: (*store).clone(),
        loading: *loading,
        dispatch,
    }
}

/// Read the store handle provided by the study shell
#[hook]
pub fn use_study_store() -> Option<StoreHandle> {
    use_context::<StoreHandle>()
}
