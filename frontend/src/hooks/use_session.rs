//! Hook tracking the signed-in session for the lifetime of the app.

use shared::protocol::SESSION_STORAGE_KEY;
use shared::Session;
use studyflow_lib::SessionManager;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::storage;
use crate::transport::web_api;
use crate::utils;

/// Auth state shared through context
#[derive(Clone)]
pub struct AuthContext {
    pub manager: SessionManager,
    pub session: Option<Session>,
    /// True until the stored session has been checked
    pub restoring: bool,
}

impl PartialEq for AuthContext {
    fn eq(&self, other: &Self) -> bool {
        self.session == other.session && self.restoring == other.restoring
    }
}

fn persist(session: Option<&Session>) {
    match session {
        Some(session) => storage::save(SESSION_STORAGE_KEY, session),
        None => storage::remove(SESSION_STORAGE_KEY),
    }
}

/// Hook owning the app's [`SessionManager`].
///
/// On mount the persisted session is restored (refreshing it if expired) and
/// a listener is subscribed that mirrors every change into component state
/// and localStorage. The listener is dropped on unmount.
#[hook]
pub fn use_session() -> AuthContext {
    let manager = use_memo((), |_| SessionManager::new());
    let session = use_state(|| None::<Session>);
    let restoring = use_state(|| true);

    {
        let manager = (*manager).clone();
        let session = session.clone();
        let restoring = restoring.clone();
        use_effect_with((), move |_| {
            let subscription = manager.subscribe(move |current| {
                persist(current);
                session.set(current.cloned());
            });

            spawn_local(async move {
                let stored: Option<Session> = storage::load(SESSION_STORAGE_KEY);
                manager.restore(&web_api(), stored, utils::now_secs()).await;
                restoring.set(false);
            });

            move || drop(subscription)
        });
    }

    AuthContext {
        manager: (*manager).clone(),
        session: (*session).clone(),
        restoring: *restoring,
    }
}

/// Read the auth context provided by the app root
#[hook]
pub fn use_auth() -> AuthContext {
    match use_context::<AuthContext>() {
        Some(ctx) => ctx,
        None => {
            log::error!("use_auth called outside the auth provider");
            AuthContext {
                manager: SessionManager::new(),
                session: None,
                restoring: false,
            }
        }
    }
}
