//! Session state and auth transitions
//!
//! [`SessionManager`] owns the current session and notifies subscribers when
//! it changes. Persistence is left to the caller: the browser subscribes a
//! listener that writes localStorage, the CLI writes its session file after
//! each command.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use shared::api::Credentials;
use shared::{Session, StudyApi};

use crate::error::{ClientError, Result};

type Listener = Rc<dyn Fn(Option<&Session>)>;

#[derive(Default)]
struct Inner {
    current: Option<Session>,
    listeners: Vec<(u64, Listener)>,
    next_listener_id: u64,
}

/// Result of a sign-up attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    SignedIn(Session),
    /// Account created; the user must confirm their e-mail before signing in
    ConfirmationRequired,
}

/// Shared handle to the current session. Clones observe the same state.
#[derive(Clone, Default)]
pub struct SessionManager {
    inner: Rc<RefCell<Inner>>,
}

/// Two handles are equal when they share state
impl PartialEq for SessionManager {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Keeps a listener registered until dropped
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    inner: Weak<RefCell<Inner>>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner
                .borrow_mut()
                .listeners
                .retain(|(id, _)| *id != self.id);
        }
    }
}

fn credentials(email: &str, password: &str) -> Result<Credentials> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(ClientError::MissingCredentials);
    }
    Ok(Credentials {
        email: email.to_string(),
        password: password.to_string(),
    })
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Session> {
        self.inner.borrow().current.clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.inner.borrow().current.is_some()
    }

    /// Register a listener called with the new session on every change
    pub fn subscribe(&self, listener: impl Fn(Option<&Session>) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_listener_id;
        inner.next_listener_id += 1;
        inner.listeners.push((id, Rc::new(listener)));
        Subscription {
            inner: Rc::downgrade(&self.inner),
            id,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Replace the session and notify listeners
    pub fn set(&self, session: Option<Session>) {
        let listeners: Vec<Listener> = {
            let mut inner = self.inner.borrow_mut();
            inner.current = session.clone();
            inner.listeners.iter().map(|(_, l)| l.clone()).collect()
        };
        // Listeners may read the manager again, so the borrow is released first
        for listener in listeners {
            listener(session.as_ref());
        }
    }

    /// Adopt a previously persisted session, refreshing it if it has expired.
    /// A failed refresh leaves the user signed out.
    pub async fn restore<A: StudyApi>(
        &self,
        api: &A,
        stored: Option<Session>,
        now: i64,
    ) -> Option<Session> {
        let Some(stored) = stored else {
            self.set(None);
            return None;
        };

        if !stored.is_expired_at(now) {
            self.set(Some(stored.clone()));
            return Some(stored);
        }

        match api.refresh_session(&stored.refresh_token).await {
            Ok(session) => {
                log::info!("Refreshed session for {}", session.owner_id());
                self.set(Some(session.clone()));
                Some(session)
            }
            Err(e) => {
                log::warn!("Stored session could not be refreshed: {}", e);
                self.set(None);
                None
            }
        }
    }

    /// The current session, refreshed first if it has expired
    pub async fn active<A: StudyApi>(&self, api: &A, now: i64) -> Result<Session> {
        let current = self.current().ok_or(ClientError::NotSignedIn)?;
        if !current.is_expired_at(now) {
            return Ok(current);
        }
        match api.refresh_session(&current.refresh_token).await {
            Ok(session) => {
                self.set(Some(session.clone()));
                Ok(session)
            }
            Err(e) => {
                self.set(None);
                Err(e.into())
            }
        }
    }

    pub async fn sign_in<A: StudyApi>(
        &self,
        api: &A,
        email: &str,
        password: &str,
    ) -> Result<Session> {
        let credentials = credentials(email, password)?;
        let session = api.sign_in(&credentials).await?;
        log::info!("Signed in as {}", credentials.email);
        self.set(Some(session.clone()));
        Ok(session)
    }

    pub async fn sign_up<A: StudyApi>(
        &self,
        api: &A,
        email: &str,
        password: &str,
    ) -> Result<SignUpOutcome> {
        let credentials = credentials(email, password)?;
        match api.sign_up(&credentials).await? {
            Some(session) => {
                log::info!("Signed up and signed in as {}", credentials.email);
                self.set(Some(session.clone()));
                Ok(SignUpOutcome::SignedIn(session))
            }
            None => {
                log::info!("Signed up {}; confirmation pending", credentials.email);
                Ok(SignUpOutcome::ConfirmationRequired)
            }
        }
    }

    /// Sign out remotely and locally. The local session is cleared even when
    /// the remote call fails.
    pub async fn sign_out<A: StudyApi>(&self, api: &A) {
        if let Some(session) = self.current() {
            if let Err(e) = api.sign_out(&session).await {
                log::warn!("Remote sign-out failed: {}", e);
            }
        }
        log::info!("Signed out");
        self.set(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn credentials_require_both_fields() {
        assert!(matches!(
            credentials("  ", "pw"),
            Err(ClientError::MissingCredentials)
        ));
        assert!(matches!(
            credentials("a@b.c", ""),
            Err(ClientError::MissingCredentials)
        ));
        let ok = credentials(" a@b.c ", "pw").unwrap();
        assert_eq!(ok.email, "a@b.c");
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let manager = SessionManager::new();
        let calls = Rc::new(Cell::new(0));

        let counter = calls.clone();
        let subscription = manager.subscribe(move |_| counter.set(counter.get() + 1));
        assert_eq!(manager.listener_count(), 1);

        manager.set(None);
        assert_eq!(calls.get(), 1);

        drop(subscription);
        assert_eq!(manager.listener_count(), 0);
        manager.set(None);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn listeners_may_read_the_manager() {
        let manager = SessionManager::new();
        let seen = Rc::new(Cell::new(false));

        let observer = manager.clone();
        let flag = seen.clone();
        let _subscription = manager.subscribe(move |session| {
            flag.set(session.is_none() && !observer.is_signed_in());
        });
        manager.set(None);
        assert!(seen.get());
    }
}
