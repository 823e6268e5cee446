//! Typed JSON values in the browser's localStorage

use serde::{de::DeserializeOwned, Serialize};

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// The value under `key`; unreadable entries are treated as absent
pub fn load<T: DeserializeOwned>(key: &str) -> Option<T> {
    let json = local_storage()?.get_item(key).ok().flatten()?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring stored {}: {}", key, e);
            None
        }
    }
}

pub fn save<T: Serialize>(key: &str, value: &T) {
    let Some(storage) = local_storage() else {
        return;
    };
    match serde_json::to_string(value) {
        Ok(json) => {
            if storage.set_item(key, &json).is_err() {
                log::warn!("Could not write {} to localStorage", key);
            }
        }
        Err(e) => log::error!("Failed to serialize {}: {}", key, e),
    }
}

pub fn remove(key: &str) {
    if let Some(storage) = local_storage() {
        if storage.remove_item(key).is_err() {
            log::warn!("Could not remove {} from localStorage", key);
        }
    }
}
