//! Which subject cards are open, remembered across page loads

use std::collections::HashSet;

use shared::protocol::EXPANDED_SUBJECTS_KEY;
use uuid::Uuid;
use yew::prelude::*;

use crate::storage;

#[derive(Clone, PartialEq)]
pub struct ExpandedSubjects {
    open: HashSet<Uuid>,
    /// Open a closed card or close an open one
    pub toggle: Callback<Uuid>,
}

impl ExpandedSubjects {
    pub fn is_open(&self, subject_id: Uuid) -> bool {
        self.open.contains(&subject_id)
    }
}

#[hook]
pub fn use_expanded_subjects() -> ExpandedSubjects {
    let open = use_state(|| {
        storage::load::<HashSet<Uuid>>(EXPANDED_SUBJECTS_KEY).unwrap_or_default()
    });

    let toggle = {
        let open = open.clone();
        Callback::from(move |subject_id: Uuid| {
            let mut next = (*open).clone();
            if !next.remove(&subject_id) {
                next.insert(subject_id);
            }
            storage::save(EXPANDED_SUBJECTS_KEY, &next);
            open.set(next);
        })
    };

    ExpandedSubjects {
        open: (*open).clone(),
        toggle,
    }
}
