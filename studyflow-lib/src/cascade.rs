//! Subject deletion as an explicit sequence of remote deletes
//!
//! There is no transaction: each step is awaited before the next starts and
//! a failure stops the sequence, reporting the step it stopped at. Rows
//! removed by earlier steps stay removed.

use std::fmt;

use shared::{Session, StudyApi};
use uuid::Uuid;

use crate::error::{ClientError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeStep {
    ListingTopics,
    DeletingAttachments,
    DeletingTopics,
    DeletingSubject,
}

impl fmt::Display for CascadeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            CascadeStep::ListingTopics => "listing topics",
            CascadeStep::DeletingAttachments => "deleting attachments",
            CascadeStep::DeletingTopics => "deleting topics",
            CascadeStep::DeletingSubject => "deleting the subject",
        };
        f.write_str(text)
    }
}

/// What a completed cascade removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeReport {
    pub subject_id: Uuid,
    pub topic_ids: Vec<Uuid>,
}

fn at(step: CascadeStep) -> impl FnOnce(shared::ApiError) -> ClientError {
    move |source| {
        log::warn!("Subject delete interrupted while {}: {}", step, source);
        ClientError::CascadeInterrupted { step, source }
    }
}

/// Delete a subject's attachments, then its topics, then the subject
pub async fn delete_subject<A: StudyApi>(
    api: &A,
    session: &Session,
    subject_id: Uuid,
) -> Result<CascadeReport> {
    let topic_ids = api
        .list_topic_ids(session, subject_id)
        .await
        .map_err(at(CascadeStep::ListingTopics))?;
    log::debug!(
        "Deleting subject {} with {} topic(s)",
        subject_id,
        topic_ids.len()
    );

    api.delete_attachments_for_topics(session, &topic_ids)
        .await
        .map_err(at(CascadeStep::DeletingAttachments))?;
    api.delete_topics(session, &topic_ids)
        .await
        .map_err(at(CascadeStep::DeletingTopics))?;
    api.delete_subject(session, subject_id)
        .await
        .map_err(at(CascadeStep::DeletingSubject))?;

    Ok(CascadeReport {
        subject_id,
        topic_ids,
    })
}
