use shared::{Attachment, Subject, Topic, TopicStatus};
use studyflow_lib::Command;
use uuid::Uuid;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::components::{ConfirmModal, PendingConfirm, ProgressBar};
use crate::hooks::{use_expanded_subjects, use_study_store, StoreHandle};
use crate::utils;

fn status_class(status: TopicStatus) -> &'static str {
    match status {
        TopicStatus::Critical => "status-badge critical",
        TopicStatus::Reading => "status-badge reading",
        TopicStatus::Reviewed => "status-badge reviewed",
    }
}

#[function_component(SubjectsPage)]
pub fn subjects_page() -> Html {
    let store = use_study_store();
    let new_name = use_state(String::new);
    let pending = use_state(|| None::<PendingConfirm>);
    let expanded = use_expanded_subjects();
    let Some(store) = store else {
        return html! {};
    };

    let on_name = {
        let new_name = new_name.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            new_name.set(input.value());
        })
    };

    let on_create = {
        let store = store.clone();
        let new_name = new_name.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let name = (*new_name).clone();
            let clear = {
                let new_name = new_name.clone();
                Callback::from(move |_| new_name.set(String::new()))
            };
            store.send_then(Command::CreateSubject { name }, clear);
        })
    };

    let ask = {
        let pending = pending.clone();
        Callback::from(move |confirm: PendingConfirm| pending.set(Some(confirm)))
    };
    let close = {
        let pending = pending.clone();
        Callback::from(move |_| pending.set(None))
    };

    let subjects = store.store.subjects();

    html! {
        <section class="subjects-page">
            <form class="inline-form" onsubmit={on_create}>
                <input
                    type="text"
                    placeholder="New subject"
                    value={(*new_name).clone()}
                    oninput={on_name}
                />
                <button type="submit" class="primary">{ "Add subject" }</button>
            </form>

            if subjects.is_empty() && !store.loading {
                <p class="empty-state">{ "No subjects yet. Add one to start tracking topics." }</p>
            }

            <div class="subject-list">
                { for subjects.iter().map(|subject| html! {
                    <SubjectCard
                        key={subject.id.to_string()}
                        subject={subject.clone()}
                        progress={store.store.progress(subject.id)}
                        expanded={expanded.is_open(subject.id)}
                        on_toggle={expanded.toggle.clone()}
                        on_ask={ask.clone()}
                    />
                }) }
            </div>

            if let Some(confirm) = &*pending {
                <ConfirmModal pending={confirm.clone()} on_close={close} />
            }
        </section>
    }
}

#[derive(Properties, PartialEq)]
struct SubjectCardProps {
    subject: Subject,
    progress: u32,
    expanded: bool,
    on_toggle: Callback<Uuid>,
    on_ask: Callback<PendingConfirm>,
}

#[function_component(SubjectCard)]
fn subject_card(props: &SubjectCardProps) -> Html {
    let store = use_study_store();
    let topic_name = use_state(String::new);
    let Some(store) = store else {
        return html! {};
    };
    let subject = &props.subject;
    let subject_id = subject.id;

    let on_header = {
        let on_toggle = props.on_toggle.clone();
        Callback::from(move |_: MouseEvent| on_toggle.emit(subject_id))
    };

    let on_delete = {
        let store = store.clone();
        let on_ask = props.on_ask.clone();
        let name = subject.name.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            let store = store.clone();
            on_ask.emit(PendingConfirm::new(
                format!(
                    "Delete \"{}\" with all of its topics and attachments?",
                    name
                ),
                Callback::from(move |_| store.send(Command::DeleteSubject { subject_id })),
            ));
        })
    };

    let on_topic_name = {
        let topic_name = topic_name.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            topic_name.set(input.value());
        })
    };

    let on_add_topic = {
        let store = store.clone();
        let topic_name = topic_name.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let clear = {
                let topic_name = topic_name.clone();
                Callback::from(move |_| topic_name.set(String::new()))
            };
            store.send_then(
                Command::CreateTopic {
                    subject_id,
                    name: (*topic_name).clone(),
                },
                clear,
            );
        })
    };

    html! {
        <article class={classes!("subject-card", props.expanded.then_some("expanded"))}>
            <header class="subject-header" onclick={on_header}>
                <span class="chevron">{ if props.expanded { "▾" } else { "▸" } }</span>
                <h3>{ &subject.name }</h3>
                <span class="topic-count">{ format!("{} topics", subject.topics.len()) }</span>
                <ProgressBar percent={props.progress} />
                <button class="delete-button" onclick={on_delete}>{ "Delete" }</button>
            </header>

            if props.expanded {
                <div class="subject-body">
                    <ul class="topic-list">
                        { for subject.topics.iter().map(|topic| html! {
                            <TopicRow
                                key={topic.id.to_string()}
                                topic={topic.clone()}
                                store={store.clone()}
                                on_ask={props.on_ask.clone()}
                            />
                        }) }
                    </ul>
                    <form class="inline-form" onsubmit={on_add_topic}>
                        <input
                            type="text"
                            placeholder="New topic"
                            value={(*topic_name).clone()}
                            oninput={on_topic_name}
                        />
                        <button type="submit">{ "Add topic" }</button>
                    </form>
                </div>
            }
        </article>
    }
}

#[derive(Properties, PartialEq)]
struct TopicRowProps {
    topic: Topic,
    store: StoreHandle,
    on_ask: Callback<PendingConfirm>,
}

#[function_component(TopicRow)]
fn topic_row(props: &TopicRowProps) -> Html {
    let editing = use_state(|| false);
    let draft = use_state(String::new);
    let topic = &props.topic;
    let topic_id = topic.id;
    let store = &props.store;

    let on_cycle = {
        let store = store.clone();
        let current = Some(topic.status);
        Callback::from(move |_: MouseEvent| {
            store.send(Command::CycleTopicStatus { topic_id, current })
        })
    };

    let on_toggle_notes = {
        let editing = editing.clone();
        let draft = draft.clone();
        let stored = topic.notes.clone().unwrap_or_default();
        Callback::from(move |_: MouseEvent| {
            if !*editing {
                draft.set(stored.clone());
            }
            editing.set(!*editing);
        })
    };

    let on_draft = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let area: web_sys::HtmlTextAreaElement = e.target_unchecked_into();
            draft.set(area.value());
        })
    };

    let on_save_note = {
        let store = store.clone();
        let draft = draft.clone();
        let editing = editing.clone();
        Callback::from(move |_: MouseEvent| {
            let close = {
                let editing = editing.clone();
                Callback::from(move |_| editing.set(false))
            };
            store.send_then(
                Command::SaveNote {
                    topic_id,
                    notes: (*draft).clone(),
                },
                close,
            );
        })
    };

    let on_file = {
        let store = store.clone();
        Callback::from(move |e: Event| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            input.set_value("");
            let store = store.clone();
            spawn_local(async move {
                let file = gloo::file::File::from(file);
                let file_name = file.name();
                match gloo::file::futures::read_as_bytes(&file).await {
                    Ok(bytes) => store.send(Command::UploadAttachment {
                        topic_id,
                        file_name,
                        content_type: file.raw_mime_type(),
                        bytes,
                        uploaded_at_millis: utils::now_millis(),
                    }),
                    Err(e) => {
                        log::error!("Failed to read {}: {}", file_name, e);
                        gloo::dialogs::alert(&format!("Could not read {}: {}", file_name, e));
                    }
                }
            });
        })
    };

    let saved_notes = topic.notes.as_deref().filter(|n| !n.is_empty());

    html! {
        <li class="topic-row">
            <div class="topic-line">
                <span class="topic-name">{ &topic.name }</span>
                <button class={status_class(topic.status)} onclick={on_cycle} title="Next status">
                    { topic.status.label() }
                </button>
                <button class="notes-toggle" onclick={on_toggle_notes}>
                    { if *editing { "Close notes" } else { "Notes" } }
                </button>
                <label class="attach-button">
                    { "Attach" }
                    <input type="file" onchange={on_file} hidden=true />
                </label>
            </div>

            if *editing {
                <div class="notes-editor">
                    <textarea value={(*draft).clone()} oninput={on_draft} rows="5" />
                    <button class="primary" onclick={on_save_note}>{ "Save note" }</button>
                </div>
            } else {
                if let Some(notes) = saved_notes {
                    <p class="topic-notes">{ notes }</p>
                }
            }

            if !topic.attachments.is_empty() {
                <ul class="attachment-list">
                    { for topic.attachments.iter().map(|attachment| html! {
                        <AttachmentItem
                            key={attachment.id.to_string()}
                            attachment={attachment.clone()}
                            store={store.clone()}
                            on_ask={props.on_ask.clone()}
                        />
                    }) }
                </ul>
            }
        </li>
    }
}

#[derive(Properties, PartialEq)]
struct AttachmentItemProps {
    attachment: Attachment,
    store: StoreHandle,
    on_ask: Callback<PendingConfirm>,
}

#[function_component(AttachmentItem)]
fn attachment_item(props: &AttachmentItemProps) -> Html {
    let attachment = &props.attachment;
    let attachment_id = attachment.id;

    let on_delete = {
        let store = props.store.clone();
        let on_ask = props.on_ask.clone();
        let name = attachment.file_name.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            let store = store.clone();
            on_ask.emit(PendingConfirm::new(
                format!("Delete attachment \"{}\"?", name),
                Callback::from(move |_| store.send(Command::DeleteAttachment { attachment_id })),
            ));
        })
    };

    html! {
        <li class="attachment">
            <a href={attachment.url.clone()} target="_blank" rel="noopener noreferrer">
                { &attachment.file_name }
            </a>
            <button class="delete-button small" onclick={on_delete}>{ "×" }</button>
        </li>
    }
}
