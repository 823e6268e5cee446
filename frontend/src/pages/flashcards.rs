use std::collections::HashSet;

use shared::review::{is_due, FlashcardFolder};
use shared::{Difficulty, Flashcard};
use studyflow_lib::Command;
use yew::prelude::*;

use crate::components::{ConfirmModal, PendingConfirm};
use crate::hooks::{use_study_store, StoreHandle};
use crate::utils;

fn difficulty_label(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "Easy (4 days)",
        Difficulty::Medium => "Medium (2 days)",
        Difficulty::Hard => "Hard (today)",
    }
}

#[function_component(FlashcardsPage)]
pub fn flashcards_page() -> Html {
    let store = use_study_store();
    let label = use_state(String::new);
    let question = use_state(String::new);
    let answer = use_state(String::new);
    let open_folders = use_state(HashSet::<String>::new);
    let pending = use_state(|| None::<PendingConfirm>);
    let Some(store) = store else {
        return html! {};
    };

    let today = utils::today();
    let folders = store.store.folders(today);
    let due = store.store.due_count(today);

    let bind = |state: &UseStateHandle<String>| {
        let state = state.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            state.set(input.value());
        })
    };
    let on_label = bind(&label);
    let on_answer = bind(&answer);
    let on_question = {
        let question = question.clone();
        Callback::from(move |e: InputEvent| {
            let area: web_sys::HtmlTextAreaElement = e.target_unchecked_into();
            question.set(area.value());
        })
    };

    let on_create = {
        let store = store.clone();
        let label = label.clone();
        let question = question.clone();
        let answer = answer.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            // The label stays so several cards can be filed in a row
            let clear = {
                let question = question.clone();
                let answer = answer.clone();
                Callback::from(move |_| {
                    question.set(String::new());
                    answer.set(String::new());
                })
            };
            store.send_then(
                Command::CreateFlashcard {
                    label: (*label).clone(),
                    question: (*question).clone(),
                    answer: (*answer).clone(),
                },
                clear,
            );
        })
    };

    let on_toggle_folder = {
        let open_folders = open_folders.clone();
        Callback::from(move |label: String| {
            let mut next = (*open_folders).clone();
            if !next.remove(&label) {
                next.insert(label);
            }
            open_folders.set(next);
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

    html! {
        <section class="flashcards-page">
            <header class="page-header">
                <h2>{ "Flashcards" }</h2>
                <span class={classes!("due-count", (due > 0).then_some("has-due"))}>
                    { format!("{} due today", due) }
                </span>
            </header>

            <form class="card-form" onsubmit={on_create}>
                <input
                    type="text"
                    placeholder="Label (folder)"
                    value={(*label).clone()}
                    oninput={on_label}
                />
                <textarea
                    placeholder="Question"
                    value={(*question).clone()}
                    oninput={on_question}
                />
                <input
                    type="text"
                    placeholder="Answer"
                    value={(*answer).clone()}
                    oninput={on_answer}
                />
                <button type="submit" class="primary">{ "Add card" }</button>
            </form>

            <div class="folder-list">
                { for folders.into_iter().map(|folder| {
                    let open = open_folders.contains(&folder.label);
                    let key = folder.label.clone();
                    html! {
                        <FolderView
                            key={key}
                            folder={folder}
                            open={open}
                            store={store.clone()}
                            on_toggle={on_toggle_folder.clone()}
                            on_ask={ask.clone()}
                        />
                    }
                }) }
            </div>

            if let Some(confirm) = &*pending {
                <ConfirmModal pending={confirm.clone()} on_close={close} />
            }
        </section>
    }
}

#[derive(Properties, PartialEq)]
struct FolderViewProps {
    folder: FlashcardFolder,
    open: bool,
    store: StoreHandle,
    on_toggle: Callback<String>,
    on_ask: Callback<PendingConfirm>,
}

#[function_component(FolderView)]
fn folder_view(props: &FolderViewProps) -> Html {
    let folder = &props.folder;
    let today = utils::today();

    let on_header = {
        let on_toggle = props.on_toggle.clone();
        let label = folder.label.clone();
        Callback::from(move |_: MouseEvent| on_toggle.emit(label.clone()))
    };

    let on_delete = {
        let store = props.store.clone();
        let on_ask = props.on_ask.clone();
        let label = folder.label.clone();
        let count = folder.cards.len();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            let store = store.clone();
            let target = label.clone();
            on_ask.emit(PendingConfirm::new(
                format!("Delete the folder \"{}\" and its {} card(s)?", label, count),
                Callback::from(move |_| {
                    store.send(Command::DeleteFlashcardFolder {
                        label: target.clone(),
                    })
                }),
            ));
        })
    };

    html! {
        <div class={classes!("folder", folder.pending.then_some("pending"))}>
            <header class="folder-header" onclick={on_header}>
                <span class="chevron">{ if props.open { "▾" } else { "▸" } }</span>
                <h3>{ &folder.label }</h3>
                <span class="card-count">
                    { format!("{} card(s), {} due", folder.cards.len(), folder.due_count(today)) }
                </span>
                if folder.pending {
                    <span class="pending-badge">{ "Review pending" }</span>
                }
                <button class="delete-button" onclick={on_delete}>{ "Delete folder" }</button>
            </header>
            if props.open {
                <ul class="card-list">
                    { for folder.cards.iter().map(|card| html! {
                        <CardView
                            key={card.id.to_string()}
                            card={card.clone()}
                            store={props.store.clone()}
                            on_ask={props.on_ask.clone()}
                        />
                    }) }
                </ul>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct CardViewProps {
    card: Flashcard,
    store: StoreHandle,
    on_ask: Callback<PendingConfirm>,
}

#[function_component(CardView)]
fn card_view(props: &CardViewProps) -> Html {
    let revealed = use_state(|| false);
    let card = &props.card;
    let card_id = card.id;
    let today = utils::today();
    let due = is_due(card, today);

    let on_reveal = {
        let revealed = revealed.clone();
        Callback::from(move |_: MouseEvent| revealed.set(!*revealed))
    };

    let on_delete = {
        let store = props.store.clone();
        let on_ask = props.on_ask.clone();
        Callback::from(move |_: MouseEvent| {
            let store = store.clone();
            on_ask.emit(PendingConfirm::new(
                "Delete this flashcard?",
                Callback::from(move |_| store.send(Command::DeleteFlashcard { card_id })),
            ));
        })
    };

    let review_button = |difficulty: Difficulty| {
        let store = props.store.clone();
        let revealed = revealed.clone();
        let onclick = Callback::from(move |_: MouseEvent| {
            revealed.set(false);
            store.send(Command::ReviewFlashcard {
                card_id,
                difficulty,
                today: utils::today(),
            });
        });
        html! {
            <button class={classes!("review-button", difficulty.as_str())} {onclick}>
                { difficulty_label(difficulty) }
            </button>
        }
    };

    html! {
        <li class={classes!("flashcard", due.then_some("due"))}>
            <p class="question">{ &card.question }</p>
            if *revealed {
                <p class="answer">{ &card.answer }</p>
                <div class="review-actions">
                    { for Difficulty::ALL.into_iter().map(review_button) }
                </div>
            } else {
                <button class="reveal-button" onclick={on_reveal.clone()}>{ "Show answer" }</button>
            }
            <footer class="card-footer">
                <span class="next-review">
                    { match card.next_review {
                        Some(date) if !due => format!("Next review {}", utils::format_date(date)),
                        _ => "Due now".to_string(),
                    } }
                </span>
                if *revealed {
                    <button class="link-button" onclick={on_reveal}>{ "Hide" }</button>
                }
                <button class="delete-button small" onclick={on_delete}>{ "Delete" }</button>
            </footer>
        </li>
    }
}
