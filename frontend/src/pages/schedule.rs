use shared::{ScheduleEntry, Subject, Weekday};
use studyflow_lib::Command;
use uuid::Uuid;
use yew::prelude::*;

use crate::components::{ConfirmModal, PendingConfirm};
use crate::hooks::{use_study_store, StoreHandle};

#[function_component(SchedulePage)]
pub fn schedule_page() -> Html {
    let store = use_study_store();
    let pending = use_state(|| None::<PendingConfirm>);
    let Some(store) = store else {
        return html! {};
    };

    let ask = {
        let pending = pending.clone();
        Callback::from(move |confirm: PendingConfirm| pending.set(Some(confirm)))
    };
    let close = {
        let pending = pending.clone();
        Callback::from(move |_| pending.set(None))
    };

    let subjects = store.store.subjects().to_vec();

    html! {
        <section class="schedule-page">
            <header class="page-header">
                <h2>{ "Weekly schedule" }</h2>
            </header>
            <div class="week-grid">
                { for Weekday::ALL.into_iter().map(|weekday| {
                    let entries: Vec<ScheduleEntry> = store
                        .store
                        .schedule_for(weekday)
                        .into_iter()
                        .cloned()
                        .collect();
                    html! {
                        <DayColumn
                            key={weekday.code()}
                            weekday={weekday}
                            entries={entries}
                            subjects={subjects.clone()}
                            store={store.clone()}
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
struct DayColumnProps {
    weekday: Weekday,
    entries: Vec<ScheduleEntry>,
    subjects: Vec<Subject>,
    store: StoreHandle,
    on_ask: Callback<PendingConfirm>,
}

#[function_component(DayColumn)]
fn day_column(props: &DayColumnProps) -> Html {
    let selected = use_state(|| None::<Uuid>);
    let weekday = props.weekday;

    let on_select = {
        let selected = selected.clone();
        Callback::from(move |e: Event| {
            let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
            selected.set(Uuid::parse_str(&select.value()).ok());
        })
    };

    let on_add = {
        let store = props.store.clone();
        let selected = selected.clone();
        Callback::from(move |_: MouseEvent| {
            let clear = {
                let selected = selected.clone();
                Callback::from(move |_| selected.set(None))
            };
            store.send_then(
                Command::AddToSchedule {
                    weekday,
                    subject_id: *selected,
                },
                clear,
            );
        })
    };

    html! {
        <div class="day-column">
            <h3>{ weekday.label() }</h3>
            <ul class="schedule-entries">
                { for props.entries.iter().map(|entry| {
                    let entry_id = entry.id;
                    let on_remove = {
                        let store = props.store.clone();
                        let on_ask = props.on_ask.clone();
                        let name = entry.subject_name.clone();
                        Callback::from(move |_: MouseEvent| {
                            let store = store.clone();
                            on_ask.emit(PendingConfirm::new(
                                format!("Remove {} from {}?", name, weekday.label()),
                                Callback::from(move |_| {
                                    store.send(Command::RemoveFromSchedule { entry_id })
                                }),
                            ));
                        })
                    };
                    html! {
                        <li key={entry_id.to_string()} class="schedule-entry">
                            <span>{ &entry.subject_name }</span>
                            <button class="delete-button small" onclick={on_remove}>{ "×" }</button>
                        </li>
                    }
                }) }
            </ul>
            <div class="schedule-add">
                <select onchange={on_select}>
                    <option value="" selected={selected.is_none()}>{ "Choose subject" }</option>
                    { for props.subjects.iter().map(|subject| html! {
                        <option
                            value={subject.id.to_string()}
                            selected={*selected == Some(subject.id)}
                        >
                            { &subject.name }
                        </option>
                    }) }
                </select>
                <button onclick={on_add}>{ "Add" }</button>
            </div>
        </div>
    }
}
