use chrono::Local;
use shared::protocol::HISTORY_RESET_PHRASE;
use shared::report::{format_duration, DateRange, RangePreset};
use studyflow_lib::Command;
use yew::prelude::*;

use crate::components::{ConfirmModal, PendingConfirm};
use crate::hooks::use_study_store;
use crate::utils;

#[function_component(ReportPage)]
pub fn report_page() -> Html {
    let store = use_study_store();
    let preset = use_state(|| RangePreset::AllTime);
    let custom = use_state(DateRange::all);
    let pending = use_state(|| None::<PendingConfirm>);
    let Some(store) = store else {
        return html! {};
    };

    let range = preset.range(utils::today(), *custom);
    let summary = store.store.report(range, &Local);

    let on_preset = {
        let preset = preset.clone();
        Callback::from(move |e: Event| {
            let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
            if let Some(next) = RangePreset::from_key(&select.value()) {
                preset.set(next);
            }
        })
    };

    let on_from = {
        let custom = custom.clone();
        Callback::from(move |e: Event| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            custom.set(DateRange {
                from: utils::parse_date_input(&input.value()),
                ..*custom
            });
        })
    };
    let on_to = {
        let custom = custom.clone();
        Callback::from(move |e: Event| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            custom.set(DateRange {
                to: utils::parse_date_input(&input.value()),
                ..*custom
            });
        })
    };

    let on_reset = {
        let store = store.clone();
        let pending = pending.clone();
        Callback::from(move |_: MouseEvent| {
            let store = store.clone();
            pending.set(Some(
                PendingConfirm::new(
                    "This permanently deletes every logged study session.",
                    Callback::from(move |typed_phrase: String| {
                        store.send(Command::ResetStudyHistory { typed_phrase })
                    }),
                )
                .with_phrase(HISTORY_RESET_PHRASE),
            ));
        })
    };
    let close = {
        let pending = pending.clone();
        Callback::from(move |_| pending.set(None))
    };

    let date_value = |date: Option<chrono::NaiveDate>| {
        date.map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    };

    html! {
        <section class="report-page">
            <header class="page-header">
                <h2>{ "Study report" }</h2>
                <select class="range-select" onchange={on_preset}>
                    { for RangePreset::ALL.into_iter().map(|option| html! {
                        <option value={option.key()} selected={option == *preset}>
                            { option.label() }
                        </option>
                    }) }
                </select>
                if *preset == RangePreset::Custom {
                    <div class="custom-range">
                        <label>
                            { "From" }
                            <input type="date" value={date_value(custom.from)} onchange={on_from} />
                        </label>
                        <label>
                            { "To" }
                            <input type="date" value={date_value(custom.to)} onchange={on_to} />
                        </label>
                    </div>
                }
            </header>

            <div class="report-totals">
                <div class="stat">
                    <span class="stat-value">{ summary.total_display() }</span>
                    <span class="stat-label">{ "Total study time" }</span>
                </div>
                <div class="stat">
                    <span class="stat-value">{ summary.session_count.to_string() }</span>
                    <span class="stat-label">{ "Sessions" }</span>
                </div>
            </div>

            if summary.days.is_empty() {
                <p class="empty-state">{ "No study sessions in this range." }</p>
            } else {
                <table class="report-table">
                    <thead>
                        <tr>
                            <th>{ "Day" }</th>
                            <th>{ "Sessions" }</th>
                            <th>{ "Time" }</th>
                        </tr>
                    </thead>
                    <tbody>
                        { for summary.days.iter().map(|day| html! {
                            <tr key={day.date.to_string()}>
                                <td>{ utils::format_date(day.date) }</td>
                                <td>{ day.session_count.to_string() }</td>
                                <td>{ format_duration(day.total_seconds) }</td>
                            </tr>
                        }) }
                    </tbody>
                </table>
            }

            <footer class="danger-zone">
                <button class="delete-button" onclick={on_reset}>{ "Reset study history" }</button>
            </footer>

            if let Some(confirm) = &*pending {
                <ConfirmModal pending={confirm.clone()} on_close={close} />
            }
        </section>
    }
}
