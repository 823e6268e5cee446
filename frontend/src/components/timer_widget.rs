//! Timer Widget Component
//!
//! Start/pause control, the running clock, and a save button that records
//! the elapsed time as a study session.

use studyflow_lib::Command;
use yew::prelude::*;

use crate::hooks::{use_study_store, use_timer, TimerAction};

#[function_component(TimerWidget)]
pub fn timer_widget() -> Html {
    let timer = use_timer();
    let store = use_study_store();
    let saving = use_state(|| false);

    let on_toggle = {
        let timer = timer.clone();
        Callback::from(move |_: MouseEvent| timer.dispatch(TimerAction::Toggle))
    };

    let on_save = {
        let timer = timer.clone();
        let saving = saving.clone();
        Callback::from(move |_: MouseEvent| {
            if *saving {
                return;
            }
            let Some(store) = store.as_ref() else {
                return;
            };
            let mut snapshot = timer.0;
            let Some(seconds) = snapshot.take_for_save() else {
                return;
            };
            // The count leaves the timer now; a failed save puts it back
            timer.dispatch(TimerAction::Take);
            saving.set(true);
            let on_done = {
                let timer = timer.clone();
                let saving = saving.clone();
                Callback::from(move |saved: bool| {
                    saving.set(false);
                    if !saved {
                        timer.dispatch(TimerAction::Restore(seconds));
                    }
                })
            };
            store.send_settled(Command::LogStudySession { seconds }, on_done);
        })
    };

    let running = timer.0.is_running();

    html! {
        <div class={classes!("timer", running.then_some("running"))}>
            <span class="timer-display">{ timer.0.display() }</span>
            <button class="timer-toggle" onclick={on_toggle}>
                { if running { "Pause" } else { "Start" } }
            </button>
            <button
                class="timer-save"
                onclick={on_save}
                disabled={*saving || timer.0.elapsed() < 1}
            >
                { if *saving { "Saving..." } else { "Save session" } }
            </button>
        </div>
    }
}
