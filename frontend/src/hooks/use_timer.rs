//! Hook driving the study timer once per second while it runs.

use std::rc::Rc;

use gloo::timers::callback::Interval;
use studyflow_lib::Timer;
use yew::prelude::*;

pub enum TimerAction {
    Tick,
    Toggle,
    /// Stop and zero the count ahead of a save
    Take,
    /// Add back seconds whose save failed
    Restore(i64),
}

#[derive(Clone, Default, PartialEq)]
pub struct TimerState(pub Timer);

impl Reducible for TimerState {
    type Action = TimerAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut timer = self.0;
        match action {
            TimerAction::Tick => timer.tick(),
            TimerAction::Toggle => timer.toggle(),
            TimerAction::Take => {
                timer.take_for_save();
            }
            TimerAction::Restore(seconds) => timer.restore_unsaved(seconds),
        }
        Rc::new(TimerState(timer))
    }
}

/// Hook for the study timer.
///
/// An interval exists only while the timer runs and is dropped as soon as
/// it stops, so stopping never loses or adds a second.
#[hook]
pub fn use_timer() -> UseReducerHandle<TimerState> {
    let timer = use_reducer(TimerState::default);
    let running = timer.0.is_running();

    {
        let timer = timer.clone();
        use_effect_with(running, move |running| {
            let interval = running.then(|| {
                Interval::new(1_000, move || timer.dispatch(TimerAction::Tick))
            });
            move || drop(interval)
        });
    }

    timer
}
