mod confirm_modal;
mod progress_bar;
mod timer_widget;

pub use confirm_modal::{ConfirmModal, PendingConfirm};
pub use progress_bar::ProgressBar;
pub use timer_widget::TimerWidget;
