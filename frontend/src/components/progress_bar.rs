use shared::progress::ProgressTone;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ProgressBarProps {
    /// 0..=100
    pub percent: u32,
}

#[function_component(ProgressBar)]
pub fn progress_bar(props: &ProgressBarProps) -> Html {
    let percent = props.percent.min(100);
    let tone = ProgressTone::for_percent(percent);

    html! {
        <div class="progress" title={format!("{}%", percent)}>
            <div
                class={classes!("progress-fill", tone.css_class())}
                style={format!("width: {}%", percent)}
            />
            <span class="progress-label">{ format!("{}%", percent) }</span>
        </div>
    }
}
