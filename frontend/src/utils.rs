use chrono::{Local, NaiveDate};
use shared::ApiClientConfig;
use studyflow_lib::ClientError;

const DEFAULT_SUPABASE_URL: &str = "http://localhost:54321";

/// Backend project settings, baked in at build time
pub fn api_config() -> ApiClientConfig {
    ApiClientConfig::new(
        option_env!("STUDYFLOW_SUPABASE_URL").unwrap_or(DEFAULT_SUPABASE_URL),
        option_env!("STUDYFLOW_SUPABASE_ANON_KEY").unwrap_or_default(),
    )
}

/// The user's local calendar date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Current time in unix seconds
pub fn now_secs() -> i64 {
    (js_sys::Date::now() / 1000.0) as i64
}

/// Current time in unix milliseconds
pub fn now_millis() -> i64 {
    js_sys::Date::now() as i64
}

/// Show a blocking alert unless the error is one the UI drops silently
pub fn report_error(err: &ClientError) {
    if err.is_silent() {
        log::debug!("Ignored: {}", err);
        return;
    }
    log::error!("{}", err);
    gloo::dialogs::alert(&err.to_string());
}

/// Format a date for display (e.g., "Mon 02 Mar 2026")
pub fn format_date(date: NaiveDate) -> String {
    date.format("%a %d %b %Y").to_string()
}

/// Value of an `<input type="date">`, if set
pub fn parse_date_input(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}
