//! Study-time report: totals, date filters and per-day breakdown

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::StudySession;

/// `HH:MM:SS`; hours grow past two digits rather than wrapping
pub fn format_duration(total_seconds: i64) -> String {
    let secs = total_seconds.max(0);
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Inclusive calendar-date range; an open end is unbounded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn between(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

/// Quick filters offered by the report view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangePreset {
    #[default]
    AllTime,
    Today,
    Last7Days,
    Last30Days,
    Custom,
}

impl RangePreset {
    pub const ALL: [RangePreset; 5] = [
        RangePreset::AllTime,
        RangePreset::Today,
        RangePreset::Last7Days,
        RangePreset::Last30Days,
        RangePreset::Custom,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RangePreset::AllTime => "All time",
            RangePreset::Today => "Today",
            RangePreset::Last7Days => "Last 7 days",
            RangePreset::Last30Days => "Last 30 days",
            RangePreset::Custom => "Custom",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            RangePreset::AllTime => "all",
            RangePreset::Today => "today",
            RangePreset::Last7Days => "7d",
            RangePreset::Last30Days => "30d",
            RangePreset::Custom => "custom",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.key() == key)
    }

    /// Range for this preset. `custom` is only consulted for [`RangePreset::Custom`].
    pub fn range(&self, today: NaiveDate, custom: DateRange) -> DateRange {
        let days_back = |n: u64| today.checked_sub_days(Days::new(n));
        match self {
            RangePreset::AllTime => DateRange::all(),
            RangePreset::Today => DateRange::between(Some(today), Some(today)),
            RangePreset::Last7Days => DateRange::between(days_back(6), Some(today)),
            RangePreset::Last30Days => DateRange::between(days_back(29), Some(today)),
            RangePreset::Custom => custom,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total_seconds: i64,
    pub session_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total_seconds: i64,
    pub session_count: usize,
    /// Most recent day first
    pub days: Vec<DailyTotal>,
}

impl ReportSummary {
    pub fn total_display(&self) -> String {
        format_duration(self.total_seconds)
    }
}

/// Sum the sessions whose local creation date (in `tz`) falls inside `range`
pub fn summarize<Tz: TimeZone>(
    sessions: &[StudySession],
    range: DateRange,
    tz: &Tz,
) -> ReportSummary {
    let mut by_day: BTreeMap<NaiveDate, (i64, usize)> = BTreeMap::new();
    for session in sessions {
        let date = session.created_at.with_timezone(tz).date_naive();
        if !range.contains(date) {
            continue;
        }
        let entry = by_day.entry(date).or_insert((0, 0));
        entry.0 += session.total_seconds.max(0);
        entry.1 += 1;
    }

    let days: Vec<DailyTotal> = by_day
        .into_iter()
        .rev()
        .map(|(date, (total_seconds, session_count))| DailyTotal {
            date,
            total_seconds,
            session_count,
        })
        .collect();

    ReportSummary {
        total_seconds: days.iter().map(|d| d.total_seconds).sum(),
        session_count: days.iter().map(|d| d.session_count).sum(),
        days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset, Utc};
    use uuid::Uuid;

    fn session_at(rfc3339: &str, total_seconds: i64) -> StudySession {
        StudySession {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            total_seconds,
            created_at: DateTime::parse_from_rfc3339(rfc3339)
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(0), "00:00:00");
        assert_eq!(format_duration(5), "00:00:05");
        assert_eq!(format_duration(3_725), "01:02:05");
        assert_eq!(format_duration(360_000), "100:00:00");
        assert_eq!(format_duration(-4), "00:00:00");
    }

    #[test]
    fn summary_groups_days_descending() {
        let sessions = vec![
            session_at("2026-04-01T09:00:00Z", 600),
            session_at("2026-04-03T09:00:00Z", 60),
            session_at("2026-04-01T18:00:00Z", 30),
        ];
        let summary = summarize(&sessions, DateRange::all(), &Utc);
        assert_eq!(summary.total_seconds, 690);
        assert_eq!(summary.session_count, 3);
        assert_eq!(summary.total_display(), "00:11:30");
        assert_eq!(summary.days[0].date, date(2026, 4, 3));
        assert_eq!(summary.days[1].total_seconds, 630);
        assert_eq!(summary.days[1].session_count, 2);
    }

    #[test]
    fn range_is_inclusive_on_both_ends() {
        let sessions = vec![
            session_at("2026-04-01T09:00:00Z", 1),
            session_at("2026-04-02T09:00:00Z", 10),
            session_at("2026-04-03T09:00:00Z", 100),
            session_at("2026-04-04T09:00:00Z", 1000),
        ];
        let range = DateRange::between(Some(date(2026, 4, 2)), Some(date(2026, 4, 3)));
        assert_eq!(summarize(&sessions, range, &Utc).total_seconds, 110);

        let open_start = DateRange::between(None, Some(date(2026, 4, 2)));
        assert_eq!(summarize(&sessions, open_start, &Utc).total_seconds, 11);
    }

    #[test]
    fn local_date_decides_the_day() {
        // 23:30 UTC is already the next day at UTC+2
        let sessions = vec![session_at("2026-04-01T23:30:00Z", 60)];
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let april_2 = DateRange::between(Some(date(2026, 4, 2)), Some(date(2026, 4, 2)));
        assert_eq!(summarize(&sessions, april_2, &plus_two).total_seconds, 60);
        assert_eq!(summarize(&sessions, april_2, &Utc).total_seconds, 0);
    }

    #[test]
    fn presets() {
        let today = date(2026, 4, 10);
        assert_eq!(
            RangePreset::Last7Days.range(today, DateRange::all()),
            DateRange::between(Some(date(2026, 4, 4)), Some(today))
        );
        assert_eq!(
            RangePreset::Today.range(today, DateRange::all()),
            DateRange::between(Some(today), Some(today))
        );
        let custom = DateRange::between(Some(date(2026, 1, 1)), None);
        assert_eq!(RangePreset::Custom.range(today, custom), custom);
        assert_eq!(RangePreset::AllTime.range(today, custom), DateRange::all());
        assert_eq!(RangePreset::from_key("30d"), Some(RangePreset::Last30Days));
    }
}
