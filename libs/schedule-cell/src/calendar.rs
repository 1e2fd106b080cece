use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};

/// Resolve a (year, 0-based month) pair, letting out-of-range months roll
/// into neighboring years (month -1 of 2024 is December 2023).
pub fn resolve_month(year: i32, month0: i32) -> (i32, u32) {
    let total = year as i64 * 12 + month0 as i64;
    (total.div_euclid(12) as i32, total.rem_euclid(12) as u32)
}

pub fn prev_month(year: i32, month0: i32) -> (i32, u32) {
    resolve_month(year, month0 - 1)
}

pub fn next_month(year: i32, month0: i32) -> (i32, u32) {
    resolve_month(year, month0 + 1)
}

fn days_in_month(year: i32, month1: u32) -> u32 {
    let (next_year, next_month1) = if month1 == 12 {
        (year + 1, 1)
    } else {
        (year, month1 + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month1, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(0)
}

/// Build the Monday-first month grid for a (year, 0-based month) pair.
///
/// Each row is a full week of 7 cells; `None` cells pad the first week up
/// to the weekday of day 1 and the last week out to Sunday. Every `Some`
/// cell is a date of the displayed month, in order.
pub fn month_matrix(year: i32, month0: i32) -> Vec<[Option<NaiveDate>; 7]> {
    let (year, month0) = resolve_month(year, month0);
    let month1 = month0 + 1;

    let Some(first) = NaiveDate::from_ymd_opt(year, month1, 1) else {
        return Vec::new();
    };

    let days = days_in_month(year, month1);
    let lead = first.weekday().num_days_from_monday() as usize;

    let mut weeks = Vec::new();
    let mut week: [Option<NaiveDate>; 7] = [None; 7];
    let mut col = lead;

    for day in 1..=days {
        if col == 7 {
            weeks.push(week);
            week = [None; 7];
            col = 0;
        }
        week[col] = NaiveDate::from_ymd_opt(year, month1, day);
        col += 1;
    }
    weeks.push(week);

    weeks
}

/// Canonical `YYYY-MM-DD` lookup key. Display formatting is a separate,
/// presentational concern and must never feed back into lookups.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_date_key(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// `HH:MM`, 24-hour.
pub fn time_key(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

pub fn parse_time_key(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

/// Generate slot start times from `start` up to (strictly before) `end`,
/// stepping by slot length plus break. A slot may end past `end`; only
/// the start is bounded. An inverted window yields an empty sequence.
pub fn generate_times(
    start: NaiveTime,
    end: NaiveTime,
    slot_minutes: i32,
    break_minutes: i32,
) -> Vec<NaiveTime> {
    // A non-positive step would never advance.
    if slot_minutes <= 0 || break_minutes < 0 {
        return Vec::new();
    }

    let start_minute = start.hour() * 60 + start.minute();
    let end_minute = end.hour() * 60 + end.minute();
    let step = (slot_minutes + break_minutes) as u32;

    let mut times = Vec::new();
    let mut current = start_minute;
    while current < end_minute {
        if let Some(time) = NaiveTime::from_hms_opt(current / 60, current % 60, 0) {
            times.push(time);
        }
        current += step;
    }

    times
}
