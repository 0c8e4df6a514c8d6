// src/schedule/cron.rs

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use cron::Schedule;

use crate::errors::{Result, TaskcronError};

/// A parsed cron expression, evaluated in UTC.
///
/// Accepts six-field (`sec min hour dom month dow`) and seven-field (with
/// year) forms, plus classic five-field expressions, which fire at second 0.
/// Day-of-week numbers follow classic cron: 0 or 7 is Sunday, 1 is Monday.
#[derive(Debug, Clone)]
pub struct CronExpr {
    source: String,
    schedule: Schedule,
}

impl CronExpr {
    pub fn parse(expr: &str) -> Result<Self> {
        let normalized = normalize(expr);
        let schedule = Schedule::from_str(&normalized).map_err(|e| TaskcronError::InvalidCron {
            expr: expr.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            source: expr.trim().to_string(),
            schedule,
        })
    }

    /// The expression as written in the task definition.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// First firing strictly after `after`, if the schedule has one.
    pub fn next_after(&self, after: &DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule.after(after).next()
    }

    /// The next `count` firings strictly after `after`.
    pub fn upcoming(&self, after: &DateTime<Utc>, count: usize) -> Vec<DateTime<Utc>> {
        self.schedule.after(after).take(count).collect()
    }
}

impl fmt::Display for CronExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Indexed by classic cron day number (0 = Sunday).
const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Bring `expr` into the form the `cron` crate parses.
///
/// Five-field input gains a leading seconds field of `0`. Numeric
/// day-of-week values use classic numbering (0 or 7 = Sunday, 1 = Monday)
/// and are rewritten to day names, since the crate counts 1 as Sunday.
fn normalize(expr: &str) -> String {
    let mut fields: Vec<String> = expr.split_whitespace().map(str::to_string).collect();
    if fields.len() == 5 {
        fields.insert(0, "0".to_string());
    }
    if let Some(dow) = fields.get_mut(5) {
        *dow = day_of_week_names(dow);
    }
    fields.join(" ")
}

/// Rewrite a day-of-week field item by item. Items that are not purely
/// numeric (names, malformed values) are passed through for the crate to
/// accept or reject.
fn day_of_week_names(field: &str) -> String {
    if field == "*" || field == "?" {
        return field.to_string();
    }

    let mut days = BTreeSet::new();
    let mut passthrough = Vec::new();
    for item in field.split(',') {
        match expand_day_item(item) {
            Some(expanded) => days.extend(expanded),
            None => passthrough.push(item),
        }
    }

    days.into_iter()
        .map(|d| DAY_NAMES[d])
        .chain(passthrough)
        .collect::<Vec<_>>()
        .join(",")
}

/// Expand `N`, `N-M`, `*/S`, `N/S` or `N-M/S` into classic day numbers 0..=6.
fn expand_day_item(item: &str) -> Option<Vec<usize>> {
    let (range, step) = match item.split_once('/') {
        Some((range, step)) => (range, step.parse::<usize>().ok().filter(|s| *s > 0)?),
        None => (item, 1),
    };

    let (start, end) = if range == "*" {
        (0, 6)
    } else if let Some((a, b)) = range.split_once('-') {
        (a.parse::<usize>().ok()?, b.parse::<usize>().ok()?)
    } else {
        let day = range.parse::<usize>().ok()?;
        if item.contains('/') { (day, 6) } else { (day, day) }
    };

    if start > end || end > 7 {
        return None;
    }
    Some((start..=end).step_by(step).map(|d| d % 7).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike, Weekday};

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, h, m, s).unwrap()
    }

    #[test]
    fn every_five_seconds() {
        let cron = CronExpr::parse("*/5 * * * * *").unwrap();
        let next = cron.upcoming(&at(10, 0, 1), 3);
        assert_eq!(next, vec![at(10, 0, 5), at(10, 0, 10), at(10, 0, 15)]);
    }

    #[test]
    fn next_is_strictly_after() {
        let cron = CronExpr::parse("*/5 * * * * *").unwrap();
        assert_eq!(cron.next_after(&at(10, 0, 5)), Some(at(10, 0, 10)));
    }

    #[test]
    fn five_field_form_fires_on_the_minute() {
        let cron = CronExpr::parse("30 2 * * *").unwrap();
        let next = cron.next_after(&at(1, 0, 0)).unwrap();
        assert_eq!((next.hour(), next.minute(), next.second()), (2, 30, 0));
        assert_eq!(cron.as_str(), "30 2 * * *");
    }

    /// Wednesday.
    fn mid_week() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 4, 0, 0, 0).unwrap()
    }

    #[test]
    fn day_one_is_monday() {
        let cron = CronExpr::parse("30 2 * * 1").unwrap();
        let next = cron.next_after(&mid_week()).unwrap();
        assert_eq!(next.weekday(), Weekday::Mon);
        assert_eq!(next, Utc.with_ymd_and_hms(2026, 3, 9, 2, 30, 0).unwrap());
    }

    #[test]
    fn weekday_range_skips_the_weekend() {
        let cron = CronExpr::parse("0 9 * * 1-5").unwrap();
        let days: Vec<Weekday> = cron
            .upcoming(&mid_week(), 7)
            .iter()
            .map(|t| t.weekday())
            .collect();
        assert_eq!(
            days,
            vec![
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
            ]
        );
    }

    #[test]
    fn zero_and_seven_are_sunday() {
        for expr in ["0 0 * * 0", "0 0 * * 7", "0 0 0 * * 0"] {
            let next = CronExpr::parse(expr).unwrap().next_after(&mid_week()).unwrap();
            assert_eq!(next.weekday(), Weekday::Sun, "{expr}");
        }
    }

    #[test]
    fn day_of_week_lists_and_steps() {
        assert_eq!(normalize("0 0 * * 5-7"), "0 0 0 * * Sun,Fri,Sat");
        assert_eq!(normalize("0 0 * * */2"), "0 0 0 * * Sun,Tue,Thu,Sat");
        assert_eq!(normalize("0 0 * * 1,3/2"), "0 0 0 * * Mon,Wed,Fri");
        assert_eq!(normalize("0 0 * * Mon-Fri"), "0 0 0 * * Mon-Fri");
        assert_eq!(normalize("0 0 0 * * * 2027"), "0 0 0 * * * 2027");
    }

    #[test]
    fn out_of_range_day_is_rejected() {
        assert!(CronExpr::parse("0 0 * * 8").is_err());
    }

    #[test]
    fn garbage_is_rejected_with_the_original_text() {
        match CronExpr::parse("every tuesday") {
            Err(TaskcronError::InvalidCron { expr, .. }) => assert_eq!(expr, "every tuesday"),
            other => panic!("expected InvalidCron, got {:?}", other),
        }
        assert!(CronExpr::parse("").is_err());
    }
}
