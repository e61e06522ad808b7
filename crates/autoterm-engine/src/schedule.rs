//! Cron schedule evaluation at minute resolution.
//!
//! Tag values are cron expressions consumed through the `cron` crate,
//! which wants `sec min hour day-of-month month day-of-week [year]`.
//! Users write either the classic 5-field form or the AWS schedule
//! layout (`min hour dom month dow year`, optionally wrapped in
//! `cron(...)`), so both get a `0` seconds field prepended before
//! parsing. All evaluation is in UTC.

use std::str::FromStr;

use chrono::{DateTime, Duration, Timelike, Utc};
use cron::Schedule;

use crate::error::ScheduleError;

/// Tri-state outcome of checking one expression against "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleMatch {
    /// The expression has a tick inside the current minute.
    Active,
    /// Configured, but not due this minute.
    Inactive,
    /// Absent or blank; must never trigger anything.
    NotConfigured,
}

impl ScheduleMatch {
    pub fn is_active(self) -> bool {
        self == ScheduleMatch::Active
    }
}

/// Rewrite a user-facing expression into the form the `cron` crate parses.
pub fn normalize_expression(raw: &str) -> String {
    let mut expr = raw.trim();
    if let Some(inner) = expr
        .strip_prefix("cron(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        expr = inner.trim();
    }

    let fields: Vec<String> = expr
        .split_whitespace()
        .map(|f| if f == "?" { "*".to_string() } else { f.to_string() })
        .collect();

    match fields.len() {
        // min hour dom month dow [year]
        5 | 6 => format!("0 {}", fields.join(" ")),
        _ => fields.join(" "),
    }
}

/// Parse a user-facing expression.
pub fn parse_schedule(raw: &str) -> Result<Schedule, ScheduleError> {
    let normalized = normalize_expression(raw);
    Schedule::from_str(&normalized).map_err(|e| ScheduleError {
        expression: raw.trim().to_string(),
        reason: e.to_string(),
    })
}

/// True when `schedule` has a tick within the minute containing `now`.
pub fn is_due(schedule: &Schedule, now: DateTime<Utc>) -> bool {
    let minute_start = now
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now);
    let window_end = minute_start + Duration::minutes(1);

    // `after` is exclusive, so search from just before the window opens.
    match schedule.after(&(minute_start - Duration::seconds(1))).next() {
        Some(next) => next < window_end,
        None => false,
    }
}

/// Evaluates policy schedule expressions against a point in time.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScheduleEvaluator;

impl ScheduleEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Match an optional expression against `now`.
    ///
    /// Absent or blank expressions are `NotConfigured`; malformed ones
    /// return an error rather than silently reading as inactive.
    pub fn evaluate(
        &self,
        expr: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<ScheduleMatch, ScheduleError> {
        let expr = match expr.map(str::trim) {
            Some(e) if !e.is_empty() => e,
            _ => return Ok(ScheduleMatch::NotConfigured),
        };

        let schedule = parse_schedule(expr)?;
        if is_due(&schedule, now) {
            Ok(ScheduleMatch::Active)
        } else {
            Ok(ScheduleMatch::Inactive)
        }
    }

    /// Check that an expression parses, without evaluating it.
    pub fn validate(&self, expr: &str) -> Result<(), ScheduleError> {
        parse_schedule(expr).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    // -- normalize_expression ----------------------------------------------

    #[test]
    fn normalize_five_fields() {
        assert_eq!(normalize_expression("*/15 * * * *"), "0 */15 * * * *");
        assert_eq!(normalize_expression("  0 18 * * MON-FRI "), "0 0 18 * * MON-FRI");
    }

    #[test]
    fn normalize_aws_layout() {
        assert_eq!(
            normalize_expression("cron(0 18 ? * MON-FRI *)"),
            "0 0 18 * * MON-FRI *"
        );
        assert_eq!(normalize_expression("0 8 1 * ? 2027"), "0 0 8 1 * * 2027");
    }

    #[test]
    fn normalize_seven_fields_passthrough() {
        assert_eq!(normalize_expression("30 0 8 * * * *"), "30 0 8 * * * *");
    }

    // -- evaluate ----------------------------------------------------------

    #[test]
    fn blank_is_not_configured() {
        let eval = ScheduleEvaluator::new();
        let now = at(2026, 10, 16, 12, 0, 0);
        assert_eq!(eval.evaluate(None, now).unwrap(), ScheduleMatch::NotConfigured);
        assert_eq!(eval.evaluate(Some(""), now).unwrap(), ScheduleMatch::NotConfigured);
        assert_eq!(eval.evaluate(Some("   "), now).unwrap(), ScheduleMatch::NotConfigured);
    }

    #[test]
    fn every_minute_is_always_active() {
        let eval = ScheduleEvaluator::new();
        for now in [
            at(2026, 10, 16, 0, 0, 0),
            at(2026, 10, 16, 13, 37, 59),
            at(2026, 12, 31, 23, 59, 30),
        ] {
            assert_eq!(eval.evaluate(Some("* * * * *"), now).unwrap(), ScheduleMatch::Active);
        }
    }

    #[test]
    fn whole_minute_window_counts() {
        let eval = ScheduleEvaluator::new();
        let expr = Some("30 14 * * *");
        assert!(eval.evaluate(expr, at(2026, 10, 16, 14, 30, 0)).unwrap().is_active());
        assert!(eval.evaluate(expr, at(2026, 10, 16, 14, 30, 59)).unwrap().is_active());
        assert_eq!(
            eval.evaluate(expr, at(2026, 10, 16, 14, 31, 0)).unwrap(),
            ScheduleMatch::Inactive
        );
        assert_eq!(
            eval.evaluate(expr, at(2026, 10, 16, 14, 29, 59)).unwrap(),
            ScheduleMatch::Inactive
        );
    }

    #[test]
    fn weekday_ranges() {
        let eval = ScheduleEvaluator::new();
        let expr = Some("0 18 * * MON-FRI");
        // 2026-10-16 is a Friday, 2026-10-18 a Sunday.
        assert!(eval.evaluate(expr, at(2026, 10, 16, 18, 0, 10)).unwrap().is_active());
        assert!(!eval.evaluate(expr, at(2026, 10, 18, 18, 0, 10)).unwrap().is_active());
    }

    #[test]
    fn aws_expression_with_year() {
        let eval = ScheduleEvaluator::new();
        let now = at(2026, 10, 16, 18, 0, 0);
        assert!(eval.evaluate(Some("cron(0 18 ? * MON-FRI *)"), now).unwrap().is_active());
        assert!(eval.evaluate(Some("0 18 ? * * 2026"), now).unwrap().is_active());
        assert!(!eval.evaluate(Some("0 18 ? * * 2025"), now).unwrap().is_active());
    }

    #[test]
    fn malformed_expression_is_an_error() {
        let eval = ScheduleEvaluator::new();
        let now = at(2026, 10, 16, 12, 0, 0);
        let err = eval.evaluate(Some("every day at noon"), now).unwrap_err();
        assert_eq!(err.expression, "every day at noon");
        assert!(eval.evaluate(Some("61 * * * *"), now).is_err());
        assert!(eval.validate("0 12 * * *").is_ok());
        assert!(eval.validate("bogus").is_err());
    }
}
