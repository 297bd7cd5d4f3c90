use chrono::{Datelike, Days, NaiveDate};
use thiserror::Error;

use super::task_date::{format_date, parse_date};

/// Largest accepted interval for `d N` rules
pub const MAX_DAY_INTERVAL: i64 = 400;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepeatRuleError {
    #[error("repeat is empty")]
    EmptyRule,
    #[error("invalid dstart (date) format")]
    InvalidStartDate,
    #[error("invalid repeat rule format: {0}")]
    InvalidFormat(String),
    #[error("repeat interval out of range (1..400): {0}")]
    IntervalOutOfRange(i64),
    #[error("next date is outside the supported calendar range")]
    DateOutOfRange,
}

/// Kind of recurrence encoded in a task's `repeat` text.
///
/// `Weekly` and `Monthly` are recognised so the parser has a place for them,
/// but evaluating them always fails with `InvalidFormat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Yearly,
    EveryNDays(u32),
    Weekly,
    Monthly,
}

/// A repeat rule bound to the date it advances from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatRule {
    pub kind: RuleKind,
    pub anchor: NaiveDate,
}

impl RepeatRule {
    /// Validate the rule text and the start date. Blank rules are reported
    /// before a bad start date.
    pub fn parse(start: &str, repeat: &str) -> Result<Self, RepeatRuleError> {
        let repeat = repeat.trim();
        if repeat.is_empty() {
            return Err(RepeatRuleError::EmptyRule);
        }

        let anchor = parse_date(start).ok_or(RepeatRuleError::InvalidStartDate)?;
        let kind = parse_kind(repeat)?;

        Ok(Self { kind, anchor })
    }

    /// First occurrence strictly after `reference`. The anchor itself is never
    /// returned: one step is always taken, even when the anchor is already
    /// past the reference.
    pub fn next_after(&self, reference: NaiveDate) -> Result<NaiveDate, RepeatRuleError> {
        match self.kind {
            RuleKind::Yearly => step_until_after(self.anchor, reference, add_year),
            RuleKind::EveryNDays(interval) => step_until_after(self.anchor, reference, |date| {
                date.checked_add_days(Days::new(u64::from(interval)))
            }),
            RuleKind::Weekly => Err(unsupported("weekly")),
            RuleKind::Monthly => Err(unsupported("monthly")),
        }
    }
}

/// Compute the next occurrence of `repeat` from `start`, strictly after `reference`,
/// formatted as `YYYYMMDD`.
pub fn next_date(reference: NaiveDate, start: &str, repeat: &str) -> Result<String, RepeatRuleError> {
    let rule = RepeatRule::parse(start, repeat)?;
    let next = rule.next_after(reference)?;
    Ok(format_date(next))
}

fn parse_kind(repeat: &str) -> Result<RuleKind, RepeatRuleError> {
    if repeat == "y" {
        return Ok(RuleKind::Yearly);
    }
    if repeat.starts_with('w') {
        return Ok(RuleKind::Weekly);
    }
    if repeat.starts_with('m') {
        return Ok(RuleKind::Monthly);
    }
    if repeat == "d" {
        return Err(RepeatRuleError::InvalidFormat(
            "daily rule needs an interval, e.g. `d 7`".to_string(),
        ));
    }
    if let Some(rest) = repeat.strip_prefix("d ") {
        let interval: i64 = rest.trim().parse().map_err(|_| {
            RepeatRuleError::InvalidFormat(format!("`{}` is not a valid day count", rest.trim()))
        })?;
        if !(1..=MAX_DAY_INTERVAL).contains(&interval) {
            return Err(RepeatRuleError::IntervalOutOfRange(interval));
        }
        return Ok(RuleKind::EveryNDays(interval as u32));
    }

    Err(RepeatRuleError::InvalidFormat(format!("unknown rule `{}`", repeat)))
}

fn unsupported(kind: &str) -> RepeatRuleError {
    RepeatRuleError::InvalidFormat(format!("{} rules are not supported", kind))
}

fn step_until_after<F>(
    anchor: NaiveDate,
    reference: NaiveDate,
    step: F,
) -> Result<NaiveDate, RepeatRuleError>
where
    F: Fn(NaiveDate) -> Option<NaiveDate>,
{
    let mut next = step(anchor).ok_or(RepeatRuleError::DateOutOfRange)?;
    while next <= reference {
        next = step(next).ok_or(RepeatRuleError::DateOutOfRange)?;
    }
    Ok(next)
}

/// Add one calendar year. Feb 29 in a non-leap target year rolls over to Mar 1.
fn add_year(date: NaiveDate) -> Option<NaiveDate> {
    let year = date.year().checked_add(1)?;
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn yearly_leap_day_rolls_to_march_first() {
        assert_eq!(next_date(day("20250701"), "20200229", "y").unwrap(), "20260301");
        assert_eq!(next_date(day("20240126"), "20240229", "y").unwrap(), "20250301");
    }

    #[test]
    fn rolled_leap_day_stays_on_march_first() {
        // 2021-03-01, 2022-03-01, 2023-03-01: never back to Feb 29 in 2024
        assert_eq!(next_date(day("20230101"), "20200229", "y").unwrap(), "20230301");
        assert_eq!(next_date(day("20231231"), "20200229", "y").unwrap(), "20240301");
    }

    #[test]
    fn yearly_always_steps_at_least_once() {
        assert_eq!(next_date(day("20200101"), "20300515", "y").unwrap(), "20310515");
    }

    #[test]
    fn daily_single_step_when_already_ahead() {
        assert_eq!(next_date(day("20250701"), "20250701", "d 3").unwrap(), "20250704");
    }

    #[test]
    fn daily_catches_up_to_reference() {
        let next = next_date(day("20250701"), "20250101", "d 7").unwrap();
        assert_eq!(next, "20250702");

        let offset = (day(&next) - day("20250101")).num_days();
        assert_eq!(offset % 7, 0);
    }

    #[test]
    fn daily_never_returns_the_start_date() {
        let next = next_date(day("20200101"), "20250101", "d 1").unwrap();
        assert_eq!(next, "20250102");
    }

    #[test]
    fn result_is_strictly_after_reference() {
        for rule in ["y", "d 1", "d 5", "d 400"] {
            let reference = day("20250615");
            let next = day(&next_date(reference, "20240615", rule).unwrap());
            assert!(next > reference, "{rule}: {next} not after {reference}");
        }
    }

    #[test]
    fn evaluation_is_deterministic() {
        let reference = day("20251231");
        let first = next_date(reference, "20200101", "d 13");
        let second = next_date(reference, "20200101", "d 13");
        assert_eq!(first, second);
    }

    #[test]
    fn interval_bounds() {
        let reference = day("20250101");
        assert!(next_date(reference, "20250101", "d 1").is_ok());
        assert!(next_date(reference, "20250101", "d 400").is_ok());
        assert_eq!(
            next_date(reference, "20250101", "d 0"),
            Err(RepeatRuleError::IntervalOutOfRange(0))
        );
        assert_eq!(
            next_date(reference, "20250101", "d 401"),
            Err(RepeatRuleError::IntervalOutOfRange(401))
        );
        assert_eq!(
            next_date(reference, "20250101", "d -3"),
            Err(RepeatRuleError::IntervalOutOfRange(-3))
        );
    }

    #[test]
    fn blank_rules_are_empty() {
        let reference = day("20250101");
        assert_eq!(next_date(reference, "20250101", ""), Err(RepeatRuleError::EmptyRule));
        assert_eq!(next_date(reference, "20250101", "   "), Err(RepeatRuleError::EmptyRule));
        // blank wins over a bad start date
        assert_eq!(next_date(reference, "bogus", " "), Err(RepeatRuleError::EmptyRule));
    }

    #[test]
    fn malformed_rules_are_invalid_format() {
        let reference = day("20250101");
        for rule in ["w", "w 1", "m", "m 3", "d", "x", "d abc", "Y", "yy", "d5"] {
            assert!(
                matches!(
                    next_date(reference, "20250101", rule),
                    Err(RepeatRuleError::InvalidFormat(_))
                ),
                "{rule} should be rejected"
            );
        }
    }

    #[test]
    fn weekly_and_monthly_parse_but_are_unsupported() {
        let rule = RepeatRule::parse("20250101", "w 1,3").unwrap();
        assert_eq!(rule.kind, RuleKind::Weekly);
        assert!(matches!(
            rule.next_after(day("20250101")),
            Err(RepeatRuleError::InvalidFormat(msg)) if msg.contains("weekly")
        ));

        let rule = RepeatRule::parse("20250101", "m 3").unwrap();
        assert_eq!(rule.kind, RuleKind::Monthly);
        assert!(matches!(
            rule.next_after(day("20250101")),
            Err(RepeatRuleError::InvalidFormat(msg)) if msg.contains("monthly")
        ));
    }

    #[test]
    fn invalid_start_date_is_reported_regardless_of_rule() {
        let reference = day("20250701");
        assert_eq!(
            next_date(reference, "2025-07-01", "d 3"),
            Err(RepeatRuleError::InvalidStartDate)
        );
        assert_eq!(
            next_date(reference, "2025-07-01", "x"),
            Err(RepeatRuleError::InvalidStartDate)
        );
    }

    #[test]
    fn rule_text_is_trimmed() {
        let reference = day("20250701");
        assert_eq!(next_date(reference, "20250701", "  d  3 ").unwrap(), "20250704");
        assert_eq!(next_date(reference, "20250701", " y").unwrap(), "20260701");
    }
}
