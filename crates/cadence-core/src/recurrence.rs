//! Occurrence calculation.
//!
//! Everything in this module is pure: a rule and an anchor date go in, the
//! next candidate date comes out. Nothing here touches storage, so it is safe
//! to call from any number of tasks at once.

use chrono::{Datelike, Days, Duration, NaiveDate};

use crate::models::{weekday_ordinal, Frequency, RecurrenceRule, WeekdaySet};

/// Computes the next due date strictly after `after`.
///
/// # Arguments
/// * `rule` - The recurrence rule, assumed to have passed validation
/// * `after` - Anchor date; usually the due date of the last completed or
///   generated occurrence, or the rule's start date
///
/// # Returns
/// * `Option<NaiveDate>` - The next candidate, or `None` when the rule is
///   inactive or the candidate falls after `end_date`
///
/// # Behavior
/// - Daily: `after + interval` days
/// - Weekly/Custom: next listed weekday in the current on-cycle week, else the
///   first listed weekday of the next on-cycle week. Cycles are counted in
///   whole weeks from the Monday of `start_date`'s week.
/// - Monthly: `day_of_month` in the month `interval` months later, clamped to
///   the last day of that month
/// - Yearly: `month_of_year`/`day_of_month` `interval` years later, clamped the
///   same way (Feb 29 becomes Feb 28 outside leap years)
pub fn next_due_date(rule: &RecurrenceRule, after: NaiveDate) -> Option<NaiveDate> {
    if !rule.is_active {
        return None;
    }

    let interval = rule.interval.max(1);
    let candidate = match &rule.frequency {
        Frequency::Daily => after.checked_add_days(Days::new(u64::from(interval)))?,
        Frequency::Weekly { weekdays } | Frequency::Custom { weekdays } => {
            next_weekday_in_cycle(weekdays, interval, rule.start_date, after)?
        }
        Frequency::Monthly { day_of_month } => {
            let months = i64::from(after.year()) * 12 + i64::from(after.month0()) + i64::from(interval);
            let year = i32::try_from(months.div_euclid(12)).ok()?;
            let month = months.rem_euclid(12) as u32 + 1;
            clamped_date(year, month, *day_of_month)?
        }
        Frequency::Yearly {
            month_of_year,
            day_of_month,
        } => {
            let year = after.year().checked_add(i32::try_from(interval).ok()?)?;
            clamped_date(year, *month_of_year, *day_of_month)?
        }
    };

    match rule.end_date {
        Some(end) if candidate > end => None,
        _ => Some(candidate),
    }
}

/// Iterator over successive occurrences of a rule, starting after an anchor.
#[derive(Debug, Clone)]
pub struct Occurrences<'a> {
    rule: &'a RecurrenceRule,
    cursor: NaiveDate,
    finished: bool,
}

impl Iterator for Occurrences<'_> {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match next_due_date(self.rule, self.cursor) {
            Some(next) => {
                self.cursor = next;
                Some(next)
            }
            None => {
                self.finished = true;
                None
            }
        }
    }
}

/// Lazily walks the occurrences of `rule` that come after `after`.
pub fn occurrences_after(rule: &RecurrenceRule, after: NaiveDate) -> Occurrences<'_> {
    Occurrences {
        rule,
        cursor: after,
        finished: false,
    }
}

/// Returns up to `count` upcoming occurrences after `after`.
pub fn preview(rule: &RecurrenceRule, after: NaiveDate, count: usize) -> Vec<NaiveDate> {
    occurrences_after(rule, after).take(count).collect()
}

/// Number of days in the given month, or `None` for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((next_first - first).num_days() as u32)
}

/// Builds `year-month-day`, pulling `day` back to the month's last day when it overflows.
fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let last = days_in_month(year, month)?;
    NaiveDate::from_ymd_opt(year, month, day.clamp(1, last))
}

#[inline]
fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

fn next_weekday_in_cycle(
    weekdays: &WeekdaySet,
    interval: u32,
    start_date: NaiveDate,
    after: NaiveDate,
) -> Option<NaiveDate> {
    let first_listed = *weekdays.iter().next()?;
    let interval = i64::from(interval);
    let anchor_week = monday_of(start_date);
    let current_week = monday_of(after);
    let week_index = (current_week - anchor_week).num_days().div_euclid(7);

    if week_index.rem_euclid(interval) == 0 {
        let after_ordinal = weekday_ordinal(after.weekday());
        if let Some(&later) = weekdays.range(after_ordinal + 1..).next() {
            return current_week.checked_add_days(Days::new(u64::from(later)));
        }
    }

    let next_cycle_week = (week_index.div_euclid(interval) + 1).checked_mul(interval)?;
    anchor_week
        .checked_add_signed(Duration::try_weeks(next_cycle_week)?)?
        .checked_add_days(Days::new(u64::from(first_listed)))
}
