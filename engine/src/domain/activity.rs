//! Deterministic engagement streak derivation.
//!
//! The streak is computed from the persisted activity-date log: the
//! number of consecutive calendar days with at least one recorded
//! activity, ending today. A day without activity breaks the run, and a
//! quiet today means no streak at all.

use std::collections::HashSet;

use chrono::{Days, NaiveDate};

/// Count the consecutive active days ending at `today`.
///
/// Duplicate dates are tolerated; only presence per calendar day counts.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use engine::domain::activity::streak_days;
///
/// let d = |day| NaiveDate::from_ymd_opt(2026, 3, day).expect("valid date");
/// assert_eq!(streak_days(&[d(13), d(14), d(15)], d(15)), 3);
/// assert_eq!(streak_days(&[d(13), d(14)], d(15)), 0);
/// ```
pub fn streak_days(dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let active: HashSet<NaiveDate> = dates.iter().copied().collect();

    let mut streak = 0u32;
    let mut cursor = today;
    while active.contains(&cursor) {
        streak += 1;
        match cursor.checked_sub_days(Days::new(1)) {
            Some(previous) => cursor = previous,
            None => break,
        }
    }
    streak
}
