use crate::constants::{MAX_WINDOW_MONTHS, MONTH_PREFIX_LEN};
use crate::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate};
use futures::{future, Stream, TryStreamExt};
use std::collections::BTreeSet;
use tracing::debug;

/// Computes the `YYYYMM` prefixes of the `months` calendar months preceding
/// the month of `reference`.
///
/// The reference month itself is never included. Prefixes are returned from
/// the most recent month to the oldest, rolling the year back as needed:
/// a January 2024 reference with `months = 12` yields `202312` down to `202301`.
///
/// # Errors
///
/// Returns `InvalidInput` when `months` is zero or above `MAX_WINDOW_MONTHS`,
/// when the reference year has more than four digits, or when the window
/// would reach back before year 0.
pub fn month_prefixes(reference: NaiveDate, months: u32) -> AppResult<Vec<String>> {
    if months == 0 {
        return Err(AppError::InvalidInput(
            "Window must span at least one month".to_string(),
        ));
    }
    if months > MAX_WINDOW_MONTHS {
        return Err(AppError::InvalidInput(format!(
            "Window must span at most {MAX_WINDOW_MONTHS} months, got {months}"
        )));
    }
    if !(0..=9999).contains(&reference.year()) {
        return Err(AppError::InvalidInput(format!(
            "Reference year must have four digits, got {}",
            reference.year()
        )));
    }

    // Months since January of year 0
    let current = i64::from(reference.year()) * 12 + i64::from(reference.month0());
    if current < i64::from(months) {
        return Err(AppError::InvalidInput(format!(
            "A {months} month window before {reference} reaches past year 0"
        )));
    }

    let prefixes = (1..=i64::from(months))
        .map(|offset| {
            let index = current - offset;
            let year = index.div_euclid(12);
            let month = index.rem_euclid(12) + 1;
            format!("{year:04}{month:02}")
        })
        .collect();

    Ok(prefixes)
}

/// Set of month prefixes used to select object keys.
///
/// Every prefix is exactly six characters, so "starts with any prefix" reduces
/// to a membership test on the first six bytes of a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixWindow {
    prefixes: BTreeSet<String>,
}

impl PrefixWindow {
    /// Builds the window of `months` months preceding `reference`.
    pub fn preceding(reference: NaiveDate, months: u32) -> AppResult<Self> {
        let prefixes: BTreeSet<String> = month_prefixes(reference, months)?.into_iter().collect();
        debug!(reference = %reference, months = months, "Computed month window");
        Ok(Self { prefixes })
    }

    /// Prefixes in ascending (oldest first) order.
    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.prefixes.iter().map(String::as_str)
    }

    /// Number of months covered by the window.
    pub fn month_count(&self) -> usize {
        self.prefixes.len()
    }

    /// Returns `true` if `key` starts with one of the window's prefixes.
    pub fn matches(&self, key: &str) -> bool {
        key.get(..MONTH_PREFIX_LEN)
            .map_or(false, |head| self.prefixes.contains(head))
    }

    /// Keeps the keys inside the window, preserving their order; errors pass through.
    pub fn select_stream<'a, S>(&'a self, keys: S) -> impl Stream<Item = AppResult<String>> + 'a
    where
        S: Stream<Item = AppResult<String>> + 'a,
    {
        keys.try_filter(move |key| future::ready(self.matches(key)))
    }
}
