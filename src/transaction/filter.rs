//! Narrowing a list of transactions down to what the user asked to see.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use time::{
    Date, Duration, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset,
    format_description::well_known::{Iso8601, Rfc3339},
    macros::{format_description, time},
};

use crate::{Error, bank::BankId, money::Money, transaction::Transaction};

/// A relative date window computed from the current time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DatePreset {
    /// The current local calendar day.
    Today,
    /// From the start of the day seven days ago until now.
    Last7,
    /// From the start of the day thirty days ago until now.
    Last30,
}

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    from: Date,
    to: Date,
}

impl DateRange {
    /// Create a range covering every day from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidDateRange] if `from` is after `to`.
    pub fn new(from: Date, to: Date) -> Result<Self, Error> {
        if from > to {
            Err(Error::InvalidDateRange)
        } else {
            Ok(Self { from, to })
        }
    }

    /// The first day in the range.
    pub fn from(&self) -> Date {
        self.from
    }

    /// The last day in the range.
    pub fn to(&self) -> Date {
        self.to
    }
}

/// The date part of a [FilterState].
///
/// A preset and an explicit range can never be active at the same time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateFilter {
    /// Any date.
    #[default]
    Any,
    /// A window relative to now.
    Preset(DatePreset),
    /// Fixed calendar days.
    Range(DateRange),
}

const END_OF_DAY: Time = time!(23:59:59.999_999_999);

impl DateFilter {
    /// The inclusive instants a transaction must fall between, or `None` for any date.
    ///
    /// Calendar days are taken in the offset of `now`.
    pub fn bounds(&self, now: OffsetDateTime) -> Option<(OffsetDateTime, OffsetDateTime)> {
        let start_of_day = |date_time: OffsetDateTime| date_time.replace_time(Time::MIDNIGHT);

        match self {
            DateFilter::Any => None,
            DateFilter::Preset(DatePreset::Today) => {
                Some((start_of_day(now), now.replace_time(END_OF_DAY)))
            }
            DateFilter::Preset(DatePreset::Last7) => {
                Some((start_of_day(now - Duration::days(7)), now))
            }
            DateFilter::Preset(DatePreset::Last30) => {
                Some((start_of_day(now - Duration::days(30)), now))
            }
            DateFilter::Range(range) => Some((
                range.from.midnight().assume_offset(now.offset()),
                range.to.with_time(END_OF_DAY).assume_offset(now.offset()),
            )),
        }
    }
}

/// An inclusive range of transaction magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountRange {
    min: Money,
    max: Money,
}

impl AmountRange {
    /// The upper bound used when none is given.
    pub const DEFAULT_MAX: Money = Money::from_dollars(100_000);

    /// Create a range from `min` to `max` inclusive.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidAmount] if `min` is greater than `max`.
    pub fn new(min: Money, max: Money) -> Result<Self, Error> {
        if min > max {
            Err(Error::InvalidAmount(format!("{min} to {max}")))
        } else {
            Ok(Self { min, max })
        }
    }

    /// Whether the size of `amount`, ignoring its sign, falls inside the range.
    pub fn contains(&self, amount: Money) -> bool {
        let magnitude = amount.abs();

        self.min <= magnitude && magnitude <= self.max
    }
}

impl Default for AmountRange {
    fn default() -> Self {
        Self {
            min: Money::ZERO,
            max: Self::DEFAULT_MAX,
        }
    }
}

/// Which transactions the user wants to see.
///
/// Every part must match for a transaction to be kept. Empty category and
/// bank selections match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    /// The active date window.
    pub date: DateFilter,
    /// The accepted transaction sizes.
    pub amount: AmountRange,
    /// Category names to keep.
    pub categories: HashSet<String>,
    /// Recipient banks to keep.
    pub banks: HashSet<BankId>,
}

impl FilterState {
    /// Use a date preset, clearing any explicit range.
    pub fn select_preset(&mut self, preset: DatePreset) {
        self.date = DateFilter::Preset(preset);
    }

    /// Use an explicit range, clearing any preset.
    pub fn select_range(&mut self, range: DateRange) {
        self.date = DateFilter::Range(range);
    }

    /// Accept any date.
    pub fn clear_dates(&mut self) {
        self.date = DateFilter::Any;
    }
}

/// Keep the transactions that match `filter`, in their original order.
///
/// `now` sets the current time and the local offset for date presets, date
/// ranges and dates without an offset. Transactions whose date cannot be
/// parsed are dropped.
pub fn filter_transactions(
    transactions: &[Transaction],
    filter: &FilterState,
    now: OffsetDateTime,
) -> Vec<Transaction> {
    let bounds = filter.date.bounds(now);

    transactions
        .iter()
        .filter(|transaction| {
            let Some(date) = parse_transaction_date(&transaction.date, now.offset()) else {
                tracing::debug!(
                    "skipping transaction {} with unreadable date {:?}",
                    transaction.id,
                    transaction.date
                );
                return false;
            };

            let in_window = bounds.is_none_or(|(start, end)| start <= date && date <= end);

            in_window
                && filter.amount.contains(transaction.amount)
                && (filter.categories.is_empty() || filter.categories.contains(&transaction.category))
                && (filter.banks.is_empty() || filter.banks.contains(&transaction.recipient_bank_id))
        })
        .cloned()
        .collect()
}

/// Read a stored transaction date.
///
/// Accepts RFC 3339, other ISO-8601 date-times (assumed to be in `offset` when
/// they have none) and bare `YYYY-MM-DD` dates, which are read as midnight.
pub fn parse_transaction_date(raw: &str, offset: UtcOffset) -> Option<OffsetDateTime> {
    let raw = raw.trim();

    if let Ok(date_time) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(date_time);
    }

    if let Ok(date_time) = OffsetDateTime::parse(raw, &Iso8601::DEFAULT) {
        return Some(date_time);
    }

    if let Ok(date_time) = PrimitiveDateTime::parse(raw, &Iso8601::DEFAULT) {
        return Some(date_time.assume_offset(offset));
    }

    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| date.midnight().assume_offset(offset))
}
