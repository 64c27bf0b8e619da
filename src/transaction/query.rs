//! Reading a [FilterState] from URL query parameters.

use serde::Deserialize;
use time::{Date, macros::format_description};

use crate::{
    Error,
    bank::BankId,
    money::Money,
    transaction::{AmountRange, DatePreset, DateRange, FilterState},
};

/// The query string of the transactions endpoint.
///
/// Categories and banks are selected by repeating the key, e.g.
/// `?category=Food&category=Rent&bank=card-1`.
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    /// A relative date window.
    pub preset: Option<DatePreset>,
    /// The first day of an explicit date range, `YYYY-MM-DD`.
    pub from: Option<String>,
    /// The last day of an explicit date range, `YYYY-MM-DD`.
    pub to: Option<String>,
    /// The smallest transaction size to keep.
    pub min: Option<String>,
    /// The largest transaction size to keep.
    pub max: Option<String>,
    /// Category names to keep.
    #[serde(default, rename = "category")]
    pub categories: Vec<String>,
    /// Recipient bank IDs to keep.
    #[serde(default, rename = "bank")]
    pub banks: Vec<String>,
}

impl TryFrom<FilterQuery> for FilterState {
    type Error = Error;

    fn try_from(query: FilterQuery) -> Result<Self, Self::Error> {
        let mut filter = FilterState::default();

        let from = query.from.as_deref().map(parse_query_date).transpose()?;
        let to = query.to.as_deref().map(parse_query_date).transpose()?;

        match (query.preset, from, to) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
                return Err(Error::ConflictingDateFilters);
            }
            (Some(preset), None, None) => filter.select_preset(preset),
            (None, None, None) => {}
            // An open end of the range is unbounded.
            (None, from, to) => filter.select_range(DateRange::new(
                from.unwrap_or(Date::MIN),
                to.unwrap_or(Date::MAX),
            )?),
        }

        let min = query
            .min
            .as_deref()
            .map(Money::parse_lenient)
            .transpose()?
            .unwrap_or(Money::ZERO);
        let max = query
            .max
            .as_deref()
            .map(Money::parse_lenient)
            .transpose()?
            .unwrap_or(AmountRange::DEFAULT_MAX);
        filter.amount = AmountRange::new(min, max)?;

        filter.categories = query.categories.into_iter().collect();
        filter.banks = query
            .banks
            .iter()
            .map(|raw| BankId::new(raw))
            .collect::<Result<_, _>>()?;

        Ok(filter)
    }
}

fn parse_query_date(raw: &str) -> Result<Date, Error> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| Error::InvalidFilterDate(raw.to_owned()))
}

#[cfg(test)]
mod filter_query_tests {
    use std::collections::HashSet;

    use time::{Date, macros::date};

    use crate::{
        Error, Money,
        bank::BankId,
        transaction::{AmountRange, DateFilter, DatePreset, DateRange, FilterState},
    };

    use super::FilterQuery;

    fn parse(query: &str) -> Result<FilterState, Error> {
        let query: FilterQuery = serde_html_form::from_str(query).unwrap();
        FilterState::try_from(query)
    }

    #[test]
    fn empty_query_is_default_filter() {
        assert_eq!(parse(""), Ok(FilterState::default()));
    }

    #[test]
    fn reads_every_field() {
        let got =
            parse("preset=last30&min=5&max=%2410.50&category=Food&category=Rent&bank=card-1")
                .unwrap();

        assert_eq!(got.date, DateFilter::Preset(DatePreset::Last30));
        assert_eq!(
            got.amount,
            AmountRange::new(Money::from_dollars(5), Money::from_cents(1050)).unwrap()
        );
        assert_eq!(
            got.categories,
            HashSet::from(["Food".to_owned(), "Rent".to_owned()])
        );
        assert_eq!(got.banks, HashSet::from([BankId::new_unchecked("card-1")]));
    }

    #[test]
    fn reads_date_range() {
        let got = parse("from=2025-01-01&to=2025-01-31").unwrap();

        assert_eq!(
            got.date,
            DateFilter::Range(DateRange::new(date!(2025-01-01), date!(2025-01-31)).unwrap())
        );
    }

    #[test]
    fn open_ended_range() {
        let got = parse("from=2025-01-01").unwrap();

        assert_eq!(
            got.date,
            DateFilter::Range(DateRange::new(date!(2025-01-01), Date::MAX).unwrap())
        );
    }

    #[test]
    fn preset_and_range_conflict() {
        assert_eq!(
            parse("preset=today&from=2025-01-01"),
            Err(Error::ConflictingDateFilters)
        );
    }

    #[test]
    fn backwards_range_is_rejected() {
        assert_eq!(
            parse("from=2025-02-01&to=2025-01-01"),
            Err(Error::InvalidDateRange)
        );
    }

    #[test]
    fn malformed_date_is_rejected() {
        assert_eq!(
            parse("from=01/02/2025"),
            Err(Error::InvalidFilterDate("01/02/2025".to_owned()))
        );
    }

    #[test]
    fn min_above_max_is_rejected() {
        assert!(matches!(parse("min=10&max=1"), Err(Error::InvalidAmount(_))));
    }
}
