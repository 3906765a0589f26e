//! Monthly aggregation over a book's entries.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use super::types::EntryKind;

/// One calendar month's totals within a report year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlySummary {
    /// Calendar month, 1-12.
    pub month: u32,
    /// Sum of IN amounts.
    pub total_in: Decimal,
    /// Sum of OUT amounts.
    pub total_out: Decimal,
    /// Number of entries in the month.
    pub count: u64,
}

/// Groups a book's entries by calendar month for the given year.
///
/// IN and OUT amounts are summed separately and entries counted per month.
/// Months without entries are omitted; results are sorted ascending by
/// month. Entries outside the year are ignored.
#[must_use]
pub fn monthly_report<I>(year: i32, entries: I) -> Vec<MonthlySummary>
where
    I: IntoIterator<Item = (NaiveDate, EntryKind, Decimal)>,
{
    let mut months: BTreeMap<u32, MonthlySummary> = BTreeMap::new();

    for (date, kind, amount) in entries {
        if date.year() != year {
            continue;
        }
        let summary = months.entry(date.month()).or_insert_with(|| MonthlySummary {
            month: date.month(),
            total_in: Decimal::ZERO,
            total_out: Decimal::ZERO,
            count: 0,
        });
        match kind {
            EntryKind::In => summary.total_in += amount,
            EntryKind::Out => summary.total_out += amount,
        }
        summary.count += 1;
    }

    months.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_empty_report() {
        assert!(monthly_report(2026, std::iter::empty()).is_empty());
    }

    #[test]
    fn test_groups_by_month_and_sums_kinds_separately() {
        let entries = vec![
            (date(2026, 1, 5), EntryKind::In, dec!(500)),
            (date(2026, 1, 20), EntryKind::Out, dec!(120)),
            (date(2026, 3, 2), EntryKind::In, dec!(75)),
            (date(2026, 3, 9), EntryKind::In, dec!(25)),
        ];
        let report = monthly_report(2026, entries);

        assert_eq!(report.len(), 2);
        assert_eq!(
            report[0],
            MonthlySummary {
                month: 1,
                total_in: dec!(500),
                total_out: dec!(120),
                count: 2,
            }
        );
        assert_eq!(
            report[1],
            MonthlySummary {
                month: 3,
                total_in: dec!(100),
                total_out: Decimal::ZERO,
                count: 2,
            }
        );
    }

    #[test]
    fn test_other_years_are_ignored() {
        let entries = vec![
            (date(2025, 12, 31), EntryKind::In, dec!(10)),
            (date(2026, 1, 1), EntryKind::In, dec!(20)),
            (date(2027, 1, 1), EntryKind::In, dec!(30)),
        ];
        let report = monthly_report(2026, entries);
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].total_in, dec!(20));
    }

    #[test]
    fn test_months_sorted_ascending() {
        let entries = vec![
            (date(2026, 11, 1), EntryKind::Out, dec!(1)),
            (date(2026, 2, 1), EntryKind::Out, dec!(1)),
            (date(2026, 7, 1), EntryKind::Out, dec!(1)),
        ];
        let months: Vec<u32> = monthly_report(2026, entries).iter().map(|m| m.month).collect();
        assert_eq!(months, vec![2, 7, 11]);
    }
}
