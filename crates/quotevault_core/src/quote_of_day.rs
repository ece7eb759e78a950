//! crates/quotevault_core/src/quote_of_day.rs
//!
//! Deterministic "quote of the day" selection.
//!
//! The index is the digit sum of the date written as YYYYMMDD, modulo the
//! size of the full quote set. Every client picks the same quote on the same
//! calendar day for a fixed dataset. The index is positional, not id-based,
//! so it is not stable across insertions or deletions; that fragility is a
//! documented property of the selection rule, not something to repair here.

use chrono::NaiveDate;

use crate::domain::Quote;

/// Sum of the eight digits of the date formatted as YYYYMMDD.
pub fn digit_sum(date: NaiveDate) -> u32 {
    date.format("%Y%m%d")
        .to_string()
        .chars()
        .filter_map(|c| c.to_digit(10))
        .sum()
}

/// The positional index for `date` into a quote set of `len` records.
pub fn index_for(date: NaiveDate, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(digit_sum(date) as usize % len)
}

/// Select the day's quote from the full unfiltered quote set.
pub fn pick(date: NaiveDate, quotes: &[Quote]) -> Option<&Quote> {
    index_for(date, quotes.len()).map(|index| &quotes[index])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;
    use chrono::{TimeZone, Utc};

    fn quote(id: i64) -> Quote {
        Quote {
            id,
            text: format!("quote {id}"),
            author: "someone".to_string(),
            category: Category::Wisdom,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn digit_sum_for_20240115_is_15() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(digit_sum(date), 15);
    }

    #[test]
    fn index_is_digit_sum_mod_count() {
        // 2+0+2+4+0+1+1+5 = 15, 15 mod 7 = 1
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(index_for(date, 7), Some(1));

        let quotes: Vec<Quote> = (0..7).map(quote).collect();
        assert_eq!(pick(date, &quotes), Some(&quotes[1]));
    }

    #[test]
    fn empty_quote_set_selects_nothing() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(index_for(date, 0), None);
        assert_eq!(pick(date, &[]), None);
    }
}
