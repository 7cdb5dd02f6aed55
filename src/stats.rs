use std::collections::BTreeMap;

use crate::models::{DateRange, NewsItem};

/// Keep only records whose day falls inside the range, both ends inclusive.
/// Dates are normalized ISO strings, so the comparison is lexicographic.
pub fn restrict<'a>(records: &'a [NewsItem], range: &DateRange) -> Vec<&'a NewsItem> {
    let (lo, hi) = range.iso_bounds();
    records
        .iter()
        .filter(|r| r.date.as_str() >= lo.as_str() && r.date.as_str() <= hi.as_str())
        .collect()
}

pub fn count_by_day(records: &[&NewsItem]) -> BTreeMap<String, usize> {
    count_by(records, |r| &r.date)
}

pub fn count_by_source(records: &[&NewsItem]) -> BTreeMap<String, usize> {
    count_by(records, |r| &r.source)
}

pub fn count_by_theme(records: &[&NewsItem]) -> BTreeMap<String, usize> {
    count_by(records, |r| &r.theme)
}

fn count_by<'a>(
    records: &[&'a NewsItem],
    key: impl Fn(&'a NewsItem) -> &'a str,
) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for r in records {
        *counts.entry(key(r).to_string()).or_insert(0) += 1;
    }
    counts
}
