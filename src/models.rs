use anyhow::{bail, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the news spreadsheet. `date` is already normalized to
/// ISO-8601 `YYYY-MM-DD` by the store; nothing downstream re-parses it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub body: String,
    pub date: String, // "YYYY-MM-DD"
    pub source: String,
    pub sentiment: Sentiment,
    pub relevance: f32,
    pub keywords: String,
    pub link: String,
    pub cluster: String, // topic cluster used for grouping/summaries
    pub theme: String,   // coarser theme used for the share chart
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub name: String,
    pub commentary: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Other,
}

impl Sentiment {
    /// Accepts the spreadsheet's Portuguese labels and their English
    /// equivalents, case-insensitively. Unrecognized values become `Other`
    /// rather than failing the load.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "positivo" | "positive" => Sentiment::Positive,
            "negativo" | "negative" => Sentiment::Negative,
            "neutro" | "neutral" => Sentiment::Neutral,
            _ => Sentiment::Other,
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "positive"),
            Sentiment::Negative => write!(f, "negative"),
            Sentiment::Neutral => write!(f, "neutral"),
            Sentiment::Other => write!(f, "other"),
        }
    }
}

/// One turn of the chat transcript; ordering is chronological and significant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub is_user: bool,
    pub text: String,
}

/// Inclusive calendar-day range restricting the statistics view.
#[derive(Debug, Clone, Copy)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            bail!("invalid date range: {} is after {}", start, end);
        }
        Ok(DateRange { start, end })
    }

    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let start = NaiveDate::parse_from_str(start, "%Y-%m-%d")
            .map_err(|e| anyhow::anyhow!("invalid start date {:?}: {}", start, e))?;
        let end = NaiveDate::parse_from_str(end, "%Y-%m-%d")
            .map_err(|e| anyhow::anyhow!("invalid end date {:?}: {}", end, e))?;
        DateRange::new(start, end)
    }

    /// ISO bounds; `NaiveDate` displays as `YYYY-MM-DD`, so normalized record
    /// dates compare correctly as strings.
    pub fn iso_bounds(&self) -> (String, String) {
        (self.start.to_string(), self.end.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentiment_parses_both_languages() {
        assert_eq!(Sentiment::parse("Positivo"), Sentiment::Positive);
        assert_eq!(Sentiment::parse("negative"), Sentiment::Negative);
        assert_eq!(Sentiment::parse(" Neutro "), Sentiment::Neutral);
        assert_eq!(Sentiment::parse("NEUTRAL"), Sentiment::Neutral);
    }

    #[test]
    fn sentiment_unknown_is_other() {
        assert_eq!(Sentiment::parse("Misto"), Sentiment::Other);
        assert_eq!(Sentiment::parse(""), Sentiment::Other);
    }

    #[test]
    fn date_range_rejects_inverted_bounds() {
        assert!(DateRange::parse("2024-02-01", "2024-01-01").is_err());
        assert!(DateRange::parse("2024-01-01", "2024-01-01").is_ok());
    }

    #[test]
    fn iso_bounds_are_zero_padded() {
        let r = DateRange::parse("2024-01-05", "2024-11-30").unwrap();
        assert_eq!(
            r.iso_bounds(),
            ("2024-01-05".to_string(), "2024-11-30".to_string())
        );
    }
}
