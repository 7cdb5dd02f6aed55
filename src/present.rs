use crate::models::{NewsItem, Sentiment};

const EXCERPT_CHARS: usize = 280;

/// Everything a card needs, precomputed. Pure data; rendering decides layout.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayPayload {
    pub title: String,
    pub excerpt: String,
    pub date: String,
    pub relevance: f32,
    pub keywords: String,
    pub link: String,
    pub color: SentimentColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentColor {
    Green,
    Red,
    Yellow,
    Gray,
}

impl SentimentColor {
    pub fn name(&self) -> &'static str {
        match self {
            SentimentColor::Green => "green",
            SentimentColor::Red => "red",
            SentimentColor::Yellow => "yellow",
            SentimentColor::Gray => "gray",
        }
    }

    pub fn ansi(&self) -> &'static str {
        match self {
            SentimentColor::Green => "\x1b[32m",
            SentimentColor::Red => "\x1b[31m",
            SentimentColor::Yellow => "\x1b[33m",
            SentimentColor::Gray => "\x1b[90m",
        }
    }
}

/// Single color table for every view: Positive→green, Negative→red,
/// Neutral→yellow, anything else→gray. The original used two inverted
/// fallback tables across its views; one mapping is kept deliberately.
pub fn sentiment_color(sentiment: Sentiment) -> SentimentColor {
    match sentiment {
        Sentiment::Positive => SentimentColor::Green,
        Sentiment::Negative => SentimentColor::Red,
        Sentiment::Neutral => SentimentColor::Yellow,
        Sentiment::Other => SentimentColor::Gray,
    }
}

pub fn display_payload(item: &NewsItem) -> DisplayPayload {
    DisplayPayload {
        title: item.title.clone(),
        excerpt: excerpt(&item.body, EXCERPT_CHARS),
        date: item.date.clone(),
        relevance: item.relevance,
        keywords: item.keywords.clone(),
        link: item.link.clone(),
        color: sentiment_color(item.sentiment),
    }
}

/// Truncate on a char boundary, with an ellipsis when anything was cut.
fn excerpt(body: &str, max_chars: usize) -> String {
    if body.chars().count() <= max_chars {
        return body.to_string();
    }
    let cut: String = body.chars().take(max_chars).collect();
    format!("{}…", cut.trim_end())
}
