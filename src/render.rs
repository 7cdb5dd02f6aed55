use std::collections::BTreeMap;

use crate::models::{CompanyProfile, ConversationTurn, NewsItem};
use crate::present::DisplayPayload;

pub const EMPTY_RESULT_MSG: &str = "No news found for the current selection.";

const RESET: &str = "\x1b[0m";
const BAR_WIDTH: usize = 40;

/// One numbered card, sentiment shown as a colored dot.
pub fn render_card(number: usize, p: &DisplayPayload) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}●{} {}  relevance: {:.2}\n",
        p.color.ansi(),
        RESET,
        p.date,
        p.relevance
    ));
    out.push_str(&format!("{}. {}\n", number, p.title));
    if !p.excerpt.is_empty() {
        out.push_str(&format!("{}\n", p.excerpt));
    }
    if !p.keywords.is_empty() {
        out.push_str(&format!("Keywords: {}\n", p.keywords));
    }
    if !p.link.is_empty() {
        out.push_str(&format!("Link: {}\n", p.link));
    }
    out
}

/// Company section: precomputed commentary followed by the matching headlines.
pub fn render_company(profile: &CompanyProfile, news: &[&NewsItem]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Commentary on {}:\n", profile.name));
    out.push_str(&format!("{}\n\n", profile.commentary.trim()));
    out.push_str(&format!("News about {}:\n", profile.name));
    if news.is_empty() {
        out.push_str(&format!("{}\n", EMPTY_RESULT_MSG));
    } else {
        for n in news {
            out.push_str(&format!("- {} ({})\n  {}\n", n.title, n.date, n.link));
        }
    }
    out
}

pub fn render_chat_turn(turn: &ConversationTurn) -> String {
    if turn.is_user {
        format!("You: {}\n", turn.text)
    } else {
        format!("Barbosa: {}\n", turn.text)
    }
}

/// Horizontal bar chart over ordered counts, scaled to the largest group.
pub fn render_bar_chart(title: &str, counts: &BTreeMap<String, usize>) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", title));
    if counts.is_empty() {
        out.push_str(&format!("{}\n", EMPTY_RESULT_MSG));
        return out;
    }

    let max = counts.values().copied().max().unwrap_or(1).max(1);
    let label_width = counts.keys().map(|k| k.chars().count()).max().unwrap_or(0);
    for (label, &count) in counts {
        let bar_len = (count * BAR_WIDTH + max - 1) / max;
        out.push_str(&format!(
            "{:<width$}  {} {}\n",
            label,
            "█".repeat(bar_len),
            count,
            width = label_width
        ));
    }
    out
}

/// Percentage share per group; the terminal stand-in for the pie chart.
pub fn render_share_table(title: &str, counts: &BTreeMap<String, usize>) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", title));
    let total: usize = counts.values().sum();
    if total == 0 {
        out.push_str(&format!("{}\n", EMPTY_RESULT_MSG));
        return out;
    }
    let label_width = counts.keys().map(|k| k.chars().count()).max().unwrap_or(0);
    for (label, &count) in counts {
        let pct = count as f32 * 100.0 / total as f32;
        out.push_str(&format!(
            "{:<width$}  {:>5.1}%  ({})\n",
            label,
            pct,
            count,
            width = label_width
        ));
    }
    out
}
