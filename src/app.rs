use anyhow::{bail, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use crate::charts::{write_stats_bundle, StatsBundle};
use crate::generate::{ChatSession, CommentaryBridge, DEFAULT_MAX_TURNS};
use crate::models::{ConversationTurn, DateRange};
use crate::query::{filter, page_count, paginate, Predicate};
use crate::render;
use crate::stats::{count_by_day, count_by_source, count_by_theme, restrict};
use crate::store::RecordStore;

/// Browse mode: free-text search, one page of cards, optional commentary on
/// one of the listed cards.
pub async fn run_browse(
    store: &RecordStore,
    query: Option<&str>,
    page: usize,
    page_size: usize,
    comment: Option<usize>,
    instruction: &str,
    bridge: Option<&CommentaryBridge>,
) -> Result<()> {
    let predicate = Predicate::from_search(query);
    let view = filter(store.news(), &predicate);
    debug!("Browse view - matches={}, page={}, page_size={}", view.len(), page, page_size);

    print_page(&view, page, page_size);

    if let Some(number) = comment {
        if number == 0 {
            bail!("news items are numbered from 1");
        }
        let Some(item) = view.get(number - 1) else {
            bail!(
                "no news item numbered {} (current selection has {})",
                number,
                view.len()
            );
        };
        let Some(bridge) = bridge else {
            bail!("commentary requires a generation config (--config)");
        };
        info!("Generating commentary - item={}, instruction={:?}", number, instruction);
        let commentary = bridge.generate(&item.body, instruction).await?;
        println!("Commentary:\n{}", commentary);
    }

    Ok(())
}

/// Topics mode: list the clusters, or show one cluster's page and optionally
/// summarize the whole cluster in a single generation call.
pub async fn run_topics(
    store: &RecordStore,
    topic: Option<&str>,
    page: usize,
    page_size: usize,
    summarize: bool,
    instruction: &str,
    bridge: Option<&CommentaryBridge>,
) -> Result<()> {
    let Some(topic) = topic else {
        println!("Available topics:");
        for c in store.clusters() {
            println!("- {}", c);
        }
        return Ok(());
    };

    let view = filter(store.news(), &Predicate::Topic(topic.to_string()));
    debug!("Topic view - topic={}, matches={}", topic, view.len());

    print_page(&view, page, page_size);

    if summarize {
        if view.is_empty() {
            // Nothing to summarize; the empty-result line above already said so.
            return Ok(());
        }
        let Some(bridge) = bridge else {
            bail!("summaries require a generation config (--config)");
        };
        // The whole cluster feeds the summary, not just the visible page.
        let joined = view
            .iter()
            .map(|n| n.body.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        info!("Generating topic summary - topic={}, items={}", topic, view.len());
        let summary = bridge.generate(&joined, instruction).await?;
        println!("Summary:\n{}", summary);
    }

    Ok(())
}

/// Companies mode: each profile's precomputed commentary plus the news whose
/// titles mention the company.
pub fn run_companies(store: &RecordStore, company: Option<&str>) -> Result<()> {
    let profiles = store.companies();

    if let Some(name) = company {
        let Some(profile) = profiles
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
        else {
            bail!("unknown company {:?}", name);
        };
        let news = filter(store.news(), &Predicate::Company(profile.name.clone()));
        print!("{}", render::render_company(profile, &news));
        return Ok(());
    }

    for profile in profiles {
        let news = filter(store.news(), &Predicate::Company(profile.name.clone()));
        print!("{}\n", render::render_company(profile, &news));
    }
    Ok(())
}

/// Statistics mode: date-restricted aggregates as terminal charts, optionally
/// exported as a JSON bundle.
pub fn run_stats(
    store: &RecordStore,
    from: Option<&str>,
    to: Option<&str>,
    export_dir: Option<&std::path::Path>,
) -> Result<()> {
    let Some((min, max)) = store.date_bounds() else {
        println!("{}", render::EMPTY_RESULT_MSG);
        return Ok(());
    };
    let range = DateRange::parse(from.unwrap_or(min), to.unwrap_or(max))?;

    let view = restrict(store.news(), &range);
    let (start, end) = range.iso_bounds();
    info!("Statistics - range={}..{}, records={}", start, end, view.len());

    let bundle = StatsBundle {
        by_day: count_by_day(&view),
        by_source: count_by_source(&view),
        by_theme: count_by_theme(&view),
    };

    println!("{}", render::render_bar_chart("News per day", &bundle.by_day));
    println!("{}", render::render_bar_chart("News per source", &bundle.by_source));
    println!("{}", render::render_share_table("Theme share", &bundle.by_theme));

    if let Some(dir) = export_dir {
        write_stats_bundle(dir, &range, &bundle)?;
        info!("Chart bundle exported - directory={}", dir.display());
    }

    Ok(())
}

/// Chat mode: line-oriented conversation loop; an empty line or "exit" ends
/// the session and discards the transcript.
pub async fn run_chat(bridge: &CommentaryBridge) -> Result<()> {
    use std::io::Write;

    let mut session = ChatSession::new(DEFAULT_MAX_TURNS);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Chat with Barbosa (empty line or \"exit\" to quit).");
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let question = line.trim();
        if question.is_empty() || question.eq_ignore_ascii_case("exit") {
            break;
        }

        match session.chat(bridge, question).await {
            Ok(reply) => print!(
                "{}",
                render::render_chat_turn(&ConversationTurn {
                    is_user: false,
                    text: reply,
                })
            ),
            // Surface the failure and keep the session alive.
            Err(e) => warn!("Generation failed - error={:#}", e),
        }
    }

    info!("Chat session ended - turns={}", session.history().len());
    Ok(())
}

fn print_page(view: &[&crate::models::NewsItem], page: usize, page_size: usize) {
    if view.is_empty() {
        println!("{}", render::EMPTY_RESULT_MSG);
        return;
    }

    let pages = page_count(view.len(), page_size);
    let slice = paginate(view, page, page_size);
    if slice.is_empty() {
        println!("Page {} is empty (pages 1..{}).", page, pages);
        return;
    }

    let start = (page.max(1) - 1) * page_size;
    println!("Page {}/{} - {} matching news\n", page.max(1), pages, view.len());
    for (i, item) in slice.iter().enumerate() {
        let payload = crate::present::display_payload(item);
        println!("{}", render::render_card(start + i + 1, &payload));
    }
}
