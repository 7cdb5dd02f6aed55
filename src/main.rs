mod app;
mod charts;
mod config;
mod generate;
mod models;
mod present;
mod prompts;
mod query;
mod render;
mod stats;
mod store;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::generate::{CommentaryBridge, HttpGenerator};
use crate::store::RecordStore;

/// clip_desk - news clipping browser with AI commentary
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the news spreadsheet (CSV)
    #[arg(long, default_value = "news.csv")]
    news: PathBuf,

    /// Path to the company profiles spreadsheet (CSV)
    #[arg(long, default_value = "companies.csv")]
    companies: PathBuf,

    /// Path to the generation service config (overrides CLIP_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// News items per page
    #[arg(long, default_value_t = 8)]
    page_size: usize,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Search the clippings and optionally generate commentary on one card
    Browse {
        /// Free-text search over title and body
        #[arg(short, long)]
        query: Option<String>,

        /// 1-based page of the current selection
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Card number (as displayed) to generate commentary for
        #[arg(long)]
        comment: Option<usize>,

        /// Focus for the generated commentary
        #[arg(short, long, default_value = "")]
        instruction: String,
    },

    /// Browse by topic cluster and optionally summarize the whole cluster
    Topics {
        /// Cluster label; omit to list the available topics
        #[arg(short, long)]
        topic: Option<String>,

        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Generate a summary over every item in the cluster
        #[arg(long)]
        summarize: bool,

        #[arg(short, long, default_value = "")]
        instruction: String,
    },

    /// Company profiles with their commentary and matching headlines
    Companies {
        /// Company name; omit to list every profile
        #[arg(long)]
        company: Option<String>,
    },

    /// Aggregate statistics over a date range
    Stats {
        /// Start day, YYYY-MM-DD (defaults to the earliest loaded date)
        #[arg(long)]
        from: Option<String>,

        /// End day, YYYY-MM-DD (defaults to the latest loaded date)
        #[arg(long)]
        to: Option<String>,

        /// Also write the chart-ready JSON bundle here
        #[arg(long)]
        export_dir: Option<PathBuf>,
    },

    /// Interactive chat with Barbosa
    Chat,
}

fn resolve_config_path(flag: Option<&PathBuf>) -> PathBuf {
    if let Some(p) = flag {
        debug!("Using config file from --config argument: {}", p.display());
        return p.clone();
    }
    if let Ok(p) = std::env::var("CLIP_CONFIG") {
        debug!("Using config file from CLIP_CONFIG: {}", p);
        return PathBuf::from(p);
    }
    PathBuf::from("config.yaml")
}

fn make_bridge(flag: Option<&PathBuf>) -> Result<CommentaryBridge> {
    let cfg_path = resolve_config_path(flag);
    if !cfg_path.exists() {
        return Err(anyhow::anyhow!(
            "generation config not found at {}\n\
             Use --config to specify a config file, or set CLIP_CONFIG.\n\
             Example config.yaml:\n\
             api_base: \"http://localhost:5001/v1\"\napi_key: \"YOUR_KEY\"\nmodel: \"gemini-1.5-pro-latest\"\n",
            cfg_path.display()
        ));
    }
    let cfg = config::load_config(&cfg_path)?;
    let generator = HttpGenerator::new(&cfg)?;
    Ok(CommentaryBridge::new(Box::new(generator)))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();

    let args = Args::parse();
    info!(
        "Starting clip_desk - news={}, companies={}",
        args.news.display(),
        args.companies.display()
    );

    // Loaded once; any malformed input aborts here rather than degrading.
    let store = RecordStore::load(&args.news, &args.companies)?;

    match &args.mode {
        Mode::Browse {
            query,
            page,
            comment,
            instruction,
        } => {
            let bridge = if comment.is_some() {
                Some(make_bridge(args.config.as_ref())?)
            } else {
                None
            };
            app::run_browse(
                &store,
                query.as_deref(),
                *page,
                args.page_size,
                *comment,
                instruction,
                bridge.as_ref(),
            )
            .await
        }
        Mode::Topics {
            topic,
            page,
            summarize,
            instruction,
        } => {
            let bridge = if *summarize {
                Some(make_bridge(args.config.as_ref())?)
            } else {
                None
            };
            app::run_topics(
                &store,
                topic.as_deref(),
                *page,
                args.page_size,
                *summarize,
                instruction,
                bridge.as_ref(),
            )
            .await
        }
        Mode::Companies { company } => app::run_companies(&store, company.as_deref()),
        Mode::Stats {
            from,
            to,
            export_dir,
        } => app::run_stats(&store, from.as_deref(), to.as_deref(), export_dir.as_deref()),
        Mode::Chat => {
            let bridge = make_bridge(args.config.as_ref())?;
            app::run_chat(&bridge).await
        }
    }
}
