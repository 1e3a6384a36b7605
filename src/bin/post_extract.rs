//! Command-line interface for post_extract
//! Reads a saved HTML page (or stdin) and prints the selected post as JSON.
//!
//! Usage:
//!   post-extract page.html --url https://twitter.com/home --anchor-text "selected words"
//!   cat page.html | post-extract --anchor-selector 'article:nth-of-type(2)'

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use post_extract::{
    extract_from_html, EmojiStyle, ExtractConfig, ExtractError, ExtractionRequest,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(
    name = "post-extract",
    version,
    about = "Extract a structured post record from saved HTML"
)]
struct Args {
    /// HTML file to read; stdin when omitted
    path: Option<PathBuf>,

    /// URL of the page the HTML was captured from
    #[arg(long, default_value = "")]
    url: String,

    /// Text selected inside the post
    #[arg(long, conflicts_with = "anchor_selector")]
    anchor_text: Option<String>,

    /// CSS selector for an element inside the post
    #[arg(long)]
    anchor_selector: Option<String>,

    /// How emoji images are copied: none, emoji or label
    #[arg(long, default_value_t = EmojiStyle::Emoji)]
    emoji_style: EmojiStyle,

    /// Estimate the reply count of a detail post from the replies on the page
    #[arg(long)]
    estimate_replies: bool,

    /// Viewer clock offset from UTC in minutes, for detail-page timestamps
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    utc_offset: i32,

    /// Print JSON on a single line
    #[arg(long)]
    compact: bool,
}

fn main() -> ExitCode {
    if let Err(e) = init_tracing() {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if matches!(e.downcast_ref::<ExtractError>(), Some(ExtractError::NotFound)) {
                error!("no post found at the given anchor");
            } else {
                error!("{e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let html = match &args.path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    let request = ExtractionRequest {
        page_url: args.url,
        anchor_text: args.anchor_text,
        anchor_selector: args.anchor_selector,
        config: ExtractConfig {
            emoji_style: args.emoji_style,
            estimate_display_replies: args.estimate_replies,
            display_utc_offset_minutes: args.utc_offset,
        },
    };

    let post = extract_from_html(&html, &request)?;
    info!(handle = %post.author_handle, quote = post.quote.is_some(), "extracted post");

    let json = if args.compact {
        serde_json::to_string(&post)?
    } else {
        serde_json::to_string_pretty(&post)?
    };
    println!("{json}");
    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,post_extract=info"));

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| matches!(v.to_lowercase().as_str(), "json" | "structured"))
        .unwrap_or(false);

    if use_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    }

    Ok(())
}
