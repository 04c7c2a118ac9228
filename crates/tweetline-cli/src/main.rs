//! tweetline command-line front end.
//!
//! Usage:
//!   # Reconcile one item and print display text plus link spans
//!   tweetline format tweet.json
//!   tweetline format tweet.json --json
//!
//!   # Page through a JSON array of items the way a scrolling list would
//!   tweetline page timeline.json --page-size 20 --max-pages 5
//!   tweetline --config delegate.ron page timeline.json
//!
//! Logging goes to stderr; set `RUST_LOG=tweetline_timeline=debug` for
//! request-level detail.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt};

use tweetline_text::{RichText, format_tweet_text, linkify_urls};
use tweetline_timeline::{DelegateConfig, MemoryTimeline, RefreshPolicy, TimelineDelegate};
use tweetline_types::Tweet;

#[derive(Parser, Debug)]
#[command(name = "tweetline")]
#[command(about = "Format timeline items and page through timelines")]
struct Args {
    /// Delegate config file (RON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG still wins when set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reconcile a single item's text and entities
    Format {
        /// Item JSON in the REST shape
        path: PathBuf,

        /// Keep the trailing photo link instead of stripping it
        #[arg(long)]
        keep_photo: bool,

        /// Print the reconciled text and entities as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load a JSON array of items and page through it
    Page {
        /// JSON array of items in the REST shape
        path: PathBuf,

        #[arg(long)]
        page_size: Option<usize>,

        #[arg(long)]
        capacity: Option<usize>,

        /// gated | ungated
        #[arg(long)]
        refresh_policy: Option<RefreshPolicy>,

        /// Stop after this many pages, including the first
        #[arg(long, default_value_t = usize::MAX)]
        max_pages: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Format {
            path,
            keep_photo,
            json,
        } => {
            let tweet: Tweet = read_json(&path)?;
            let formatted = format_tweet_text(Some(&tweet)).unwrap_or_default();
            if json {
                println!("{}", serde_json::to_string_pretty(&formatted)?);
            } else {
                let rich = linkify_urls(Some(&formatted), None, !keep_photo, 0);
                print!("{}", render_rich(&rich));
                if !keep_photo {
                    if let Some(photo) = formatted.last_photo_entity() {
                        println!("[photo] {}", photo.url);
                    }
                }
            }
        }
        Command::Page {
            path,
            page_size,
            capacity,
            refresh_policy,
            max_pages,
        } => {
            let mut config = load_config(args.config.as_deref())?;
            if let Some(page_size) = page_size {
                config.page_size = page_size;
            }
            if let Some(capacity) = capacity {
                config.capacity = capacity;
            }
            if let Some(policy) = refresh_policy {
                config.refresh_policy = policy;
            }

            let tweets: Vec<Tweet> = read_json(&path)?;
            tracing::info!(items = tweets.len(), ?config, "paging timeline");
            for line in page_through(tweets, config, max_pages).await? {
                println!("{line}");
            }
        }
    }

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn load_config(path: Option<&Path>) -> Result<DelegateConfig> {
    match path {
        Some(path) => DelegateConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(DelegateConfig::default()),
    }
}

/// Refresh, then keep asking for more at the last row until the timeline
/// ends, capacity is hit or `max_pages` pages have loaded. One line per item.
async fn page_through(
    tweets: Vec<Tweet>,
    config: DelegateConfig,
    max_pages: usize,
) -> Result<Vec<String>> {
    let source = MemoryTimeline::new(tweets).with_page_size(config.page_size);
    let mut delegate = TimelineDelegate::builder()
        .timeline(source)
        .config(config)
        .build()?;

    delegate.refresh(None);
    delegate.settle().await;
    let mut pages = 1;
    while pages < max_pages {
        let last = delegate.get_count().saturating_sub(1);
        if !delegate.request_more_if_needed(last) {
            break;
        }
        delegate.settle().await;
        pages += 1;
    }
    tracing::info!(
        pages,
        items = delegate.get_count(),
        previous_edge = %delegate.state().previous_edge(),
        "paging done"
    );

    Ok(delegate
        .items()
        .iter()
        .map(|tweet| {
            let formatted = format_tweet_text(Some(tweet)).unwrap_or_default();
            let rich = linkify_urls(Some(&formatted), None, true, 0);
            format!("{}\t{}", tweet.id, rich.text.replace('\n', " "))
        })
        .collect())
}

#[derive(Serialize)]
struct SpanView<'a> {
    start: i64,
    end: i64,
    url: &'a str,
    text: String,
}

fn span_views(rich: &RichText) -> Vec<SpanView<'_>> {
    rich.spans
        .iter()
        .map(|span| SpanView {
            start: span.start.get(),
            end: span.end.get(),
            url: &span.url,
            text: rich.slice(span.start, span.end).unwrap_or_default(),
        })
        .collect()
}

fn render_rich(rich: &RichText) -> String {
    let mut out = format!("{}\n", rich.text);
    for span in span_views(rich) {
        out.push_str(&format!("  [{}..{}) {} -> {}\n", span.start, span.end, span.text, span.url));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TWEET_JSON: &str = r#"{
        "id": 7,
        "text": "&lt;3 see http://t.co/abc pic http://t.co/pic",
        "entities": {
            "urls": [{"url": "http://t.co/abc", "display_url": "example.com", "indices": [10, 25]}],
            "media": [{"url": "http://t.co/pic", "display_url": "pic.twitter.com/x",
                       "indices": [30, 45], "type": "photo", "id": 1}]
        }
    }"#;

    #[test]
    fn test_read_json_tweet() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TWEET_JSON.as_bytes()).unwrap();
        let tweet: Tweet = read_json(file.path()).unwrap();
        assert_eq!(tweet.id, 7);
    }

    #[test]
    fn test_read_json_reports_path() {
        let err = read_json::<Tweet>(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn test_render_strips_photo() {
        let tweet: Tweet = serde_json::from_str(TWEET_JSON).unwrap();
        let formatted = format_tweet_text(Some(&tweet)).unwrap();
        assert_eq!(formatted.url_entities.len(), 1);
        assert_eq!(formatted.media_entities.len(), 1);
        let rich = linkify_urls(Some(&formatted), None, true, 0);
        assert_eq!(rich.text, "<3 see example.com pic");
        let out = render_rich(&rich);
        assert!(out.contains("[7..18) example.com -> http://t.co/abc"));
    }

    #[test]
    fn test_load_config_default_and_file() {
        assert_eq!(load_config(None).unwrap(), DelegateConfig::default());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "(refresh_policy: Ungated)").unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.refresh_policy, RefreshPolicy::Ungated);
    }

    #[tokio::test]
    async fn test_page_through_respects_max_pages() {
        let tweets: Vec<Tweet> = (1..=50)
            .map(|id| Tweet::builder().id(id).text(format!("n&amp;{id}")).build())
            .collect();
        let config = DelegateConfig::default().with_page_size(10);
        let lines = page_through(tweets, config, 3).await.unwrap();
        assert_eq!(lines.len(), 30);
        assert_eq!(lines[0], "50\tn&50");
        assert_eq!(lines[29], "21\tn&21");
    }

    #[tokio::test]
    async fn test_page_through_empty() {
        let lines = page_through(Vec::new(), DelegateConfig::default(), usize::MAX).await.unwrap();
        assert!(lines.is_empty());
    }
}
