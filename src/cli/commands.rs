use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::runtime::Runtime;
use tracing::debug;

use crate::api::{ContentResolver, GatewayResolver, HubClient, MessageQuery, MessageSource};
use crate::config::{Config, ConfigOverrides};
use crate::diff::render_plain;
use crate::error::TimelineError;
use crate::filters::{apply_filters, parse_filter};
use crate::inspect::{DrilldownKind, DrilldownView, open_drilldown};
use crate::logging::{LogTarget, init_logging};
use crate::models::EventRecord;
use crate::pager::{TimelineController, parse_date_cutoff};
use crate::tui::{BrowseSettings, END_OF_TIMELINE, Services, format_full, run_browser};
use crate::utils::{single_line, strip_ansi_codes, tui_log_path};

#[derive(Parser)]
#[command(name = "snapshot-timeline")]
#[command(version)]
#[command(about = "Browse the governance timeline of a Snapshot space", long_about = None)]
pub struct Cli {
    /// JSON config file (default: {config_dir}/snapshot-timeline/config.json)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// GraphQL endpoint of the hub
    #[arg(long, global = true, value_name = "URL")]
    pub hub_url: Option<String>,

    /// Content gateway base URL
    #[arg(long, global = true, value_name = "URL")]
    pub gateway_url: Option<String>,

    /// Records per page
    #[arg(long, global = true, value_name = "N")]
    pub page_size: Option<usize>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the most recent events of a space
    Timeline {
        space: String,
        /// Only events strictly before this day (YYYY-MM-DD) or epoch second
        #[arg(long)]
        before: Option<String>,
        /// Filter expression, e.g. "kind:settings kind:update"
        #[arg(long)]
        filter: Option<String>,
        /// Number of pages to fetch
        #[arg(long, default_value_t = 1)]
        pages: usize,
        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fetch a document from the content gateway
    Content {
        content_ref: String,
        /// Print only the JSON document
        #[arg(long)]
        json: bool,
    },
    /// Show one message's content and, where available, its diff
    Inspect {
        space: String,
        message_id: String,
        /// Print the delta in its JSON encoding instead of the rendered diff
        #[arg(long)]
        json: bool,
    },
    /// Open the interactive browser
    Browse { space: Option<String> },
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            hub_url: self.hub_url.clone(),
            gateway_url: self.gateway_url.clone(),
            page_size: self.page_size,
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let Some(command) = &cli.command else {
        println!("Use --help for usage information");
        return Ok(());
    };

    match command {
        Commands::Browse { .. } => {
            let log_path = tui_log_path()?;
            init_logging(&LogTarget::File(log_path), "info")?;
        }
        _ => init_logging(&LogTarget::Stderr, "warn")?,
    }

    let config = Config::load(cli.config.as_deref(), &cli.overrides())?;
    let runtime = Runtime::new().context("Failed to start async runtime")?;

    match command {
        Commands::Timeline { space, before, filter, pages, json } => {
            let source = HubClient::new(&config.hub_url, config.request_timeout())?;
            let cutoff = parse_date_cutoff(before.as_deref().unwrap_or(""))?;
            let output = runtime.block_on(timeline(
                &source,
                space,
                cutoff,
                filter.as_deref().unwrap_or(""),
                *pages,
                config.page_size,
                *json,
            ))?;
            println!("{}", output);
        }
        Commands::Content { content_ref, json } => {
            let resolver = GatewayResolver::new(&config.gateway_url, config.request_timeout())?;
            let output = runtime.block_on(content(&resolver, content_ref, *json))?;
            println!("{}", output);
        }
        Commands::Inspect { space, message_id, json } => {
            let source = HubClient::new(&config.hub_url, config.request_timeout())?;
            let resolver = GatewayResolver::new(&config.gateway_url, config.request_timeout())?;
            let output = runtime.block_on(inspect(&source, &resolver, space, message_id, *json))?;
            println!("{}", output);
        }
        Commands::Browse { space } => {
            let services = Services {
                source: Arc::new(HubClient::new(&config.hub_url, config.request_timeout())?),
                resolver: Arc::new(GatewayResolver::new(&config.gateway_url, config.request_timeout())?),
            };
            let settings =
                BrowseSettings { page_size: config.page_size, scroll_threshold: config.scroll_threshold };
            let namespace = space.clone().unwrap_or_else(|| config.default_space.clone());
            run_browser(services, runtime.handle().clone(), settings, namespace)?;
        }
    }

    Ok(())
}

/// Load up to `pages` pages and format the (filtered) result
pub async fn timeline(
    source: &dyn MessageSource,
    space: &str,
    cutoff: Option<i64>,
    filter: &str,
    pages: usize,
    page_size: usize,
    json: bool,
) -> Result<String> {
    let expr = parse_filter(filter)?;
    let mut controller = TimelineController::new(space, cutoff);

    for page in 0..pages.max(1) {
        let fetched = controller
            .load_next(source, page_size)
            .await
            .with_context(|| format!("Failed to load page {} of {}", page + 1, space))?;
        debug!(page, fetched = fetched.len(), "page loaded");
        if controller.is_exhausted() {
            break;
        }
    }

    let shown = apply_filters(controller.records(), &expr);

    if json {
        return serde_json::to_string_pretty(&shown).context("Failed to serialize records");
    }

    let total = controller.records().len();
    let mut lines = Vec::with_capacity(shown.len() + 2);
    lines.push(if shown.len() == total {
        format!("Timeline for {} ({} events)", single_line(space), total)
    } else {
        format!("Timeline for {} ({} of {} events)", single_line(space), shown.len(), total)
    });
    lines.extend(shown.iter().map(|record| format_record(record)));

    if controller.is_exhausted() {
        lines.push(if total == 0 {
            format!("No events found for {}", single_line(space))
        } else {
            END_OF_TIMELINE.to_string()
        });
    } else if let Some(ts) = controller.cursor().last_seen_timestamp {
        lines.push(format!("More events available: --before {}", ts));
    }

    Ok(lines.join("\n"))
}

fn format_record(record: &EventRecord) -> String {
    format!(
        "{}  {:<17} {}  {}",
        format_full(&record.datetime()),
        record.kind.label(),
        single_line(&record.id),
        single_line(&record.content_ref)
    )
}

/// Resolve one content reference
pub async fn content(resolver: &dyn ContentResolver, content_ref: &str, json: bool) -> Result<String> {
    let document = resolver.resolve(content_ref).await?;
    let pretty = serde_json::to_string_pretty(&document).context("Failed to format document")?;
    if json {
        Ok(strip_ansi_codes(&pretty))
    } else {
        Ok(format!("{}\n{}", resolver.content_url(content_ref.trim()), strip_ansi_codes(&pretty)))
    }
}

/// Content view plus the diff view when the message kind has one
pub async fn inspect(
    source: &dyn MessageSource,
    resolver: &dyn ContentResolver,
    space: &str,
    message_id: &str,
    json: bool,
) -> Result<String> {
    let record = source
        .fetch_messages(&MessageQuery::by_id(space, message_id))
        .await?
        .into_iter()
        .find(|r| r.id == message_id)
        .ok_or_else(|| TimelineError::NotFound(format!("No message {} in {}", message_id, space)))?;

    let mut sections = vec![format_record(&record)];

    if !json {
        let view = open_drilldown(DrilldownKind::Content, source, resolver, space, &record).await?;
        sections.push(render_plain(&view.lines()));
    }

    if record.kind.has_diff() {
        let view = open_drilldown(DrilldownKind::Diff, source, resolver, space, &record)
            .await
            .with_context(|| format!("Failed to compare {}", record.kind.label()))?;
        sections.push(if json { view.clipboard_text() } else { render_view(&view) });
    }

    Ok(strip_ansi_codes(&sections.join("\n\n")))
}

fn render_view(view: &DrilldownView) -> String {
    format!("{}\n{}", view.title(), render_plain(&view.lines()))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::{Value, json};

    use super::*;
    use crate::models::EventKind;

    fn record(id: &str, kind: EventKind, timestamp: i64) -> EventRecord {
        EventRecord {
            id: id.to_string(),
            sequence_index: 0,
            kind,
            content_ref: format!("bafy-{}", id),
            timestamp,
        }
    }

    struct Pages {
        records: Vec<EventRecord>,
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl MessageSource for Pages {
        async fn fetch_messages(&self, query: &MessageQuery) -> crate::error::Result<Vec<EventRecord>> {
            *self.calls.lock().unwrap() += 1;
            Ok(self
                .records
                .iter()
                .filter(|r| query.timestamp_lt.is_none_or(|ts| r.timestamp < ts))
                .filter(|r| query.kinds.contains(&r.kind))
                .filter(|r| query.id.as_ref().is_none_or(|id| &r.id == id))
                .take(query.first)
                .cloned()
                .collect())
        }
    }

    struct Docs;

    #[async_trait]
    impl ContentResolver for Docs {
        async fn resolve(&self, content_ref: &str) -> crate::error::Result<Value> {
            match content_ref {
                "bafy-0xs2" => Ok(json!({"data": {"message": {"settings": "{\"name\":\"Alpha\",\"private\":false}"}}})),
                "bafy-0xs1" => Ok(json!({"data": {"message": {"settings": "{\"name\":\"alpha\"}"}}})),
                other => Err(TimelineError::content(other, "HTTP 404")),
            }
        }

        fn content_url(&self, content_ref: &str) -> String {
            format!("https://gw.test/ipfs/{}", content_ref)
        }
    }

    fn source(count: i64) -> Pages {
        let records = (0..count).map(|i| record(&format!("0x{:02}", i), EventKind::Proposal, 1000 - i)).collect();
        Pages { records, calls: Mutex::new(0) }
    }

    #[tokio::test]
    async fn test_timeline_stops_at_exhaustion() {
        let source = source(14);
        let output = timeline(&source, "alpha.eth", None, "", 5, 10, false).await.unwrap();

        assert!(output.starts_with("Timeline for alpha.eth (14 events)"));
        assert!(output.ends_with(END_OF_TIMELINE));
        assert_eq!(*source.calls.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_timeline_reports_more_available() {
        let source = source(14);
        let output = timeline(&source, "alpha.eth", None, "", 1, 10, false).await.unwrap();
        assert!(output.ends_with("More events available: --before 991"));
    }

    #[tokio::test]
    async fn test_timeline_empty_space() {
        let source = source(0);
        let output = timeline(&source, "empty.eth", None, "", 1, 10, false).await.unwrap();
        assert!(output.contains("No events found for empty.eth"));
    }

    #[tokio::test]
    async fn test_timeline_json_and_filter() {
        let source = source(3);
        let output = timeline(&source, "alpha.eth", None, "id:01", 1, 10, true).await.unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0]["id"], "0x01");
        assert_eq!(parsed[0]["type"], "proposal");
    }

    #[tokio::test]
    async fn test_timeline_filter_matching_nothing_still_ends_timeline() {
        let source = source(3);
        let output = timeline(&source, "alpha.eth", None, "kind:delete", 1, 10, false).await.unwrap();

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines, vec!["Timeline for alpha.eth (0 of 3 events)", END_OF_TIMELINE]);
    }

    #[tokio::test]
    async fn test_timeline_rejects_bad_filter() {
        let source = source(3);
        assert!(timeline(&source, "alpha.eth", None, "kind:vote", 1, 10, false).await.is_err());
        assert_eq!(*source.calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_inspect_settings_diff() {
        let source = Pages {
            records: vec![record("0xs2", EventKind::Settings, 200), record("0xs1", EventKind::Settings, 100)],
            calls: Mutex::new(0),
        };

        let output = inspect(&source, &Docs, "alpha.eth", "0xs2", false).await.unwrap();
        assert!(output.contains("Settings Comparison"));
        assert!(output.contains("~ name (Modified)"));
        assert!(output.contains("+ private (Added)"));

        let json_output = inspect(&source, &Docs, "alpha.eth", "0xs2", true).await.unwrap();
        assert!(json_output.contains("\"private\": [\n    false\n  ]"));
    }

    #[tokio::test]
    async fn test_inspect_unknown_message() {
        let source = source(2);
        let err = inspect(&source, &Docs, "alpha.eth", "0xmissing", false).await.unwrap_err();
        assert!(err.to_string().contains("No message 0xmissing"));
    }

    #[tokio::test]
    async fn test_content_prefixes_url() {
        let output = content(&Docs, "bafy-0xs1", false).await.unwrap();
        assert!(output.starts_with("https://gw.test/ipfs/bafy-0xs1\n{"));

        let err = content(&Docs, "bafy-nope", true).await.unwrap_err();
        assert!(err.to_string().contains("HTTP 404"));
    }
}
