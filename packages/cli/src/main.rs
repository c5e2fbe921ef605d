use std::{
    collections::HashSet,
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use clap::Parser;
use eyre::WrapErr as _;
use futures::StreamExt as _;
use medfeed::{
    FeedCore, SourceErrorKind,
    core::{FeedSource, SourceReport},
    fetch::{HttpFetcher, PAGE_TIMEOUT},
};
use medfeed_societies::sites::*;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, Layer, filter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

use crate::macros::register_sources;

mod macros;

const REPORTS_DIR: &str = "reports";

#[derive(Parser, Debug)]
#[command(
    name = "medfeed",
    about = "Builds RSS feeds from the announcement pages of medical societies.",
    version
)]
struct MedfeedOptions {
    /// The output directory for the generated feeds.
    #[arg(short = 'o', long = "out", default_value = "rss_output")]
    out_dir: PathBuf,

    /// Timeout in seconds for each page load.
    #[arg(short = 't', long = "timeout", default_value_t = PAGE_TIMEOUT.as_secs())]
    timeout: u64,

    /// The maximum number of rows to read from each listing.
    #[arg(short = 'l', long = "limit")]
    rows_limit: Option<usize>,

    /// The sources to include in the run. By default, all sources are included.
    #[arg(short = 'i', long, value_delimiter = ',')]
    include: Vec<String>,
    /// The sources to exclude from the run.
    #[arg(short = 'e', long, value_delimiter = ',')]
    exclude: Vec<String>,
}

/// Which registered sources take part in a run.
#[derive(Debug)]
enum Selection {
    All,
    Include(HashSet<String>),
    Exclude(HashSet<String>),
}

impl Selection {
    fn new(include: Vec<String>, exclude: Vec<String>) -> eyre::Result<Self> {
        match (include.is_empty(), exclude.is_empty()) {
            (true, true) => Ok(Self::All),
            (false, true) => Ok(Self::Include(include.into_iter().collect())),
            (true, false) => Ok(Self::Exclude(exclude.into_iter().collect())),
            (false, false) => {
                eyre::bail!("You cannot use both --include and --exclude options at the same time.")
            }
        }
    }

    fn contains(&self, identifier: &str) -> bool {
        match self {
            Self::All => true,
            Self::Include(ids) => ids.contains(identifier),
            Self::Exclude(ids) => !ids.contains(identifier),
        }
    }
}

type SourceOutcome = (&'static str, eyre::Result<SourceReport>);

/// Contents of `reports/run_summary.json`.
#[derive(Debug, Default, Serialize)]
struct RunSummary {
    succeeded: Vec<SourceReport>,
    failed: Vec<FailedSource>,
}

#[derive(Debug, Serialize)]
struct FailedSource {
    source: &'static str,
    /// `None` when the feed was built but could not be written.
    kind: Option<SourceErrorKind>,
    error: String,
}

impl FailedSource {
    fn new(source: &'static str, err: &eyre::Report) -> Self {
        let kind = match err.downcast_ref::<medfeed::Error>() {
            Some(medfeed::Error::Source(source_err)) => Some(source_err.kind()),
            _ => None,
        };
        Self {
            source,
            kind,
            error: err.to_string(),
        }
    }
}

impl RunSummary {
    fn record(&mut self, (source, result): SourceOutcome) {
        match result {
            Ok(report) => self.succeeded.push(report),
            Err(err) => {
                tracing::error!(source, "{err:?}");
                self.failed.push(FailedSource::new(source, &err));
            }
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> eyre::Result<()> {
    let reports_dir = Path::new(REPORTS_DIR);
    setup_tracing(reports_dir)?;

    color_eyre::install()?;
    let options = MedfeedOptions::parse();
    let selection = Selection::new(options.include, options.exclude)?;

    let core = FeedCore::new(HttpFetcher::new(Duration::from_secs(options.timeout))?);
    let tasks = construct_tasks(&core, &options.out_dir, &selection, options.rows_limit);
    let tasks_len = tasks.len();

    // Sources run one after another.
    let mut outcomes = std::pin::pin!(futures::stream::iter(tasks).then(|task| task));
    let mut summary = RunSummary::default();
    while let Some(outcome) = outcomes.next().await {
        summary.record(outcome);
    }

    save_summary(reports_dir, &summary).await?;

    if summary.failed.is_empty() {
        Ok(())
    } else {
        Err(eyre::eyre!(
            "{} of {} sources failed",
            summary.failed.len(),
            tasks_len
        ))
    }
}

register_sources! {
    Jiaio(JiaioSource) => JiaioSource,
    Jasweb(JaswebSource) => JaswebSource,
    Chemotherapy(ChemotherapySource) => ChemotherapySource,
    JEndo(JEndoSource) => JEndoSource,
    Jsge(JsgeSource) => JsgeSource,
    Jsom(JsomSource) => JsomSource,
    Kekkaku(KekkakuSource) => KekkakuSource,
    Jsccr(JsccrSource) => JsccrSource,
    Jbcs(JbcsSource) => JbcsSource,
}

pub(crate) async fn save_run<T: FeedSource>(
    core: &FeedCore<HttpFetcher>,
    out_dir: &Path,
    source: T,
    rows_limit: Option<usize>,
) -> eyre::Result<SourceReport> {
    let site = core.run(&source, rows_limit).await?;

    // rss only writes to a synchronous writer.
    let buf = site
        .to_rss()?
        .pretty_write_to(BufWriter::new(Vec::new()), b' ', 2)?;
    let rss = String::from_utf8(buf.into_inner()?)?;

    tokio::fs::create_dir_all(out_dir).await?;
    let path = out_dir.join(T::OUTPUT);
    tokio::fs::File::create(&path)
        .await?
        .write_all(rss.as_bytes())
        .await
        .wrap_err_with(|| format!("Failed to write {}", path.display()))?;

    tracing::info!(
        target: "run_report",
        source = T::IDENTIFIER,
        path = %path.display(),
        items = site.items.len(),
        skipped = site.report.skipped(),
        "Feed written"
    );
    Ok(site.report)
}

async fn save_summary(reports_dir: &Path, summary: &RunSummary) -> eyre::Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    tokio::fs::write(reports_dir.join("run_summary.json"), json)
        .await
        .wrap_err("Failed to write the run summary")
}

/// Logs go to stdout, `run_report` events to `run_report.json` and errors to
/// `error_report.json`, both inside `reports_dir`.
fn setup_tracing(reports_dir: &Path) -> eyre::Result<()> {
    std::fs::create_dir_all(reports_dir)?;
    let report_file = |name: &str| {
        File::create(reports_dir.join(name))
            .map(Arc::new)
            .wrap_err_with(|| format!("Failed to create {name}"))
    };

    let stdout_log = fmt::layer().with_filter(
        EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .from_env_lossy(),
    );
    let run_report = fmt::layer()
        .json()
        .with_span_list(false)
        .with_writer(report_file("run_report.json")?)
        .with_filter(filter::filter_fn(|metadata| {
            metadata.target() == "run_report"
        }));
    let error_report = fmt::layer()
        .json()
        .with_writer(report_file("error_report.json")?)
        .with_filter(LevelFilter::ERROR);

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(run_report)
        .with(error_report)
        .try_init()?;
    Ok(())
}
