//! CLI module - Command-line interface definitions and handlers

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::error::FlowError;
use crate::core::model::{FlowIssue, ResultItem, ResultSet};
use crate::core::render::{OutputFormat, RenderConfig, Renderer};
use crate::export::{export, ExportFormat, ExportOptions};
use crate::loader::load_path;
use crate::network::{ChannelId, Network, OrderReport, SiteId, SiteKind};

const EXPORT_FORMATS: [&str; 6] = ["tex", "html", "dot", "mermaid", "table", "definition"];

/// flow - build, order and render information flow networks.
#[derive(Parser, Debug)]
#[command(name = "flow")]
#[command(
    author,
    version,
    about,
    long_about = r#"flow loads a network of sites (information sources) and channels
(transformations between them), computes the level at which each channel can
be evaluated, and reports or renders the result.

Networks are read from .json definitions or from the line-oriented description
language (any other extension):

    name ingestion
    group inputs = raw, meta
    raw, meta -> clean : normalize
    clean -> report

Query commands print a ResultSet in the selected format (default: jsonl).

Output formats:
- jsonl: one JSON object per line (best for piping into tools)
- json: a single JSON array
- md: human-friendly Markdown
- raw: labels only (unstable; intended for debugging)

Examples:
    flow order pipeline.flow
    flow check pipeline.flow --strict
    flow render pipeline.flow --to dot --output pipeline.dot
    flow sites pipeline.json --kind group
    flow chain raw clean report --channel-labels normalize,summarize --to table
"#
)]
pub struct Cli {
    /// Output format (jsonl/json/md/raw).
    #[arg(
        long,
        global = true,
        default_value = "jsonl",
        value_name = "FORMAT",
        long_help = "Select the output format for ResultSet.\n\n\
Supported values:\n\
- jsonl (default)\n\
- json\n\
- md (markdown)\n\
- raw\n\n\
Has no effect on `render`, which writes the document format chosen with --to."
    )]
    pub format: String,

    /// Disable colored output (when applicable).
    #[arg(
        long,
        global = true,
        long_help = "Disable colored output. This is useful when piping to files or when your\n\
terminal does not support ANSI colors. Only the table renderer uses color."
    )]
    pub no_color: bool,

    /// Quiet mode (errors only on stderr).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Only log errors to stderr. Results are still printed to stdout.\n\n\
RUST_LOG, when set, takes precedence."
    )]
    pub quiet: bool,

    /// Verbose mode (debug logs on stderr).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Log debug diagnostics to stderr, such as every site and channel as it\n\
is created and the number of ordering passes.\n\n\
RUST_LOG, when set, takes precedence."
    )]
    pub verbose: bool,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(
        long,
        global = true,
        long_help = "Pretty-print JSON and JSONL output with indentation for human readability.\n\n\
Has no effect on md/raw formats."
    )]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the evaluation order of a network.
    #[command(
        long_about = "Load FILE, compute levels for every site and channel, and emit a network\n\
summary followed by site and channel items sorted by level.\n\n\
Orphaned sites, unreachable channels and a failure to converge are reported as\n\
warning items.\n\n\
Examples:\n\
  flow order pipeline.flow\n\
  flow --format md order pipeline.json\n"
    )]
    Order {
        /// Network file (.json definition or description language).
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Report structural problems of a network.
    #[command(
        long_about = "Load FILE, compute its order and emit only the warning items:\n\
ORPHANED_SITE, UNREACHABLE_CHANNEL and ORDER_NOT_CONVERGED.\n\n\
Examples:\n\
  flow check pipeline.flow\n\
  flow check pipeline.flow --strict\n"
    )]
    Check {
        /// Network file (.json definition or description language).
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Exit non-zero when any warning is found.
        #[arg(
            long,
            long_help = "Exit with a non-zero status when any warning is found. Useful in CI."
        )]
        strict: bool,
    },

    /// Render a network as a document.
    #[command(
        long_about = "Load FILE, compute its order and render it.\n\n\
Formats:\n\
- tex: one TikZ picture per channel\n\
- html: one row per channel with an SVG arrow (--standalone for a full page)\n\
- dot: Graphviz digraph\n\
- mermaid: Mermaid flowchart\n\
- table: box table of levels, channels, sources and targets\n\
- definition: JSON definition that loads back into the same network\n\n\
Examples:\n\
  flow render pipeline.flow --to table\n\
  flow render pipeline.flow --to html --standalone --output pipeline.html\n"
    )]
    Render {
        /// Network file (.json definition or description language).
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Document format.
        #[arg(long, value_name = "FMT", value_parser = EXPORT_FORMATS)]
        to: String,

        /// Write the document to PATH instead of stdout.
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Wrap HTML output in a complete document.
        #[arg(long)]
        standalone: bool,
    },

    /// List sites, optionally filtered.
    #[command(
        long_about = "Load FILE, compute its order and emit one item per matching site.\n\n\
Examples:\n\
  flow sites pipeline.flow\n\
  flow sites pipeline.flow --label raw --label meta\n\
  flow sites pipeline.flow --kind group\n"
    )]
    Sites {
        /// Network file (.json definition or description language).
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Keep sites with this label (repeatable).
        #[arg(long, value_name = "LABEL")]
        label: Vec<String>,

        /// Keep sites of this kind.
        #[arg(long, value_parser = ["single", "group"], value_name = "KIND")]
        kind: Option<String>,
    },

    /// List channels, optionally filtered.
    #[command(
        long_about = "Load FILE, compute its order and emit one item per matching channel, in\n\
evaluation order. --source and --target accept site ids or labels; a channel\n\
matches when it reads from (writes to) any of them.\n\n\
Examples:\n\
  flow channels pipeline.flow --source raw\n\
  flow channels pipeline.flow --label normalize\n"
    )]
    Channels {
        /// Network file (.json definition or description language).
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Keep channels with this label (repeatable).
        #[arg(long, value_name = "LABEL")]
        label: Vec<String>,

        /// Keep channels reading from this site (repeatable).
        #[arg(long, value_name = "SITE")]
        source: Vec<String>,

        /// Keep channels writing to this site (repeatable).
        #[arg(long, value_name = "SITE")]
        target: Vec<String>,
    },

    /// Build a linear chain network and render it.
    #[command(
        long_about = "Build a network `a -> b -> c ...` from the given site labels and render it.\n\n\
Channel labels are taken in order from --channel-labels; channels beyond the\n\
list keep their generated id.\n\n\
Examples:\n\
  flow chain raw clean report\n\
  flow chain raw clean report --channel-labels normalize --to tex\n"
    )]
    Chain {
        /// Site labels, in flow order.
        #[arg(value_name = "LABEL", num_args = 1.., required = true)]
        labels: Vec<String>,

        /// Comma-separated channel labels.
        #[arg(long, value_delimiter = ',', value_name = "LABELS")]
        channel_labels: Vec<String>,

        /// Network name.
        #[arg(long, value_name = "NAME")]
        name: Option<String>,

        /// Document format.
        #[arg(long, value_name = "FMT", default_value = "definition", value_parser = EXPORT_FORMATS)]
        to: String,

        /// Write the document to PATH instead of stdout.
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    // Parse output format
    let format: OutputFormat = cli.format.parse().map_err(anyhow::Error::msg)?;
    let render_config = RenderConfig::with_pretty(format, cli.pretty);

    if cli.no_color {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Order { file } => run_order(&file, render_config),

        Commands::Check { file, strict } => run_check(&file, strict, render_config),

        Commands::Render {
            file,
            to,
            output,
            standalone,
        } => {
            let mut network = load(&file, render_config)?;
            network.compute_order();
            write_document(&network, &to, output.as_deref(), standalone, cli.no_color)
        }

        Commands::Sites { file, label, kind } => {
            run_sites(&file, &label, kind.as_deref(), render_config)
        }

        Commands::Channels {
            file,
            label,
            source,
            target,
        } => run_channels(&file, &label, &source, &target, render_config),

        Commands::Chain {
            labels,
            channel_labels,
            name,
            to,
            output,
        } => {
            let mut network = Network::chain(labels.as_slice(), channel_labels.as_slice())
                .map_err(|err| report_failure(err, render_config))?;
            network.set_name(name);
            network.compute_order();
            write_document(&network, &to, output.as_deref(), false, cli.no_color)
        }
    }
}

fn load(file: &Path, config: RenderConfig) -> Result<Network> {
    load_path(file)
        .map_err(|err| report_failure(err, config))
        .with_context(|| format!("failed to load network from {}", file.display()))
}

/// Print `err` as an error item on stdout and hand it back for the exit status.
fn report_failure(err: FlowError, config: RenderConfig) -> anyhow::Error {
    let mut result_set = ResultSet::new();
    result_set.push(ResultItem::error(FlowIssue::new(err.code(), err.to_string())));
    print_results(&result_set, config);
    anyhow::Error::from(err)
}

fn print_results(result_set: &ResultSet, config: RenderConfig) {
    let renderer = Renderer::with_config(config);
    println!("{}", renderer.render(result_set));
}

// ==================== Result items ====================

fn site_item(network: &Network, sid: SiteId) -> ResultItem {
    let site = network.site_ref(sid);
    let members: Vec<&str> = site
        .member_ids()
        .map(|m| network.site_ref(m).display_label())
        .collect();
    let producer = site.producer().map(|cid| network.channel_ref(cid).id());

    ResultItem::site(site.id(), site.display_label(), site.level()).with_data(json!({
        "kind": site.kind(),
        "producer": producer,
        "members": members,
    }))
}

fn channel_item(network: &Network, cid: ChannelId) -> ResultItem {
    let ch = network.channel_ref(cid);
    let labels = |sids: &[SiteId]| -> Vec<String> {
        sids.iter()
            .map(|sid| network.site_ref(*sid).display_label().to_string())
            .collect()
    };

    ResultItem::channel(ch.id(), ch.label(), ch.level()).with_data(json!({
        "sources": labels(ch.sources()),
        "targets": labels(ch.targets()),
    }))
}

fn network_item(network: &Network, report: &OrderReport) -> ResultItem {
    ResultItem::network(network.name().map(str::to_string)).with_data(json!({
        "spec": network.spec(),
        "version": network.version(),
        "sites": network.site_count(),
        "channels": network.channel_count(),
        "converged": report.converged,
        "iterations": report.iterations,
    }))
}

/// Convert an order report into warning items
fn warning_items(network: &Network, report: &OrderReport) -> Vec<ResultItem> {
    let mut items = Vec::new();

    if !report.converged {
        items.push(ResultItem::warning(FlowIssue::new(
            "ORDER_NOT_CONVERGED",
            format!(
                "Network order did not settle after {} passes",
                report.iterations
            ),
        )));
    }

    for sid in &report.orphaned_sites {
        let site = network.site_ref(*sid);
        items.push(
            ResultItem::warning(FlowIssue::new(
                "ORPHANED_SITE",
                format!(
                    "Site '{}' is neither produced nor read by any channel",
                    site.display_label()
                ),
            ))
            .with_id(site.id()),
        );
    }

    for cid in &report.unreachable_channels {
        items.push(
            ResultItem::warning(FlowIssue::new(
                "UNREACHABLE_CHANNEL",
                format!(
                    "Channel {} never becomes computable",
                    network.channel_debug(*cid)
                ),
            ))
            .with_id(network.channel_ref(*cid).id()),
        );
    }

    items
}

// ==================== Commands ====================

fn run_order(file: &Path, config: RenderConfig) -> Result<()> {
    let mut network = load(file, config)?;
    let report = network.compute_order();

    let mut result_set = ResultSet::new();
    result_set.push(network_item(&network, &report));
    result_set.extend(network.sites_iter().map(|(sid, _)| site_item(&network, sid)));
    result_set.extend(network.channels_iter().map(|(cid, _)| channel_item(&network, cid)));
    result_set.extend(warning_items(&network, &report));
    result_set.sort();

    print_results(&result_set, config);
    Ok(())
}

fn run_check(file: &Path, strict: bool, config: RenderConfig) -> Result<()> {
    let mut network = load(file, config)?;
    let report = network.compute_order();

    let result_set: ResultSet = warning_items(&network, &report).into_iter().collect();
    print_results(&result_set, config);

    let problems = result_set.problems().count();
    if strict && problems > 0 {
        bail!("{} warning(s) found in {}", problems, file.display());
    }
    Ok(())
}

fn run_sites(
    file: &Path,
    labels: &[String],
    kind: Option<&str>,
    config: RenderConfig,
) -> Result<()> {
    let mut network = load(file, config)?;
    network.compute_order();

    let mut query = network.sites();
    if !labels.is_empty() {
        query = query.label(labels);
    }
    if let Some(kind) = kind {
        let kind: SiteKind = kind.parse().map_err(anyhow::Error::msg)?;
        query = query.kind(kind);
    }

    let result_set: ResultSet = query.iter().map(|sid| site_item(&network, sid)).collect();
    print_results(&result_set, config);
    Ok(())
}

fn run_channels(
    file: &Path,
    labels: &[String],
    sources: &[String],
    targets: &[String],
    config: RenderConfig,
) -> Result<()> {
    let mut network = load(file, config)?;
    network.compute_order();

    let resolve = |keys: &[String]| -> Result<Vec<SiteId>> {
        keys.iter()
            .map(|key| network.site(key).map_err(|err| report_failure(err, config)))
            .collect()
    };
    let sources = resolve(sources)?;
    let targets = resolve(targets)?;

    let mut query = network.channels();
    if !labels.is_empty() {
        query = query.label(labels);
    }
    if !sources.is_empty() {
        query = query.source(&sources);
    }
    if !targets.is_empty() {
        query = query.target(&targets);
    }

    let result_set: ResultSet = query
        .iter()
        .map(|cid| channel_item(&network, cid))
        .collect();
    print_results(&result_set, config);
    Ok(())
}

fn write_document(
    network: &Network,
    to: &str,
    output: Option<&Path>,
    standalone: bool,
    no_color: bool,
) -> Result<()> {
    let format: ExportFormat = to.parse().map_err(anyhow::Error::msg)?;
    let options = ExportOptions {
        standalone,
        color: !no_color && output.is_none() && std::io::stdout().is_terminal(),
    };

    let mut document = export(network, format, options)?;
    if !document.ends_with('\n') {
        document.push('\n');
    }

    match output {
        Some(path) => {
            fs::write(path, &document)
                .with_context(|| format!("failed to write {}", path.display()))?;
            debug!(path = %path.display(), ?format, "document written");
        }
        None => print!("{}", document),
    }
    Ok(())
}
