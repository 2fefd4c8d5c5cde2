//! Command implementations and argument parsing for the tsurara CLI.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use thiserror::Error;
use tracing::{Span, field, info, instrument};
use tsurara_core::{
    ClusterGraph, ClusterSelection, ColourMap, CondensedTree, ExcessOfMass, LayoutConfig,
    LayoutError, LayoutResult, PlotError, PlotOptions, SelectionError, TreeError, compute_layout,
    plot, select_with,
};

use super::display_list::{DisplayItem, DisplayListBackend};

const DEFAULT_LEAF_SEPARATION: f64 = 1.0;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "tsurara",
    about = "Lay out and select clusters from HDBSCAN condensed trees."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Print the icicle layout as JSON.
    Layout(LayoutArgs),
    /// Print the clusters chosen by excess-of-mass selection.
    Select(SelectArgs),
    /// Re-export the tree as a CSV table or a JSON graph.
    Export(ExportArgs),
    /// Print the icicle plot as a JSON-lines display list.
    Plot(PlotArgs),
}

/// Layout parameters shared by `layout` and `plot`.
#[derive(Debug, Args, Clone)]
pub struct LayoutArgs {
    /// Condensed tree CSV with header `parent,child,lambda,child_size`.
    pub path: PathBuf,

    /// Horizontal spacing between adjacent leaves.
    #[arg(long = "leaf-separation", default_value_t = DEFAULT_LEAF_SEPARATION)]
    pub leaf_separation: f64,

    /// Use the natural log of point counts for widths.
    #[arg(long = "log-size")]
    pub log_size: bool,
}

impl LayoutArgs {
    fn config(&self) -> LayoutConfig {
        LayoutConfig::new()
            .with_leaf_separation(self.leaf_separation)
            .with_log_size(self.log_size)
    }
}

/// Options accepted by the `select` command.
#[derive(Debug, Args, Clone)]
pub struct SelectArgs {
    /// Condensed tree CSV with header `parent,child,lambda,child_size`.
    pub path: PathBuf,
}

/// Export encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// One CSV row per record.
    Table,
    /// JSON object with weighted edges and node sizes.
    Graph,
}

/// Options accepted by the `export` command.
#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    /// Condensed tree CSV with header `parent,child,lambda,child_size`.
    pub path: PathBuf,

    /// Output encoding.
    #[arg(long, value_enum, default_value_t = ExportFormat::Table)]
    pub format: ExportFormat,
}

/// Options accepted by the `plot` command.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// Layout parameters.
    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Outline the clusters chosen by excess-of-mass selection.
    #[arg(long = "select-clusters")]
    pub select_clusters: bool,

    /// Colour scale for bars, or `none` for solid black.
    #[arg(long = "colour-map", default_value_t = ColourMap::default())]
    pub colour_map: ColourMap,

    /// Omit the colour legend.
    #[arg(long = "no-colour-bar")]
    pub no_colour_bar: bool,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The input file could not be opened.
    #[error("failed to open `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The condensed tree was malformed.
    #[error(transparent)]
    Tree(#[from] TreeError),
    /// Layout configuration was rejected.
    #[error(transparent)]
    Layout(#[from] LayoutError),
    /// Cluster selection failed.
    #[error(transparent)]
    Selection(#[from] SelectionError),
    /// Plotting failed.
    #[error(transparent)]
    Plot(#[from] PlotError),
    /// JSON encoding failed.
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Writing the output failed.
    #[error("failed to write output: {0}")]
    Output(#[source] io::Error),
}

impl CliError {
    /// Returns the stable code of the underlying library error, if any.
    #[must_use]
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Tree(err) => Some(err.code().as_str()),
            Self::Layout(err) => Some(err.code().as_str()),
            Self::Selection(err) => Some(err.code().as_str()),
            Self::Plot(err) => Some(err.code().as_str()),
            Self::Io { .. } | Self::Json(_) | Self::Output(_) => None,
        }
    }
}

/// Result of a command, ready to be rendered.
#[derive(Debug, Clone)]
pub enum CommandOutput {
    /// Icicle layout.
    Layout(LayoutResult),
    /// Selected clusters.
    Selection(ClusterSelection),
    /// Validated tree for tabular export.
    Table(CondensedTree),
    /// Graph export.
    Graph(ClusterGraph),
    /// Plot display list.
    DisplayList(Vec<DisplayItem>),
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when the input cannot be read or a stage fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use tsurara_cli::cli::{Cli, Command, CommandOutput, SelectArgs, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(
///     file.path(),
///     "parent,child,lambda,child_size\n0,1,0.5,2\n0,2,0.5,2\n1,3,1,1\n1,4,1,1\n2,5,2,1\n2,6,2,1\n",
/// )?;
/// let cli = Cli {
///     command: Command::Select(SelectArgs {
///         path: file.path().to_path_buf(),
///     }),
/// };
/// let CommandOutput::Selection(selection) = run_cli(cli)? else {
///     unreachable!("select returns a selection");
/// };
/// assert_eq!(selection.len(), 2);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<CommandOutput, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Layout(args) => {
            span.record("command", "layout");
            run_layout(&args)
        }
        Command::Select(args) => {
            span.record("command", "select");
            run_select(&args)
        }
        Command::Export(args) => {
            span.record("command", "export");
            run_export(&args)
        }
        Command::Plot(args) => {
            span.record("command", "plot");
            run_plot(&args)
        }
    }
}

pub(super) fn run_layout(args: &LayoutArgs) -> Result<CommandOutput, CliError> {
    let tree = load_tree(&args.path)?;
    let layout = compute_layout(&tree, &args.config())?;
    Ok(CommandOutput::Layout(layout))
}

pub(super) fn run_select(args: &SelectArgs) -> Result<CommandOutput, CliError> {
    let tree = load_tree(&args.path)?;
    let selection = select_with(&tree, &ExcessOfMass)?;
    info!(selected = selection.len(), "selection completed");
    Ok(CommandOutput::Selection(selection))
}

pub(super) fn run_export(args: &ExportArgs) -> Result<CommandOutput, CliError> {
    let tree = load_tree(&args.path)?;
    Ok(match args.format {
        ExportFormat::Table => CommandOutput::Table(tree),
        ExportFormat::Graph => CommandOutput::Graph(ClusterGraph::from_tree(&tree)),
    })
}

#[instrument(
    name = "cli.plot",
    err,
    skip(args),
    fields(select_clusters = args.select_clusters, items = field::Empty),
)]
pub(super) fn run_plot(args: &PlotArgs) -> Result<CommandOutput, CliError> {
    let tree = load_tree(&args.layout.path)?;
    let options = PlotOptions {
        layout: args.layout.config(),
        colour_map: args.colour_map.clone(),
        select_clusters: args.select_clusters,
        colour_bar: !args.no_colour_bar,
    };
    let mut backend = DisplayListBackend::default();
    plot(&tree, &ExcessOfMass, Some(&mut backend), &options)?;
    let items = backend.into_items();
    Span::current().record("items", items.len());
    Ok(CommandOutput::DisplayList(items))
}

#[instrument(name = "cli.load_tree", err, fields(path = %path.display(), records = field::Empty))]
pub(super) fn load_tree(path: &Path) -> Result<CondensedTree, CliError> {
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let tree = CondensedTree::read_csv(BufReader::new(file))?;
    Span::current().record("records", tree.records().len());
    Ok(tree)
}

/// Writes `output` to `writer`: JSON for layouts and graphs, CSV for tables,
/// JSON lines for display lists, and plain text for selections.
///
/// # Errors
/// Returns [`CliError`] when encoding or writing fails.
///
/// # Examples
/// ```
/// # use tsurara_cli::cli::{CommandOutput, render_output};
/// # use tsurara_core::LayoutResult;
/// let mut buffer = Vec::new();
/// render_output(&CommandOutput::Layout(LayoutResult::default()), &mut buffer)?;
/// assert!(String::from_utf8_lossy(&buffer).contains("\"bars\":[]"));
/// # Ok::<(), tsurara_cli::cli::CliError>(())
/// ```
pub fn render_output(output: &CommandOutput, mut writer: impl Write) -> Result<(), CliError> {
    match output {
        CommandOutput::Layout(layout) => write_json_line(&mut writer, layout),
        CommandOutput::Graph(graph) => write_json_line(&mut writer, graph),
        CommandOutput::Table(tree) => Ok(tree.write_csv(writer)?),
        CommandOutput::DisplayList(items) => items
            .iter()
            .try_for_each(|item| write_json_line(&mut writer, item)),
        CommandOutput::Selection(selection) => {
            render_selection(selection, &mut writer).map_err(CliError::Output)
        }
    }
}

fn write_json_line(writer: &mut impl Write, value: &impl serde::Serialize) -> Result<(), CliError> {
    serde_json::to_writer(&mut *writer, value)?;
    writeln!(writer).map_err(CliError::Output)
}

fn render_selection(selection: &ClusterSelection, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer, "selected: {}", selection.len())?;
    for cluster in selection.selected() {
        let stability = selection
            .stability()
            .get(cluster)
            .copied()
            .unwrap_or_default();
        writeln!(writer, "{cluster}\t{stability}")?;
    }
    Ok(())
}
