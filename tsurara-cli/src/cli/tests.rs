//! Unit tests for the CLI commands and output rendering.

use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use rstest::{fixture, rstest};
use tempfile::TempDir;
use tsurara_core::{ColourMap, CondensedTree, CondensedTreeRecord, TreeError, TreeErrorCode};
use tsurara_test_support::{fixtures::two_level_rows, tracing::RecordingLayer};

use super::commands::{load_tree, run_export, run_layout, run_plot, run_select};
use super::{
    Cli, CliError, Command, CommandOutput, DisplayItem, ExportArgs, ExportFormat, LayoutArgs,
    PlotArgs, SelectArgs, render_output, run_cli,
};

type TestResult = Result<(), Box<dyn std::error::Error>>;

struct TreeFile {
    _dir: TempDir,
    path: PathBuf,
}

#[fixture]
fn tree_file() -> TreeFile {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("tree.csv");
    let tree = CondensedTree::from_records(
        two_level_rows()
            .into_iter()
            .map(CondensedTreeRecord::from)
            .collect(),
    )
    .expect("fixture tree");
    let file = std::fs::File::create(&path).expect("create tree csv");
    tree.write_csv(file).expect("write tree csv");
    TreeFile { _dir: dir, path }
}

fn write_file(dir: &TempDir, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.path().join(name);
    std::fs::write(&path, contents)?;
    Ok(path)
}

fn layout_args(path: &Path) -> LayoutArgs {
    LayoutArgs {
        path: path.to_path_buf(),
        leaf_separation: 1.0,
        log_size: false,
    }
}

fn plot_args(path: &Path) -> PlotArgs {
    PlotArgs {
        layout: layout_args(path),
        select_clusters: false,
        colour_map: ColourMap::default(),
        no_colour_bar: false,
    }
}

fn render(output: &CommandOutput) -> Result<String, Box<dyn std::error::Error>> {
    let mut buffer = Vec::new();
    render_output(output, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

#[rstest]
fn layout_renders_json(tree_file: TreeFile) -> TestResult {
    let output = run_layout(&layout_args(&tree_file.path))?;
    let text = render(&output)?;
    let json: serde_json::Value = serde_json::from_str(&text)?;
    assert_eq!(json["scaling"], 100.0);
    assert_eq!(json["lines"].as_array().map(Vec::len), Some(4));
    Ok(())
}

#[rstest]
fn layout_rejects_invalid_separation(tree_file: TreeFile) {
    let args = LayoutArgs {
        leaf_separation: -2.0,
        ..layout_args(&tree_file.path)
    };
    let err = run_layout(&args).expect_err("negative separation must fail");
    assert!(matches!(err, CliError::Layout(_)));
    assert_eq!(err.code(), Some("LAYOUT_INVALID_LEAF_SEPARATION"));
}

#[rstest]
fn select_lists_excess_of_mass_clusters(tree_file: TreeFile) -> TestResult {
    let output = run_select(&SelectArgs {
        path: tree_file.path.clone(),
    })?;
    let text = render(&output)?;
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("selected: 3"));

    let rows: Vec<(u64, f64)> = lines
        .map(|line| {
            let (cluster, stability) = line.split_once('\t').expect("tab-separated row");
            (
                cluster.parse().expect("cluster id"),
                stability.parse().expect("stability"),
            )
        })
        .collect();
    let ids: Vec<u64> = rows.iter().map(|row| row.0).collect();
    assert_eq!(ids, vec![102, 103, 104]);
    assert!((rows[0].1 - 30.0).abs() < 1e-9);
    assert_eq!(rows[2].1, 25.0);
    Ok(())
}

#[rstest]
#[case(ExportFormat::Table)]
#[case(ExportFormat::Graph)]
fn export_renders_requested_format(
    tree_file: TreeFile,
    #[case] format: ExportFormat,
) -> TestResult {
    let output = run_export(&ExportArgs {
        path: tree_file.path.clone(),
        format,
    })?;
    let text = render(&output)?;
    match format {
        ExportFormat::Table => {
            assert!(text.starts_with("parent,child,lambda,child_size\n"));
            assert_eq!(text.lines().count(), two_level_rows().len() + 1);
        }
        ExportFormat::Graph => {
            let json: serde_json::Value = serde_json::from_str(&text)?;
            assert_eq!(
                json["edges"].as_array().map(Vec::len),
                Some(two_level_rows().len())
            );
            assert_eq!(json["nodes"]["101"]["size"], 40);
        }
    }
    Ok(())
}

#[rstest]
fn plot_emits_display_list(tree_file: TreeFile) -> TestResult {
    let args = PlotArgs {
        select_clusters: true,
        ..plot_args(&tree_file.path)
    };
    let CommandOutput::DisplayList(items) = run_plot(&args)? else {
        panic!("plot must return a display list");
    };
    let ellipses = items
        .iter()
        .filter(|item| matches!(item, DisplayItem::Ellipse { .. }))
        .count();
    assert_eq!(ellipses, 3);
    assert!(matches!(items.last(), Some(DisplayItem::Axes { invert_y: true, .. })));

    let text = render(&CommandOutput::DisplayList(items.clone()))?;
    assert_eq!(text.lines().count(), items.len());
    let first: serde_json::Value = serde_json::from_str(text.lines().next().unwrap_or("{}"))?;
    assert_eq!(first["kind"], "bar");
    assert_eq!(first["colour_map"], "Blues");
    Ok(())
}

#[rstest]
fn plot_without_colour_map_draws_black_bars(tree_file: TreeFile) -> TestResult {
    let args = PlotArgs {
        colour_map: ColourMap::None,
        ..plot_args(&tree_file.path)
    };
    let CommandOutput::DisplayList(items) = run_plot(&args)? else {
        panic!("plot must return a display list");
    };
    assert!(items.iter().all(|item| match item {
        DisplayItem::Bar { colour_map, .. } => colour_map.is_none(),
        DisplayItem::ColourBar { .. } => false,
        _ => true,
    }));
    Ok(())
}

#[rstest]
fn missing_input_reports_io_error() {
    let err = load_tree(Path::new("/definitely/not/here.csv")).expect_err("missing file");
    assert!(matches!(err, CliError::Io { .. }));
    assert_eq!(err.code(), None);
}

#[rstest]
fn malformed_tree_reports_tree_code() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_file(
        &dir,
        "dangling.csv",
        "parent,child,lambda,child_size\n0,1,0.5,1\n7,2,0.5,1\n",
    )?;
    let err = load_tree(&path).expect_err("dangling parent must fail");
    assert!(matches!(
        err,
        CliError::Tree(TreeError::UnknownParent { parent: 7 })
    ));
    assert_eq!(err.code(), Some(TreeErrorCode::UnknownParent.as_str()));
    Ok(())
}

#[rstest]
fn run_cli_records_command_span(tree_file: TreeFile) -> TestResult {
    let cli = Cli {
        command: Command::Select(SelectArgs {
            path: tree_file.path.clone(),
        }),
    };
    let (result, layer) = RecordingLayer::capture(|| run_cli(cli));
    result?;

    let run = layer.span("cli.run").expect("cli.run span must exist");
    assert_eq!(run.fields.get("command"), Some(&"select".to_owned()));
    let load = layer.span("cli.load_tree").expect("cli.load_tree span must exist");
    assert_eq!(
        load.fields.get("records"),
        Some(&two_level_rows().len().to_string())
    );
    assert!(layer.span("core.select").is_some());
    Ok(())
}

#[rstest]
#[case::layout(&["tsurara", "layout", "tree.csv", "--leaf-separation", "2", "--log-size"])]
#[case::select(&["tsurara", "select", "tree.csv"])]
#[case::export(&["tsurara", "export", "tree.csv", "--format", "graph"])]
#[case::plot(&["tsurara", "plot", "tree.csv", "--select-clusters", "--colour-map", "none"])]
fn clap_accepts_documented_invocations(#[case] args: &[&str]) {
    let cli = Cli::try_parse_from(args).expect("arguments must parse");
    if let Command::Plot(plot) = cli.command {
        assert_eq!(plot.colour_map, ColourMap::None);
        assert!(plot.select_clusters);
        assert!(!plot.no_colour_bar);
    }
}

#[rstest]
fn clap_rejects_unknown_export_format() {
    let result = Cli::try_parse_from(["tsurara", "export", "tree.csv", "--format", "xml"]);
    assert!(result.is_err());
}
