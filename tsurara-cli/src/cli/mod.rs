//! Command-line interface orchestration.
//!
//! Every command reads a condensed tree CSV, runs one core stage, and returns
//! a [`CommandOutput`] that [`render_output`] writes to `stdout`.

mod commands;
mod display_list;

pub use commands::{
    Cli, CliError, Command, CommandOutput, ExportArgs, ExportFormat, LayoutArgs, PlotArgs,
    SelectArgs, render_output, run_cli,
};
pub use display_list::{DisplayItem, DisplayListBackend};

#[cfg(test)]
mod tests;
