//! Clap adapter for profilegen.
//!
//! This module is the **optional integration layer** between the
//! framework-agnostic library and the [clap](https://docs.rs/clap) CLI
//! parser. It is compiled only when the `cli` Cargo feature is enabled (on by
//! default).
//!
//! The only bridge to the core is [`Cli::into_action()`], which converts
//! clap-parsed arguments into a [`GenerateAction`]. From there, all logic
//! flows through [`ProfileGenerator::handle()`](crate::ProfileGenerator::handle).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::builder::SettingsBuilder;
use crate::types::{GenerateAction, SearchPath};

/// Compose slicer profiles from layered configuration fragments.
#[derive(Debug, Parser)]
#[command(name = "profilegen", version)]
pub struct Cli {
    /// Fragment root directory (overrides `fragment_root`).
    #[arg(long, global = true)]
    pub fragment_root: Option<PathBuf>,

    /// Output directory (overrides `output_dir`).
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Extra directory to search for `profilegen.toml`, highest priority.
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by the batch subcommands.
#[derive(Debug, Args)]
pub struct BatchArgs {
    /// Fragment merged last into every profile (repeatable).
    #[arg(long = "extra", value_name = "PATH")]
    pub extra: Vec<String>,

    /// Appended to every profile name.
    #[arg(long, default_value = "")]
    pub suffix: String,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate every profile for one machine.
    Generate {
        /// Machine identifier, e.g. the file stem under `machine/`.
        machine: String,
        #[command(flatten)]
        batch: BatchArgs,
    },
    /// Generate every profile for every discovered machine.
    GenerateAll {
        #[command(flatten)]
        batch: BatchArgs,
    },
    /// Print a machine's manifest without writing anything.
    Manifest {
        /// Machine identifier.
        machine: String,
    },
    /// Compose and write a single named profile.
    Compose {
        /// Profile name (also the output file stem).
        name: String,
        /// Fragment paths, relative to the fragment root, in merge order.
        #[arg(required = true)]
        fragments: Vec<String>,
        /// Fragment merged after the others (repeatable).
        #[arg(long = "extra", value_name = "PATH")]
        extra: Vec<String>,
    },
    /// List discovered machines.
    Machines,
}

impl Cli {
    /// Convert clap-parsed args into a framework-agnostic `GenerateAction`.
    pub fn into_action(self) -> GenerateAction {
        match self.command {
            Command::Generate { machine, batch } => GenerateAction::Generate {
                machine,
                extra: batch.extra,
                suffix: batch.suffix,
            },
            Command::GenerateAll { batch } => GenerateAction::GenerateAll {
                extra: batch.extra,
                suffix: batch.suffix,
            },
            Command::Manifest { machine } => GenerateAction::Manifest { machine },
            Command::Compose {
                name,
                fragments,
                extra,
            } => GenerateAction::Compose {
                name,
                fragments,
                extra,
            },
            Command::Machines => GenerateAction::Machines,
        }
    }

    /// A [`SettingsBuilder`] with this invocation's flags applied as overrides.
    pub fn settings_builder(&self) -> SettingsBuilder {
        let mut builder = SettingsBuilder::new();
        if let Some(dir) = &self.settings {
            builder = builder.add_search_path(SearchPath::Path(dir.clone()));
        }
        builder
            .cli_override(
                "fragment_root",
                self.fragment_root.as_ref().map(|p| p.display().to_string()),
            )
            .cli_override(
                "output_dir",
                self.output_dir.as_ref().map(|p| p.display().to_string()),
            )
    }

    /// Default log filter directive for the `-v` count.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
