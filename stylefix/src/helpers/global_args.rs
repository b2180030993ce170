//! Global argument propagation helper
//!
//! Turns the CLI's global flags into a resolved source root, an output
//! manager and per-pass [`FixConfig`]s.

use std::path::PathBuf;

use anyhow::{
    Context,
    Result,
};
use atty::Stream;
use stylefix_core::{
    FixConfig,
    Pass,
};

use super::{
    OutputFormat,
    OutputManager,
};
use crate::{
    Cli,
    OutputFormatArg,
};

/// Global arguments shared by every subcommand
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    /// Resolved source root
    pub root:       PathBuf,
    /// Report changes without writing
    pub dry_run:    bool,
    /// Per-file output
    pub verbose:    bool,
    /// Extension override for the pass
    pub extensions: Option<Vec<String>>,
    /// Extra names to exclude
    pub excludes:   Vec<String>,
    /// Output manager configured with format and color settings
    pub output:     OutputManager,
}

impl GlobalArgs {
    /// Create GlobalArgs from the parsed CLI
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let output_format: OutputFormat = cli.output.into();
        let use_colors = match output_format {
            OutputFormat::Human => atty::is(Stream::Stdout),
            OutputFormat::Json => false,
        };
        let output =
            OutputManager::new(output_format).with_color(use_colors).with_verbose(cli.verbose);

        let root = match &cli.root {
            Some(root) => root.clone(),
            None => match stylefix_core::detect_source_root() {
                Ok(root) => root,
                Err(e) => {
                    tracing::debug!(error = %e, "no package root found, using current directory");
                    std::env::current_dir().context("Failed to get current directory")?
                },
            },
        };

        Ok(Self {
            root,
            dry_run: cli.dry_run,
            verbose: cli.verbose,
            extensions: cli.ext.clone(),
            excludes: cli.exclude.clone().unwrap_or_default(),
            output,
        })
    }

    /// Configuration for the pass the user selected, with `--ext` applied
    pub fn config_for(&self, pass: Pass) -> FixConfig {
        let config = self.default_config_for(pass);
        match &self.extensions {
            Some(extensions) => config.with_extensions(extensions.iter().cloned()),
            None => config,
        }
    }

    /// Configuration for `pass` keeping its own extension list
    ///
    /// Used when several passes run together, where one extension override
    /// cannot fit them all.
    pub fn default_config_for(&self, pass: Pass) -> FixConfig {
        let mut config = FixConfig::for_pass(pass, &self.root)
            .with_dry_run(self.dry_run)
            .with_extra_excludes(self.excludes.iter().cloned());
        config.verbose = self.verbose;
        config
    }

    /// Check if JSON mode is active
    pub fn is_json_mode(&self) -> bool {
        matches!(self.output.format(), OutputFormat::Json)
    }
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(format: OutputFormatArg) -> Self {
        match format {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}
