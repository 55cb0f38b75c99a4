// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line settings adapter.
//!
//! This module provides an adapter that overrides [`FlowsSettings`] identities
//! from command-line arguments. Applied after the environment adapter it gives the
//! usual precedence: arguments over environment over built-in defaults.

use crate::domain::{FlowsConfigError, FlowsSettings, NamespacedName, Result};
use clap::{value_parser, Arg, ArgMatches, Command};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Settings adapter for command-line arguments.
///
/// Recognized arguments:
/// - `--config-name <NAME>` / `--config-namespace <NAMESPACE>`: the watched record
/// - `--operator-config-name <NAME>` / `--operator-namespace <NAMESPACE>`: the consumer
/// - `-f, --manifest <PATH>`: a manifest file to read records from
///
/// # Examples
///
/// ```rust
/// use flowscfg::adapters::CommandLineSettings;
/// use flowscfg::domain::FlowsSettings;
///
/// let args = ["flowscfg", "--config-namespace", "staging", "-f", "/tmp/flows.yaml"];
/// let cli = CommandLineSettings::try_from_args(args).unwrap();
/// let settings = cli.apply(FlowsSettings::default()).unwrap();
///
/// assert_eq!(settings.record().namespace(), "staging");
/// assert_eq!(cli.manifest().unwrap().to_str(), Some("/tmp/flows.yaml"));
/// ```
#[derive(Debug, Clone)]
pub struct CommandLineSettings {
    matches: ArgMatches,
}

impl CommandLineSettings {
    /// Returns the argument definitions.
    pub fn command() -> Command {
        Command::new("flowscfg")
            .about("Loads the flow export configuration record")
            .arg(
                Arg::new("config-name")
                    .long("config-name")
                    .value_name("NAME")
                    .help("Name of the configuration record to watch"),
            )
            .arg(
                Arg::new("config-namespace")
                    .long("config-namespace")
                    .value_name("NAMESPACE")
                    .help("Namespace of the configuration record to watch"),
            )
            .arg(
                Arg::new("operator-config-name")
                    .long("operator-config-name")
                    .value_name("NAME")
                    .help("Name of the consumer to notify on changes"),
            )
            .arg(
                Arg::new("operator-namespace")
                    .long("operator-namespace")
                    .value_name("NAMESPACE")
                    .help("Namespace of the consumer to notify on changes"),
            )
            .arg(
                Arg::new("manifest")
                    .long("manifest")
                    .short('f')
                    .value_name("PATH")
                    .value_parser(value_parser!(PathBuf))
                    .help("Manifest file declaring configuration records"),
            )
    }

    /// Parses `args`; the first item is the program name.
    pub fn try_from_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Self::command()
            .try_get_matches_from(args)
            .map_err(|e| FlowsConfigError::SettingsError {
                message: e.to_string(),
            })?;
        Ok(Self { matches })
    }

    /// Parses the process arguments, exiting with usage on `--help` or bad input.
    pub fn from_env_args() -> Self {
        Self {
            matches: Self::command().get_matches(),
        }
    }

    fn value(&self, id: &str) -> Option<&str> {
        self.matches
            .get_one::<String>(id)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Returns the manifest path, if one was given.
    pub fn manifest(&self) -> Option<&Path> {
        self.matches.get_one::<PathBuf>("manifest").map(PathBuf::as_path)
    }

    /// Applies the overrides given on the command line on top of `base`.
    pub fn apply(&self, base: FlowsSettings) -> Result<FlowsSettings> {
        let record = NamespacedName::new(
            self.value("config-name").unwrap_or(base.record().name()),
            self.value("config-namespace")
                .unwrap_or(base.record().namespace()),
        );
        let consumer = NamespacedName::new(
            self.value("operator-config-name")
                .unwrap_or(base.consumer().name()),
            self.value("operator-namespace")
                .unwrap_or(base.consumer().namespace()),
        );
        let settings = FlowsSettings::new(record, consumer);
        settings.validate()?;
        Ok(settings)
    }
}
