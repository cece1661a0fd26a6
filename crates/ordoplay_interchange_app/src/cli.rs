// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command line parsing.

use clap::error::ErrorKind;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::ffi::OsString;
use std::path::PathBuf;

/// A parsed invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Write a bundle document from a scene
    Export {
        /// Scene file
        scene: PathBuf,
        /// Output document, stdout if absent
        out: Option<PathBuf>,
        /// Configuration file
        config: Option<PathBuf>,
        /// Snapshot properties of every node, not only unknown ones
        snapshot_all: bool,
        /// Skip hidden objects
        only_visible: bool,
        /// Only export objects under these collections
        collections: Vec<String>,
    },
    /// Import groups and apply overrides from a document onto a scene
    Apply {
        /// Scene file
        scene: PathBuf,
        /// Input document
        doc: PathBuf,
        /// Configuration file
        config: Option<PathBuf>,
        /// Create placeholders for missing objects and groups
        placeholders: bool,
        /// Apply only the first `n` overrides
        limit: Option<usize>,
        /// Where to write the scene, in place if absent
        out: Option<PathBuf>,
    },
}

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .value_name("CFG")
        .value_parser(value_parser!(PathBuf))
        .help("RON configuration file")
}

/// The command line definition
pub fn command() -> Command {
    Command::new("ordoplay_interchange")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Export and apply node graph interchange documents")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("export")
                .about("Write groups and binding overrides of a scene as JSON")
                .arg(
                    Arg::new("scene")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Scene file (RON)"),
                )
                .arg(
                    Arg::new("out")
                        .value_parser(value_parser!(PathBuf))
                        .help("Output document, stdout if omitted"),
                )
                .arg(config_arg())
                .arg(
                    Arg::new("all")
                        .long("all")
                        .action(ArgAction::SetTrue)
                        .help("Snapshot properties of every node, not only unknown ones"),
                )
                .arg(
                    Arg::new("only-visible")
                        .long("only-visible")
                        .action(ArgAction::SetTrue)
                        .help("Skip hidden objects"),
                )
                .arg(
                    Arg::new("collection")
                        .long("collection")
                        .value_name("NAME")
                        .action(ArgAction::Append)
                        .value_delimiter(',')
                        .help("Only export objects under this collection, children included"),
                ),
        )
        .subcommand(
            Command::new("apply")
                .about("Import groups and apply overrides from a document onto a scene")
                .arg(
                    Arg::new("scene")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Scene file (RON)"),
                )
                .arg(
                    Arg::new("doc")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Interchange document (JSON)"),
                )
                .arg(config_arg())
                .arg(
                    Arg::new("no-placeholders")
                        .long("no-placeholders")
                        .action(ArgAction::SetTrue)
                        .help("Skip overrides whose object or group is missing"),
                )
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_name("N")
                        .value_parser(value_parser!(usize))
                        .help("Apply only the first N overrides"),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .value_name("SCENE")
                        .value_parser(value_parser!(PathBuf))
                        .help("Where to write the scene, in place if omitted"),
                ),
        )
}

impl Invocation {
    /// Parse a full argument list, program name first
    pub fn parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = command().try_get_matches_from(args)?;
        Self::from_matches(&matches)
    }

    /// Build an invocation from matched arguments
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, clap::Error> {
        match matches.subcommand() {
            Some(("export", args)) => Ok(Self::Export {
                scene: required_path(args, "scene")?,
                out: args.get_one::<PathBuf>("out").cloned(),
                config: args.get_one::<PathBuf>("config").cloned(),
                snapshot_all: args.get_flag("all"),
                only_visible: args.get_flag("only-visible"),
                collections: args
                    .get_many::<String>("collection")
                    .map(|names| names.cloned().collect())
                    .unwrap_or_default(),
            }),
            Some(("apply", args)) => Ok(Self::Apply {
                scene: required_path(args, "scene")?,
                doc: required_path(args, "doc")?,
                config: args.get_one::<PathBuf>("config").cloned(),
                placeholders: !args.get_flag("no-placeholders"),
                limit: args.get_one::<usize>("limit").copied(),
                out: args.get_one::<PathBuf>("out").cloned(),
            }),
            _ => Err(command().error(ErrorKind::MissingSubcommand, "expected 'export' or 'apply'")),
        }
    }
}

fn required_path(args: &ArgMatches, id: &str) -> Result<PathBuf, clap::Error> {
    args.get_one::<PathBuf>(id).cloned().ok_or_else(|| {
        command().error(ErrorKind::MissingRequiredArgument, format!("missing <{id}>"))
    })
}
