use std::ffi::OsString;
use clap::{ArgAction, Parser, Subcommand};

pub const USAGE: &str = "Usage: bd <install|exec>";

#[derive(Debug, Parser, Clone)]
#[command(
    name = "bd",
    about,
    disable_help_flag = true,
    disable_help_subcommand = true,
    disable_version_flag = true
)]
pub struct CLI {
    /// Log more (-v info, -vv debug, -vvv trace). `RUST_LOG` takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    pub(crate) verbose: u8,
    #[command(subcommand)]
    pub(crate) command: BdCommand,
}

#[derive(Debug, Subcommand, Clone, PartialEq)]
pub enum BdCommand {
    /// Installs every binary declared in `bd.json` into its bin directory
    Install {
        /// Remove the bin directory before installing
        #[arg(short, long)]
        clean: bool,
    },
    /// Runs an installed binary, forwarding arguments and standard streams
    Exec {
        name: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

pub fn print_usage() {
    println!("{USAGE}");
}

/// Rewrites the single-dash `-clean` spelling to `--clean`.
///
/// Everything after `exec <name>` belongs to the executed binary. It is
/// placed behind a `--` of our own so clap hands it over untouched,
/// including a `--` the binary expects to see.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into);
    let mut normalized: Vec<OsString> = args.next().into_iter().collect();
    while let Some(arg) = args.next() {
        if arg == "exec" {
            normalized.push(arg);
            if let Some(name) = args.next() {
                normalized.push(name);
                let passthrough: Vec<OsString> = args.by_ref().collect();
                if !passthrough.is_empty() {
                    normalized.push(OsString::from("--"));
                    normalized.extend(passthrough);
                }
            }
            break;
        }
        if arg == "-clean" {
            normalized.push(OsString::from("--clean"));
        } else {
            normalized.push(arg);
        }
    }
    normalized
}
