// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Every option can also come from a REPO_SCOUT_* environment variable
// (clap's `env` feature), which is handy in CI.
// =============================================================================

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "repo-scout",
    version,
    about = "Clone a repository, find its README and parse it",
    long_about = "repo-scout shallow-clones a repository into a temporary workspace, \
                  locates its README under the usual name variants and parses it into \
                  a markdown tree. \
                  The workspace is always removed afterwards."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Clone a repository and report on its README
    ///
    /// Example: repo-scout scan https://github.com/rust-lang/rust
    Scan {
        /// Repository URL (https, http, ssh, git or file scheme)
        repo_url: String,

        /// Directory to clone into (cleared first, removed afterwards).
        /// Defaults to a fresh directory under the system temp dir.
        #[arg(long, env = "REPO_SCOUT_WORKSPACE")]
        workspace: Option<PathBuf>,

        /// Give up on the clone after this many seconds
        #[arg(
            long,
            env = "REPO_SCOUT_TIMEOUT",
            default_value_t = 120,
            value_parser = clap::value_parser!(u64).range(1..)
        )]
        timeout: u64,

        /// git executable to use
        #[arg(long, env = "REPO_SCOUT_GIT", default_value = "git")]
        git: PathBuf,

        /// Output results in JSON format instead of text
        #[arg(long)]
        json: bool,
    },

    /// Find the README in a local directory
    ///
    /// Example: repo-scout locate ./my-project
    Locate {
        /// Directory to search (only its top level is checked)
        dir: PathBuf,

        /// Output results in JSON format instead of text
        #[arg(long)]
        json: bool,
    },

    /// Parse a local markdown file
    ///
    /// Example: repo-scout parse README.md --tree
    Parse {
        /// Markdown file to parse
        file: PathBuf,

        /// Output results in JSON format instead of text
        #[arg(long)]
        json: bool,

        /// Print the whole document tree as JSON
        #[arg(long)]
        tree: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_defaults() {
        let cli =
            Cli::try_parse_from(["repo-scout", "scan", "https://github.com/user/repo"]).unwrap();
        match cli.command {
            Commands::Scan {
                repo_url,
                timeout,
                git,
                json,
                ..
            } => {
                assert_eq!(repo_url, "https://github.com/user/repo");
                assert_eq!(timeout, 120);
                assert_eq!(git, PathBuf::from("git"));
                assert!(!json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from(["repo-scout", "parse", "README.md", "--tree"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Parse { tree: true, json: false, .. }
        ));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let result = Cli::try_parse_from([
            "repo-scout",
            "scan",
            "https://github.com/a/b",
            "--timeout",
            "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_url_is_rejected() {
        assert!(Cli::try_parse_from(["repo-scout", "scan"]).is_err());
    }
}
