//! # CLI Module
//!
//! Command line front end to the router, shipped as the `tokenroute` binary.
//!
//! ## Commands
//!
//! ### `match`
//!
//! Route one subject and print the result as JSON:
//!
//! ```bash
//! tokenroute match --routes routes.ini blog/2024/03/hello-world
//! {"route":"post","params":{"controller":"post","year":"2024","month":"03","slug":"hello-world"}}
//! ```
//!
//! Exits non-zero when no route matches.
//!
//! ### `reverse`
//!
//! Generate a path from a named route:
//!
//! ```bash
//! tokenroute reverse --routes routes.ini --name post --param year=2024 --param slug=hello
//! blog/2024/hello
//! ```
//!
//! ### `list`
//!
//! Print every route in priority order with its pattern.
//!
//! ### `check`
//!
//! Load a [`RouterConfig`](crate::config::RouterConfig) file and build every
//! provider it lists, reporting the first error.
//!
//! ### `serve`
//!
//! Read subjects from stdin, one per line, and answer each with a JSON line.
//! With `--watch` the route file is reloaded whenever it changes.
//!
//! ## Usage from Code
//!
//! ```rust,no_run
//! use tokenroute::cli::{run_command, Cli};
//! use clap::Parser;
//!
//! # fn main() -> anyhow::Result<()> {
//! let cli = Cli::parse_from(["tokenroute", "list", "--routes", "routes.ini"]);
//! run_command(&cli.command, std::io::empty(), std::io::stdout())?;
//! # Ok(())
//! # }
//! ```

mod commands;

pub use commands::{run_cli, run_command, Cli, Commands, FormatArg, RoutesArgs};
