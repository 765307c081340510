use crate::config::{build_collection, load_config};
use crate::hot_reload::{load_routes_as, watch_routes_with};
use crate::logging::{init_logging_with_config, LogConfig};
use crate::provider::ProviderFormat;
use crate::route::Params;
use crate::router::{RouteCollection, RouteMatch};
use anyhow::{bail, Context, Result};
use arc_swap::ArcSwap;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Command-line interface for tokenroute
#[derive(Parser, Debug)]
#[command(name = "tokenroute", version)]
#[command(about = "Match subjects against token-pattern route files", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Route file formats accepted by `--format`
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Ini,
    Json,
    Yaml,
}

impl From<FormatArg> for ProviderFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Ini => ProviderFormat::Ini,
            FormatArg::Json => ProviderFormat::Json,
            FormatArg::Yaml => ProviderFormat::Yaml,
        }
    }
}

/// Route file selection shared by every command that loads routes
#[derive(Args, Debug, Clone)]
pub struct RoutesArgs {
    /// Route file (.ini, .json, .yaml or .yml)
    #[arg(short, long)]
    pub routes: PathBuf,

    /// Format of the route file, when the extension does not say
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,
}

impl RoutesArgs {
    /// The explicit format, else the one implied by the extension.
    ///
    /// # Errors
    ///
    /// Fails when neither is available.
    pub fn format(&self) -> Result<ProviderFormat> {
        match self.format {
            Some(format) => Ok(format.into()),
            None => ProviderFormat::from_path(&self.routes).with_context(|| {
                format!(
                    "Cannot determine the format of {}, pass --format",
                    self.routes.display()
                )
            }),
        }
    }

    /// Load the route file into a fresh collection.
    ///
    /// # Errors
    ///
    /// Fails when the file is missing, unreadable or invalid.
    pub fn load(&self) -> Result<RouteCollection> {
        let format = self.format()?;
        load_routes_as(&self.routes, format)
            .with_context(|| format!("Failed to load routes from {}", self.routes.display()))
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Route a subject and print the match as JSON
    Match {
        #[command(flatten)]
        routes: RoutesArgs,

        /// Subject to route, e.g. `blog/2024/hello-world`
        subject: String,
    },
    /// Generate a path from a named route
    Reverse {
        #[command(flatten)]
        routes: RoutesArgs,

        /// Name of the route
        #[arg(short, long)]
        name: String,

        /// Parameter as key=value, repeatable
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// List routes in priority order
    List {
        #[command(flatten)]
        routes: RoutesArgs,
    },
    /// Validate a config file and every route file it lists
    Check {
        /// Path to the TOML config file
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Route subjects read from stdin, one JSON line per subject
    Serve {
        #[command(flatten)]
        routes: RoutesArgs,

        /// Reload the route file when it changes
        #[arg(long, default_value_t = false)]
        watch: bool,

        /// Config file whose `[log]` table sets up logging
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

impl Commands {
    /// Logging settings for this command: the `[log]` table of its config
    /// file when it has one, else the environment.
    ///
    /// # Errors
    ///
    /// Fails when the config file cannot be loaded.
    pub fn log_config(&self) -> Result<LogConfig> {
        let config = match self {
            Commands::Check { config } => Some(config),
            Commands::Serve { config, .. } => config.as_ref(),
            _ => None,
        };
        match config {
            Some(path) => Ok(load_config(path)?.log),
            None => Ok(LogConfig::from_env()),
        }
    }
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}

#[derive(Serialize)]
struct MatchOutput<'a> {
    route: &'a str,
    params: &'a Params,
}

impl<'a> From<&'a RouteMatch> for MatchOutput<'a> {
    fn from(m: &'a RouteMatch) -> Self {
        Self {
            route: &m.name,
            params: &m.params,
        }
    }
}

#[derive(Serialize)]
struct ServeOutput<'a> {
    subject: &'a str,
    route: Option<&'a str>,
    params: Option<&'a Params>,
}

/// Parse arguments, set up logging, and run the selected command against
/// stdin and stdout.
///
/// # Errors
///
/// Returns an error if:
/// - a route or config file cannot be loaded
/// - `match` finds no route, or `reverse` names an unknown route
/// - writing the output fails
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging_with_config(&cli.command.log_config()?)?;
    let stdin = io::stdin();
    run_command(&cli.command, stdin.lock(), io::stdout().lock())
}

/// Run one command.
///
/// # Errors
///
/// See [`run_cli`].
pub fn run_command<R: BufRead, W: Write>(command: &Commands, input: R, mut out: W) -> Result<()> {
    match command {
        Commands::Match { routes, subject } => {
            let collection = routes.load()?;
            let Some(found) = collection.query(subject) else {
                bail!("No route matches '{subject}'");
            };
            writeln!(out, "{}", serde_json::to_string(&MatchOutput::from(&found))?)?;
        }
        Commands::Reverse {
            routes,
            name,
            params,
        } => {
            let collection = routes.load()?;
            let params: Params = params
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            writeln!(out, "{}", collection.reverse(name, &params)?)?;
        }
        Commands::List { routes } => {
            let collection = routes.load()?;
            for (name, route) in collection.iter() {
                writeln!(out, "{name}\t{}", route.reverse_template().unwrap_or("-"))?;
            }
        }
        Commands::Check { config } => {
            let config = load_config(config)?;
            let collection = build_collection(&config)?;
            writeln!(
                out,
                "ok: {} routes from {} route files",
                collection.len(),
                config.providers.len()
            )?;
        }
        Commands::Serve { routes, watch, .. } => {
            serve(routes, *watch, input, out)?;
        }
    }
    Ok(())
}

fn serve<R: BufRead, W: Write>(args: &RoutesArgs, watch: bool, input: R, mut out: W) -> Result<()> {
    let format = args.format()?;
    let routes = Arc::new(ArcSwap::from_pointee(args.load()?));

    // kept alive for the duration of the loop
    let _watcher = if watch {
        let loader = move |path: &Path| load_routes_as(path, format);
        let watcher = watch_routes_with(&args.routes, Arc::clone(&routes), loader, |fresh| {
            info!(routes_count = fresh.len(), "Route file reloaded");
        })
        .with_context(|| format!("Failed to watch {}", args.routes.display()))?;
        Some(watcher)
    } else {
        None
    };

    for line in input.lines() {
        let subject = line.context("Failed to read subject")?;
        let current = routes.load();
        let found = current.query(&subject);
        let output = ServeOutput {
            subject: &subject,
            route: found.as_ref().map(|m| m.name.as_str()),
            params: found.as_ref().map(|m| &m.params),
        };
        writeln!(out, "{}", serde_json::to_string(&output)?)?;
        out.flush()?;
    }
    Ok(())
}
