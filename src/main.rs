//! Depscope CLI entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use config::Config;
use depscope_core::{Direction, GraphQuery};

#[derive(Parser)]
#[command(name = "depscope")]
#[command(about = "Explore build-artifact dependency graphs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ./depscope.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Fact snapshot file, overriding the config
    #[arg(long, global = true)]
    facts: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },
    /// Print the graph view for a root as JSON
    Graph {
        /// Root GAV (group:artifact:version)
        root: Option<String>,

        /// forward (dependencies) or reverse (dependents)
        #[arg(short, long, default_value = "forward")]
        direction: String,

        /// Maximum number of hops from the root
        #[arg(long)]
        depth: Option<usize>,

        /// Collapse nodes that differ only by group
        #[arg(long)]
        hide_group: bool,

        /// Collapse nodes that differ only by version
        #[arg(long)]
        hide_version: bool,

        /// Only follow edges with this scope (repeatable)
        #[arg(short, long = "scope")]
        scopes: Vec<String>,
    },
    /// Import project facts from a JSON file into the snapshot
    Import {
        /// JSON array of projects with their dependencies
        file: PathBuf,
    },
    /// Show snapshot statistics
    Stats,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("depscope={}", log_level)));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load(cli.config.as_deref())?;
    let facts = config.facts_path(cli.facts);
    tracing::debug!("Fact snapshot: {}", facts.display());

    match cli.command {
        Commands::Serve { port, host } => {
            tracing::info!("Depscope v{}", env!("CARGO_PKG_VERSION"));
            commands::serve(facts, config.server_config(host, port)).await
        }
        Commands::Graph {
            root,
            direction,
            depth,
            hide_group,
            hide_version,
            scopes,
        } => {
            let query = GraphQuery {
                root_id: root,
                direction: Direction::parse(&direction),
                show_group: !hide_group,
                show_version: !hide_version,
                depth,
                scopes,
            };
            commands::graph(&facts, &query)
        }
        Commands::Import { file } => commands::import(&facts, &file),
        Commands::Stats => commands::stats(&facts),
        Commands::Version => {
            println!("Depscope v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_flags() {
        let cli = Cli::try_parse_from(["depscope", "serve", "--port", "9000"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Serve {
                port: Some(9000),
                host: None
            }
        ));

        // There is no bundled UI to launch
        assert!(Cli::try_parse_from(["depscope", "serve", "--open"]).is_err());
    }

    #[test]
    fn test_graph_flags() {
        let cli = Cli::try_parse_from([
            "depscope", "graph", "g:a:1", "--direction", "reverse", "--hide-version", "-s", "test",
            "-s", "runtime", "--facts", "facts.json",
        ])
        .unwrap();
        assert_eq!(cli.facts, Some(PathBuf::from("facts.json")));
        match cli.command {
            Commands::Graph {
                root,
                direction,
                hide_group,
                hide_version,
                scopes,
                ..
            } => {
                assert_eq!(root.as_deref(), Some("g:a:1"));
                assert_eq!(Direction::parse(&direction), Direction::Reverse);
                assert!(!hide_group && hide_version);
                assert_eq!(scopes, vec!["test", "runtime"]);
            }
            _ => panic!("expected graph command"),
        }
    }
}
