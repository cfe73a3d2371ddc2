//! # Catalog CLI
//!
//! ## Usage
//! ```bash
//! # Catalog page JSON for a query
//! cargo run -p salvage-catalog --bin catalog -- browse "category=doors&sort=-price"
//!
//! # Sidebar tree, optionally toggling nodes by id
//! cargo run -p salvage-catalog --bin catalog -- sidebar "category=hinges" --toggle 1
//!
//! # Query string after changing one dimension
//! cargo run -p salvage-catalog --bin catalog -- link "category=doors&page=3" classification antique
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use salvage_catalog::{logging, CatalogConfig, CatalogService, SqliteSource};
use salvage_core::codec::{self, QueryCodec};
use salvage_core::presentation::{SidebarState, VisibleNode};
use salvage_core::CategoryId;
use salvage_db::Database;

#[derive(Parser, Debug)]
#[command(name = "catalog", about = "Browse the salvage catalog from the command line")]
struct CliArgs {
    /// Config file (default: platform config dir, catalog.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database path, overriding the config
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the catalog page for a query string as JSON
    Browse {
        /// Query string, e.g. "category=doors&page=2"
        #[arg(default_value = "")]
        query: String,
    },

    /// Print the category sidebar for a query string
    Sidebar {
        #[arg(default_value = "")]
        query: String,

        /// Top-level category ids to expand or collapse
        #[arg(long)]
        toggle: Vec<String>,
    },

    /// Print the query string after changing one parameter
    Link {
        query: String,

        /// category | classification | vendor | search | page | limit | sort | view
        key: String,

        /// New value; omit to clear
        value: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config warnings are emitted before the configured level is known
    let mut config = logging::bootstrap(|| CatalogConfig::load(args.config))?;
    if let Some(db) = args.db {
        config.database.path = db;
    }
    logging::init_with(&config.logging.level);

    match args.command {
        Command::Link { query, key, value } => {
            let codec = QueryCodec::new(config.catalog.default_page_size());
            let change = codec.parse_change(&key, value.as_deref())?;
            let params = codec.apply_change(&codec::parse_query(&query), &change);
            println!("{}", codec::format_query(&params));
        }

        Command::Browse { query } => {
            let service = open(&config).await?;
            let page = service.browse_query(&query).await?;
            println!("{}", serde_json::to_string_pretty(&page)?);
        }

        Command::Sidebar { query, toggle } => {
            let service = open(&config).await?;
            let page = service.browse_query(&query).await?;

            let mut sidebar =
                SidebarState::new(&page.category_tree, page.active_filters.category());
            for id in toggle {
                sidebar.toggle(&CategoryId::from(id));
            }

            for row in sidebar.visible_nodes() {
                match row {
                    VisibleNode::Parent { node, expanded } => {
                        let marker = if expanded { "▾" } else { "▸" };
                        let active = if node.active { " *" } else { "" };
                        println!("{} {} ({}){}", marker, node.name, node.total_count, active);
                    }
                    VisibleNode::Child { child, .. } => {
                        let active = if child.active { " *" } else { "" };
                        println!("    {} ({}){}", child.name, child.count, active);
                    }
                }
            }
        }
    }

    Ok(())
}

async fn open(config: &CatalogConfig) -> Result<CatalogService, Box<dyn std::error::Error>> {
    let db = Database::new(config.db_config()).await?;
    info!(path = ?config.database.path, "Database opened");

    Ok(CatalogService::new(
        Arc::new(SqliteSource::new(db)),
        config.catalog.clone(),
    ))
}
