use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use console_core::record::{EntityKind, ExportFormat, FieldValue};

mod commands;
mod context;
mod logging;

use commands::chat::ChatArgs;
use commands::list::ListArgs;
use commands::lookups::LookupKind;
use commands::records::parse_field;
use context::AppContext;

#[derive(Parser)]
#[command(name = "admin-console")]
#[command(about = "Admin console for modules, organizations, templates and the chat inbox", long_about = None)]
struct Cli {
    /// Use built-in demo data instead of the admin API
    #[arg(long, global = true)]
    offline: bool,

    /// Directory holding config.toml, logs and fixtures
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List one page of records
    List(ListArgs),
    /// Create a record from `--set KEY=VALUE` fields
    Create {
        entity: EntityKind,
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_field, required = true)]
        fields: Vec<(String, FieldValue)>,
    },
    /// Update fields of a record
    Update {
        entity: EntityKind,
        id: String,
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_field, required = true)]
        fields: Vec<(String, FieldValue)>,
    },
    /// Delete one record, or several in a single bulk request
    Delete {
        entity: EntityKind,
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Activate or deactivate a module
    Toggle {
        entity: EntityKind,
        id: String,
        #[arg(long, action = ArgAction::Set)]
        active: bool,
    },
    /// Export every record matching the default filters
    Export {
        entity: EntityKind,
        #[arg(long, default_value = "csv")]
        format: ExportFormat,
    },
    /// Print a filter lookup list
    Lookups {
        #[arg(value_enum)]
        kind: LookupKind,
        /// Entity (categories), country (states) or state (cities)
        #[arg(long)]
        parent: Option<String>,
    },
    /// Browse the chat inbox
    Chat(ChatArgs),
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a default config.toml if none exists
    Init,
    /// Print the effective configuration
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let ctx = AppContext::load(cli.offline, cli.config_dir)?;
    let logs_dir = ctx.paths.logs_dir().ok();
    let _guard = logging::init(&ctx.config.log, logs_dir.as_deref());
    tracing::debug!(
        "[Bootstrap] api={} offline={}",
        ctx.config.api.base_url,
        cli.offline
    );

    match cli.command {
        Commands::List(args) => commands::list::run(&ctx, args).await?,
        Commands::Create { entity, fields } => commands::records::create(&ctx, entity, fields).await?,
        Commands::Update { entity, id, fields } => {
            commands::records::update(&ctx, entity, id, fields).await?
        }
        Commands::Delete { entity, ids } => commands::records::delete(&ctx, entity, ids).await?,
        Commands::Toggle { entity, id, active } => {
            commands::records::toggle(&ctx, entity, id, active).await?
        }
        Commands::Export { entity, format } => commands::records::export(&ctx, entity, format).await?,
        Commands::Lookups { kind, parent } => commands::lookups::run(&ctx, kind, parent).await?,
        Commands::Chat(args) => commands::chat::run(&ctx, args).await?,
        Commands::Config { action } => match action {
            ConfigAction::Init => commands::config::init(&ctx)?,
            ConfigAction::Show => commands::config::show(&ctx)?,
        },
    }

    Ok(())
}
