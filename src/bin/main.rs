//! reveng CLI - reverse engineer and migrate SQLite databases
//!
//! Usage:
//!   reveng scaffold <connection> [--include RULE]... [--exclude RULE]... [--output json|text]
//!   reveng migrate <connection> [--dir DIR] [--target ID]
//!   reveng history <connection>
//!
//! Examples:
//!   reveng scaffold ./shop.db --include 'main.*' --exclude audit_log
//!   reveng migrate warehouse --target 0003_add_orders
//!   reveng history warehouse

use clap::{Parser, Subcommand, ValueEnum};
use reveng::config::{SelectionSettings, Settings};
use reveng::executor::{RelationalConnection, SqliteExecutor};
use reveng::metadata::{DatabaseModel, MetadataModelProvider, SqliteMetadataModelProvider};
use reveng::migrations::{Migration, Migrator};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, Level};

#[derive(Parser)]
#[command(name = "reveng")]
#[command(about = "reveng - reverse engineer database metadata, scoped by table selections")]
#[command(version)]
struct Cli {
    /// Path to a reveng.toml config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace); overrides the config file
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log format (text, json); overrides the config file
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reverse engineer a database into a model
    Scaffold {
        /// Connection name from the config file, or a database path
        connection: String,

        /// Table to include ([schema.]table, `*` as wildcard); repeatable
        #[arg(short, long)]
        include: Vec<String>,

        /// Table to exclude ([schema.]table, `*` as wildcard); repeatable
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Apply or revert migrations
    Migrate {
        /// Connection name from the config file, or a database path
        connection: String,

        /// Directory with <id>.up.sql / <id>.down.sql scripts
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Migration to migrate to (`0` reverts everything)
        #[arg(short, long)]
        target: Option<String>,
    },

    /// List applied migrations
    History {
        /// Connection name from the config file, or a database path
        connection: String,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable summary
    Text,
    /// The full model as JSON
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let level = cli.log_level.as_deref().unwrap_or(&settings.logging.level);
    let format = cli.log_format.as_deref().unwrap_or(&settings.logging.format);
    setup_logging(level, format);

    let result = match cli.command {
        Commands::Scaffold {
            connection,
            include,
            exclude,
            output,
        } => cmd_scaffold(&settings, &connection, include, exclude, output),
        Commands::Migrate {
            connection,
            dir,
            target,
        } => cmd_migrate(&settings, &connection, dir, target.as_deref()),
        Commands::History { connection } => cmd_history(&settings, &connection),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn setup_logging(verbosity: &str, format: &str) {
    let level = match verbosity.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

fn cmd_scaffold(
    settings: &Settings,
    connection: &str,
    include: Vec<String>,
    exclude: Vec<String>,
    output: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let connection_string = settings.resolve_connection(connection)?;

    // Command-line rules replace the configured ones
    let selection = if include.is_empty() && exclude.is_empty() {
        settings.selection.clone()
    } else {
        SelectionSettings { include, exclude }
    };
    let selection = selection.to_selection_set()?;

    let provider = SqliteMetadataModelProvider::new(SqliteExecutor::new());
    let model = provider.generate_metadata_model(&connection_string, selection.as_ref())?;

    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&model)?),
        OutputFormat::Text => print_model(&model),
    }
    Ok(())
}

fn print_model(model: &DatabaseModel) {
    if model.tables.is_empty() {
        println!("No tables selected.");
        return;
    }

    for table in &model.tables {
        println!("{} ({})", table.qualified_name(), table.entity_name);
        for column in &table.columns {
            let key = if table.primary_key.contains(&column.name) {
                " [pk]"
            } else {
                ""
            };
            let nullable = if column.is_nullable { " null" } else { "" };
            println!(
                "  {} {}{}{}",
                column.name, column.data_type, nullable, key
            );
        }
        for fk in &table.foreign_keys {
            println!(
                "  fk ({}) -> {}.{} ({})",
                fk.columns.join(", "),
                fk.principal_schema,
                fk.principal_table,
                fk.principal_columns.join(", ")
            );
        }
    }
}

fn load_migrator(
    settings: &Settings,
    dir: Option<PathBuf>,
) -> Result<Migrator<SqliteExecutor>, Box<dyn std::error::Error>> {
    let dir = dir.unwrap_or_else(|| settings.migrations.directory.clone());
    let migrations = Migration::load_dir(&dir)?;
    Ok(Migrator::new(SqliteExecutor::new(), migrations)?)
}

fn cmd_migrate(
    settings: &Settings,
    connection: &str,
    dir: Option<PathBuf>,
    target: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let connection_string = settings.resolve_connection(connection)?;
    let migrator = load_migrator(settings, dir)?;
    let mut conn = RelationalConnection::from_connection_string(&connection_string)?;

    let report = migrator.migrate(&mut conn, target)?;
    for id in &report.reverted {
        println!("reverted {}", id);
    }
    for id in &report.applied {
        println!("applied {}", id);
    }
    Ok(())
}

fn cmd_history(settings: &Settings, connection: &str) -> Result<(), Box<dyn std::error::Error>> {
    let connection_string = settings.resolve_connection(connection)?;
    // Reading the history table needs no scripts
    let migrator = Migrator::new(SqliteExecutor::new(), Vec::new())?;
    let mut conn = RelationalConnection::from_connection_string(&connection_string)?.require_existing();

    let applied = migrator.applied(&mut conn)?;
    if applied.is_empty() {
        println!("No migrations applied.");
    }
    for record in &applied {
        println!("{}  {}", record.id, record.checksum);
    }
    Ok(())
}
