use clap::{Parser, Subcommand};
use memodb::lens::memo::{
    MemoAddArgs, MemoChangesArgs, MemoListArgs, MemoSearchArgs, MemoUpdateArgs,
};
use memodb::*;
use tracing::Level;

mod commands;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// configuration file path, by default $HOME/.memodb/memodb.toml is used
    #[clap(long)]
    config: Option<String>,

    /// Print debug information
    #[clap(long)]
    debug: bool,

    /// Output format: table, markdown, json, json-pretty, json-line, psv
    #[clap(long, default_value = "table")]
    format: OutputFormat,

    /// Use this database file instead of the configured one
    #[clap(long)]
    db: Option<String>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a memo
    Add(MemoAddArgs),

    /// Show one memo in full
    Get {
        /// Memo id
        id: i64,
    },

    /// Change fields of a memo
    Update(MemoUpdateArgs),

    /// Delete a memo (it stays visible to `changes`)
    Delete {
        /// Memo id
        id: i64,
    },

    /// List memos
    List(MemoListArgs),

    /// Count live memos
    Count,

    /// Search memo titles
    Search(MemoSearchArgs),

    /// Print live memo ids in sort order
    Indexes(MemoListArgs),

    /// Show memos added, updated or deleted since a point in time
    Changes(MemoChangesArgs),

    /// Show configuration and database status
    Status,
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            // filter spans/events with level INFO or higher.
            .with_max_level(Level::INFO)
            .init();
    }

    let mut config = match MemoConfig::new(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(db) = cli.db {
        config.database_path = Some(db);
    }

    if let Err(e) = run(&config, cli.command, cli.format) {
        eprintln!("ERROR: {}", e);
        std::process::exit(1);
    }
}

fn run(config: &MemoConfig, command: Commands, output_format: OutputFormat) -> anyhow::Result<()> {
    use commands::memo;

    // `status` inspects the database without creating it
    if let Commands::Status = command {
        commands::status::run(config, output_format);
        return Ok(());
    }
    let db = config.open_database()?;

    match command {
        Commands::Add(args) => memo::add(&db, &args, output_format),
        Commands::Get { id } => memo::get(&db, id, output_format),
        Commands::Update(args) => memo::update(&db, &args, output_format),
        Commands::Delete { id } => memo::delete(&db, id),
        Commands::List(args) => memo::list(&db, &args, output_format),
        Commands::Count => memo::count(&db, output_format),
        Commands::Search(args) => memo::search(&db, &args, config.search_limit, output_format),
        Commands::Indexes(args) => memo::indexes(&db, &args, output_format),
        Commands::Changes(args) => memo::changes(&db, &args, output_format),
        Commands::Status => Ok(()),
    }
}
