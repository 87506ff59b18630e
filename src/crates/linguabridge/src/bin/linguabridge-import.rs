//! Batch import of legacy CRM exports into the agency database
//!
//! ```text
//! linguabridge-import linguists --file linguists.tsv
//! linguabridge-import customers --file customers.csv --delimiter comma
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use linguabridge::config::ServerConfig;
use linguabridge::db::DatabaseConnection;
use linguabridge::import::{self, Delimiter, ImportKind};

#[derive(Debug, Parser)]
#[command(name = "linguabridge-import", version, about = "Import linguists or customers from a CRM export")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// SQLite database file; defaults to `[database] path` from the server config
    #[arg(long, global = true, env = "LINGUABRIDGE_DATABASE")]
    database: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Import linguists (translators and interpreters)
    Linguists(ImportArgs),
    /// Import customers
    Customers(ImportArgs),
}

#[derive(Debug, clap::Args)]
struct ImportArgs {
    /// Export file to read
    #[arg(long, short)]
    file: PathBuf,

    /// Field separator; guessed from the file extension when omitted
    #[arg(long, value_enum)]
    delimiter: Option<DelimiterArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DelimiterArg {
    Tab,
    Comma,
}

impl From<DelimiterArg> for Delimiter {
    fn from(arg: DelimiterArg) -> Self {
        match arg {
            DelimiterArg::Tab => Delimiter::Tab,
            DelimiterArg::Comma => Delimiter::Comma,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt().with_env_filter(rust_log).init();

    let cli = Cli::parse();

    let database_url = match cli.database {
        Some(path) => format!("sqlite://{}", path.display()),
        None => ServerConfig::load()
            .context("could not load server configuration")?
            .database_url(),
    };

    let (kind, args) = match cli.command {
        Command::Linguists(args) => (ImportKind::Linguists, args),
        Command::Customers(args) => (ImportKind::Customers, args),
    };
    let delimiter = args
        .delimiter
        .map(Delimiter::from)
        .unwrap_or_else(|| Delimiter::from_path(&args.file));

    tracing::info!("Connecting to database: {}", database_url);
    let db = DatabaseConnection::new(&database_url).await?;
    db.run_migrations().await?;

    let summary = import::import_file(db.pool(), kind, &args.file, delimiter)
        .await
        .with_context(|| format!("import of {} failed", args.file.display()))?;

    println!(
        "imported: {}\nskipped:  {}\nfailed:   {}",
        summary.imported, summary.skipped, summary.failed
    );
    db.close().await;
    Ok(())
}
