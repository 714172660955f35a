#![forbid(unsafe_code)]

mod cmd;
mod output;
mod session;
mod store_file;

use clap::{Parser, Subcommand};
use output::OutputMode;
use session::Session;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "lugnut: spare-parts order tracking for vehicle workshops",
    long_about = None
)]
struct Cli {
    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Workshop data directory (defaults to the nearest `.lugnut`).
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Create a new part order")]
    Add(cmd::add::AddArgs),

    #[command(about = "List records, optionally for one stage")]
    List(cmd::list::ListArgs),

    #[command(about = "Commit orders onto the main sheet (strict validation)")]
    Commit(cmd::commit::CommitArgs),

    #[command(about = "Book records in for fitting")]
    Book(cmd::book::BookArgs),

    #[command(about = "Move records onto the call list")]
    Call(cmd::call::CallArgs),

    #[command(about = "Archive records with an optional reason")]
    Archive(cmd::archive::ArchiveArgs),

    #[command(about = "Send records back to orders for reordering")]
    Reorder(cmd::reorder::ReorderArgs),

    #[command(about = "Update a part or booking status")]
    Status(cmd::status::StatusArgs),

    #[command(about = "Set or clear a record's reminder")]
    Remind(cmd::remind::RemindArgs),

    #[command(about = "Reconcile and manage reminder notifications")]
    Notify(cmd::notify::NotifyArgs),

    #[command(about = "Show or edit status vocabularies and templates")]
    Vocab(cmd::vocab::VocabArgs),

    #[command(
        about = "Interactive session",
        long_about = "Interactive session. Undo/redo, the history ledger, and \
                      grace windows are session-scoped, so this is where they \
                      are observable."
    )]
    Shell,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    if let Err(err) = run(&cli, mode) {
        output::render_error(&err, mode);
        std::process::exit(1);
    }
}

fn run(cli: &Cli, mode: OutputMode) -> anyhow::Result<()> {
    let mut session = Session::open(cli.dir.clone())?;
    tracing::debug!(dir = %session.dir.display(), "session opened");
    match &cli.command {
        Commands::Add(args) => cmd::add::run(&mut session, args, mode),
        Commands::List(args) => cmd::list::run(&session, args, mode),
        Commands::Commit(args) => cmd::commit::run(&mut session, args, mode),
        Commands::Book(args) => cmd::book::run(&mut session, args, mode),
        Commands::Call(args) => cmd::call::run(&mut session, args, mode),
        Commands::Archive(args) => cmd::archive::run(&mut session, args, mode),
        Commands::Reorder(args) => cmd::reorder::run(&mut session, args, mode),
        Commands::Status(args) => cmd::status::run(&mut session, args, mode),
        Commands::Remind(args) => cmd::remind::run(&mut session, args, mode),
        Commands::Notify(args) => cmd::notify::run(&mut session, args, mode),
        Commands::Vocab(args) => cmd::vocab::run(&mut session, args, mode),
        Commands::Shell => cmd::shell::run(&mut session),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("LUGNUT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
