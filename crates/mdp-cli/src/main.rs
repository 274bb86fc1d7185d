/// MDP command-line tool: inspect, validate and build CME MDP 3.0 packets
/// and bare SBE messages.
///
/// # Command overview
///
/// ```text
/// mdp <COMMAND> [OPTIONS]
///
/// Commands:
///   inspect    Decode a packet and print every field of every message
///   validate   Check that a packet decodes completely
///   schema     List the built-in templates and their field layouts
///   encode     Build a packet from a JSON manifest
///   help       Print help information
///
/// Global options:
///   -v, --verbose    Raise log verbosity (repeat for more)
///   -h, --help       Print help
///   -V, --version    Print version
/// ```
///
/// # Exit codes
///
/// | Code | Meaning                                   |
/// |------|-------------------------------------------|
/// | 0    | Success                                   |
/// | 1    | Error (I/O failure, undecodable input...) |
///
/// Logs and error details go to stderr so stdout can be piped cleanly.
/// `RUST_LOG` overrides the level picked by `-v`.
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd_encode;
mod cmd_inspect;
mod cmd_schema;
mod cmd_validate;
mod input;

// ── CLI root ──────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "mdp", version, about = "CME MDP 3.0 / SBE decoder CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Raise log verbosity: -v info, -vv debug, -vvv trace.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Decode a packet (or bare message) and print every field.
    Inspect(InspectArgs),
    /// Check that a packet (or bare message) decodes completely.
    Validate(ValidateArgs),
    /// List the built-in templates, or one template's layout.
    Schema(SchemaArgs),
    /// Build a packet (or bare message) from a JSON manifest.
    Encode(EncodeArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Input options shared by `inspect` and `validate`.
///
/// ```text
/// ┌──────────────┬──────────────────────────────────────────────────────┐
/// │ Flag         │ Effect                                               │
/// ├──────────────┼──────────────────────────────────────────────────────┤
/// │ --hex        │ File holds hex text (whitespace ignored), not bytes  │
/// │ --message    │ File is one SBE message with no packet framing       │
/// │ --any-schema │ Accept messages from any schema id                   │
/// │ --strict     │ Fail on unknown templates instead of skipping them   │
/// └──────────────┴──────────────────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct InputArgs {
    /// Path to the capture to decode.
    pub file: PathBuf,

    /// Read the file as hex text.
    #[arg(long)]
    pub hex: bool,

    /// Treat the input as a single SBE message rather than a packet.
    #[arg(long)]
    pub message: bool,

    /// Do not check the schema id in message headers.
    #[arg(long)]
    pub any_schema: bool,

    /// Reject templates without a built-in field table.
    #[arg(long)]
    pub strict: bool,
}

#[derive(clap::Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(clap::Args)]
pub struct SchemaArgs {
    /// Show the field layout of this template id.
    #[arg(long)]
    pub template: Option<u16>,
}

/// Arguments for `mdp encode`.
///
/// The manifest lists messages to encode by template id; see
/// `cmd_encode` for the format.
#[derive(clap::Args)]
pub struct EncodeArgs {
    /// Path to the JSON manifest.
    pub input: PathBuf,

    /// Output file path.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Write hex text instead of raw bytes.
    #[arg(long)]
    pub hex: bool,

    /// Write the single manifest message without packet framing.
    #[arg(long)]
    pub message: bool,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Inspect(args) => cmd_inspect::run(&args),
        Commands::Validate(args) => cmd_validate::run(&args),
        Commands::Schema(args) => cmd_schema::run(&args),
        Commands::Encode(args) => cmd_encode::run(&args),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
