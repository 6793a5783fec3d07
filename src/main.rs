use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use sci::{DEFAULT_INVALID_COVERAGE, DEFAULT_VALID_COVERAGE, Pattern};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// SCI pattern, e.g. "O.(S|M).C"
    #[arg(value_name = "PATTERN")]
    pattern: String,

    /// Print accepted sequences up to N symbols beyond the shortest
    #[arg(long, value_name = "N", num_args = 0..=1)]
    valid: Option<Option<usize>>,

    /// Print rejected symbol combinations of at most N symbols
    #[arg(long, value_name = "N", num_args = 0..=1)]
    invalid: Option<Option<usize>>,

    /// Print the interaction symbols
    #[arg(short, long)]
    symbols: bool,

    /// Print the number of sequences the pattern denotes
    #[arg(long)]
    count: bool,

    /// Test a sequence for membership (repeatable)
    #[arg(short = 'c', long = "check", value_name = "SEQ")]
    checks: Vec<String>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.verbose > 0 {
        let level = match args.verbose {
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .context("Failed to set tracing subscriber")?;
    }

    let pattern = Pattern::compile(&args.pattern)
        .with_context(|| format!("Failed to compile {:?}", args.pattern))?;

    let any_action = args.valid.is_some()
        || args.invalid.is_some()
        || args.symbols
        || args.count
        || !args.checks.is_empty();

    if args.symbols {
        println!("{}", pattern.interaction_symbols().join(" "));
    }
    if args.count {
        println!("{}", pattern.language_size()?);
    }
    let valid = match args.valid {
        Some(n) => Some(n.unwrap_or(DEFAULT_VALID_COVERAGE)),
        None if !any_action => Some(DEFAULT_VALID_COVERAGE),
        None => None,
    };
    if let Some(n) = valid {
        for sequence in pattern.valid_sequences(n)? {
            println!("{sequence}");
        }
    }
    if let Some(n) = args.invalid.map(|n| n.unwrap_or(DEFAULT_INVALID_COVERAGE)) {
        for sequence in pattern.invalid_sequences(n)? {
            println!("{sequence}");
        }
    }
    for check in &args.checks {
        let verdict = if pattern.check_sequence(check)? {
            "valid"
        } else {
            "invalid"
        };
        println!("{check}: {verdict}");
    }
    Ok(())
}
