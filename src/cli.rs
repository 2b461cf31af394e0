//! Command-line entry points: the HTTP service and a one-shot triage
//! run for manual checks.

use clap::{Args, Parser, Subcommand};
use serde_json::json;

use crate::agent::{responses, Catalog};
use crate::agent::intents;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::http::{self, ServeOverrides};
use crate::triage::{self, Lexicon};

#[derive(Parser, Debug)]
#[command(
    name = "Ventas AI",
    about = "Run the food-distribution sales assistant from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Triage one message and print the decision as JSON
    Triage(TriageArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct TriageArgs {
    /// Customer message to evaluate
    message: String,
}

pub async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => {
            http::run(ServeOverrides {
                host: args.host,
                port: args.port,
            })
            .await
        }
        Command::Triage(args) => run_triage(args),
    }
}

/// Evaluate one message end to end and print what the service would
/// answer, including the scoring rationale.
fn run_triage(args: TriageArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    Lexicon::load()?;
    let catalog = Catalog::from_path(&config.data.catalog_path)?;

    let decision = triage::evaluate(&args.message);
    let reply = responses::build_reply(&args.message, &decision, &catalog);

    let output = json!({
        "agent_response": reply.text,
        "should_escalate": reply.escalate,
        "summary": responses::build_summary(&args.message, &reply.text),
        "intent": intents::detect_intent(&args.message),
        "purchase_intent": intents::detect_purchase_intent(&args.message),
        "triage": decision.rationale,
    });
    println!("{}", serde_json::to_string_pretty(&output).map_err(std::io::Error::other)?);
    Ok(())
}
