//! FX CLI
//!
//! Command-line interface for the currency conversion API.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};

use fx_client::FxClient;
use fx_types::{ConversionRequest, ConversionResponse, ConversionResult, Notification, RateResponse};

#[derive(Parser)]
#[command(name = "fx")]
#[command(author, version, about = "Currency conversion CLI client", long_about = None)]
struct Cli {
    /// Base URL of the conversion API
    #[arg(long, env = "FX_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    /// Identifier sent as X-Client-Id for rate limiting
    #[arg(long, env = "FX_CLIENT_ID", default_value = "fx-cli")]
    client_id: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an amount written in plain text, e.g. `fx convert 100 dollars`
    Convert {
        /// Text containing the amount
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
        /// Target currency (server default when omitted)
        #[arg(long, short)]
        to: Option<String>,
        /// Print the raw JSON response instead of a notification
        #[arg(long)]
        json: bool,
        /// Don't ask follow-up questions when the currency is ambiguous
        #[arg(long)]
        no_prompt: bool,
    },
    /// Show the exchange rate between two currencies
    Rate {
        /// Base currency, e.g. USD
        base: String,
        /// Target currency, e.g. PLN
        target: String,
    },
    /// Check API health
    Health,
}

fn format_rate(rate: &RateResponse) -> String {
    format!("1 {} = {:.4} {}", rate.base, rate.rate, rate.target)
}

/// Asks `question` on stdout and reads one line from `input`. `None` on EOF or
/// a blank line.
async fn ask<R: AsyncBufRead + Unpin>(input: &mut R, question: &str) -> Result<Option<String>> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(format!("{} ", question).as_bytes()).await?;
    stdout.flush().await?;

    let mut line = String::new();
    input.read_line(&mut line).await?;

    let answer = line.trim();
    Ok((!answer.is_empty()).then(|| answer.to_string()))
}

async fn convert(
    client: &FxClient,
    mut req: ConversionRequest,
    json: bool,
    no_prompt: bool,
) -> Result<bool> {
    // One reader for the whole loop so buffered input survives between prompts.
    let mut stdin = BufReader::new(tokio::io::stdin());

    loop {
        let result = client.convert(&req).await?;

        let question = match &result {
            ConversionResult::Failure(f) if f.needs_clarification && !no_prompt && !json => f
                .clarification_question
                .as_deref()
                .or(Some("Which currency did you mean?")),
            _ => None,
        };

        if let Some(question) = question {
            if let Some(answer) = ask(&mut stdin, question).await? {
                req = req.clarified(&answer);
                continue;
            }
        }

        if json {
            let response = ConversionResponse::from(result.clone());
            println!("{}", serde_json::to_string_pretty(&response)?);
        } else {
            println!("{}", Notification::from(&result));
        }
        return Ok(result.is_success());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let client = FxClient::new(&cli.api_url).with_client_id(cli.client_id);

    match cli.command {
        Commands::Health => {
            let healthy = client.health().await?;
            if healthy {
                println!("✓ API is healthy");
            } else {
                println!("✗ API is not healthy");
                std::process::exit(1);
            }
        }

        Commands::Convert {
            text,
            to,
            json,
            no_prompt,
        } => {
            let mut req = ConversionRequest::new(text.join(" "));
            if let Some(to) = to {
                req = req.with_target(to);
            }
            if !convert(&client, req, json, no_prompt).await? {
                std::process::exit(1);
            }
        }

        Commands::Rate { base, target } => {
            let rate = client.rate(&base, &target).await?;
            println!("{}", format_rate(&rate));
        }
    }

    Ok(())
}
