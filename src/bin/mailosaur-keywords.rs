//! `mailosaur-keywords` -- run Mailosaur email assertions from the shell.
//!
//! - `mailosaur-keywords list` -- Show the available keywords.
//! - `mailosaur-keywords run <KEYWORD> [ARGS..]` -- Run one keyword against
//!   the last email on the server domain.
//!
//! Exits with status 0 when the keyword passes and 1 otherwise.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use mailosaur_keywords::observability::{LogFormat, LogLevel, LoggingConfig};
use mailosaur_keywords::{
    KeywordError, MailosaurClient, MailosaurKeywords, KEYWORDS, LIBRARY_SCOPE, LIBRARY_VERSION,
};

/// Mailosaur email assertion keywords.
#[derive(Parser)]
#[command(name = "mailosaur-keywords", about = "Mailosaur email assertion keywords", version)]
struct Cli {
    /// Mailosaur API key.
    #[arg(long, env = "MAILOSAUR_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Server ID from the Mailosaur dashboard.
    #[arg(long, env = "MAILOSAUR_SERVER_ID", global = true)]
    server_id: Option<String>,

    /// Server domain from the Mailosaur dashboard.
    #[arg(long, env = "MAILOSAUR_SERVER_DOMAIN", global = true)]
    server_domain: Option<String>,

    /// API base URL.
    #[arg(long, env = "MAILOSAUR_BASE_URL", global = true)]
    base_url: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Log format (pretty, json, compact).
    #[arg(long, default_value = "pretty", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the available keywords.
    List,

    /// Run a keyword by name.
    Run {
        /// Keyword name, e.g. "Email Subject Should Match".
        keyword: String,

        /// Keyword arguments in order.
        args: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = LoggingConfig::new()
        .with_level(cli.log_level)
        .with_format(cli.log_format)
        .init()
    {
        eprintln!("failed to initialize logging: {e}");
    }

    match cli.command {
        Command::List => {
            print_keywords();
            ExitCode::SUCCESS
        }
        Command::Run {
            ref keyword,
            ref args,
        } => match run(&cli, keyword, args).await {
            Ok(()) => {
                println!("PASS {keyword}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("FAIL {keyword}: {e}");
                ExitCode::FAILURE
            }
        },
    }
}

fn print_keywords() {
    println!("Mailosaur keywords {LIBRARY_VERSION} (scope {LIBRARY_SCOPE})");
    for spec in KEYWORDS {
        println!();
        println!("{}    {}", spec.name, spec.signature());
        println!("    {}", spec.doc);
    }
}

async fn run(cli: &Cli, keyword: &str, args: &[String]) -> Result<(), KeywordError> {
    let api_key = required(cli.api_key.as_deref(), "--api-key / MAILOSAUR_API_KEY")?;
    let server_id = required(cli.server_id.as_deref(), "--server-id / MAILOSAUR_SERVER_ID")?;
    let server_domain = required(
        cli.server_domain.as_deref(),
        "--server-domain / MAILOSAUR_SERVER_DOMAIN",
    )?;

    let mut builder = MailosaurClient::builder().api_key(api_key);
    if let Some(base_url) = &cli.base_url {
        builder = builder.base_url(base_url);
    }
    let client = builder.build()?;

    let mut keywords = MailosaurKeywords::with_client(client, server_id, server_domain);
    keywords.run_keyword(keyword, args).await
}

fn required<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str, KeywordError> {
    value.filter(|v| !v.is_empty()).ok_or_else(|| {
        mailosaur_keywords::MailosaurError::configuration(format!("{name} is required")).into()
    })
}
