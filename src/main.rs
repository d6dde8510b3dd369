use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use lunch::token::now_secs;
use lunch::{AuthError, AuthService, ClientConfig, Credentials, FileStorage, HttpAuthApi, RouteTable};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("missing password; pass --password, set LUNCH_PASSWORD, or pipe it on stdin")]
    MissingPassword,
    #[error("no route for `{0}`")]
    UnknownRoute(String),
    #[error("could not read stdin: {0}")]
    Stdin(#[from] io::Error),
    #[error("output encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// `--base-url` and `--token-file` override `LUNCH_API_BASE_URL` and
/// `LUNCH_TOKEN_FILE`, which `ClientConfig::from_env` reads.
#[derive(Parser, Debug)]
#[command(name = "lunch", about = "Session client for the lets-get-lunch API")]
struct Cli {
    #[arg(long)]
    base_url: Option<String>,

    #[arg(long)]
    token_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account and log in with it.
    Signup(CredentialArgs),
    /// Log in and store the session token.
    Login(CredentialArgs),
    /// Forget the stored session token.
    Logout,
    /// Report whether a session token is stored.
    Status,
    /// Print the claims of the stored session token.
    Whoami,
    /// Show which feature a path routes to.
    Route { path: String },
}

#[derive(Args, Debug)]
struct CredentialArgs {
    #[arg(long)]
    username: String,

    #[arg(long, env = "LUNCH_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = apply_overrides(ClientConfig::from_env(), cli.base_url.as_deref(), cli.token_file);

    match cli.command {
        Command::Route { path } => run_route(&path),
        command => {
            let service = build_service(&config)?;
            run_session(&service, command).await
        }
    }
}

fn apply_overrides(mut config: ClientConfig, base_url: Option<&str>, token_file: Option<PathBuf>) -> ClientConfig {
    if let Some(base_url) = base_url {
        config = config.with_base_url(base_url);
    }
    if let Some(token_file) = token_file {
        config = config.with_token_file(token_file);
    }
    config
}

fn build_service(config: &ClientConfig) -> Result<AuthService, CliError> {
    let api = HttpAuthApi::new(config)?;
    let storage = FileStorage::new(config.token_file.clone());
    tracing::debug!(base_url = api.base_url(), token_file = %storage.path().display(), "session client ready");
    Ok(AuthService::new(Arc::new(api), Arc::new(storage)))
}

async fn run_session(service: &AuthService, command: Command) -> Result<(), CliError> {
    match command {
        Command::Signup(args) => {
            let creds = credentials(args, &mut io::stdin().lock())?;
            service.signup(&creds).await?;
            println!("signed up and logged in as {}", creds.username);
        }
        Command::Login(args) => {
            let creds = credentials(args, &mut io::stdin().lock())?;
            service.login(&creds).await?;
            println!("logged in as {}", creds.username);
        }
        Command::Logout => {
            service.logout()?;
            println!("logged out");
        }
        Command::Status => println!("{}", status_line(service, now_secs())?),
        Command::Whoami => {
            let user = service.current_user()?;
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
        Command::Route { path } => run_route(&path)?,
    }
    Ok(())
}

fn run_route(path: &str) -> Result<(), CliError> {
    let table = RouteTable::app();
    let feature = table.resolve(path).ok_or_else(|| CliError::UnknownRoute(path.to_owned()))?;
    println!("{} ({})", feature.name(), feature.title());
    Ok(())
}

/// One-line session summary. A stored token that cannot be decoded is
/// reported as such; storage failures are returned.
fn status_line(service: &AuthService, now: i64) -> Result<&'static str, AuthError> {
    if service.token()?.is_none() {
        return Ok("logged out");
    }
    match service.session_expired(now) {
        Ok(true) => Ok("logged in (token expired)"),
        Ok(false) => Ok("logged in"),
        Err(AuthError::Token(e)) => {
            tracing::warn!(error = %e, "stored token is not decodable");
            Ok("logged in (token unreadable)")
        }
        Err(e) => Err(e),
    }
}

fn credentials(args: CredentialArgs, input: &mut impl BufRead) -> Result<Credentials, CliError> {
    let password = match args.password {
        Some(password) => password,
        None => read_password_line(input)?,
    };
    if password.is_empty() {
        return Err(CliError::MissingPassword);
    }
    Ok(Credentials::new(args.username, password))
}

fn read_password_line(input: &mut impl BufRead) -> Result<String, CliError> {
    eprint!("password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
