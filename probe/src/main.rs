use clap::{Parser, Subcommand};
use darshana_core::config::{BASE_URL_VAR, TIMEOUT_VAR};
use darshana_core::{ApiClient, ClientConfig, HttpMethod};
use darshana_probe::{Probe, ProbeError, LOGIN_PATH};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Inspect how requests to the Darshana backend are resolved and answered.
#[derive(Parser)]
#[command(name = "darshana-probe", version)]
struct Cli {
    /// Backend base URL.
    #[arg(long, env = BASE_URL_VAR, global = true)]
    base_url: Option<String>,

    /// Request timeout in milliseconds. Invalid values fall back to the default.
    #[arg(long, env = TIMEOUT_VAR, global = true)]
    timeout_ms: Option<String>,

    /// Bearer token sent with every request.
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the URL a path resolves to, without sending anything.
    Resolve { path: String },
    /// Post credentials and print the resulting session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = LOGIN_PATH)]
        path: String,
    },
    Get { path: String },
    Delete { path: String },
    Post { path: String, body: Option<String> },
    Put { path: String, body: Option<String> },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "darshana_probe=info,darshana_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = load_config(&cli);
    tracing::debug!(base_url = config.base_url(), timeout = ?config.timeout(), "configuration loaded");

    let mut client = ApiClient::new(config);
    if let Some(token) = &cli.token {
        client = client.with_token(token);
    }

    let probe = Probe::new(client);
    if let Err(err) = run(&probe, cli.command) {
        if let ProbeError::Api(api) = &err {
            if api.has_response() {
                tracing::error!(status = ?api.status(), body = ?api.response_body(), "server responded with an error");
            } else {
                tracing::error!("request never reached the server");
            }
        }
        return Err(err.into());
    }
    Ok(())
}

/// Command-line values win; anything else comes from the environment.
fn load_config(cli: &Cli) -> ClientConfig {
    ClientConfig::from_lookup(|key| match key {
        BASE_URL_VAR => cli.base_url.clone(),
        TIMEOUT_VAR => cli.timeout_ms.clone(),
        _ => std::env::var(key).ok(),
    })
}

fn run(probe: &Probe, command: Command) -> Result<(), ProbeError> {
    let value = match command {
        Command::Resolve { path } => {
            println!("{}", probe.client().resolve(&path));
            return Ok(());
        }
        Command::Login {
            email,
            password,
            path,
        } => {
            let session = probe.login(&path, &email, &password)?;
            serde_json::json!({ "user": session.user, "token": session.token })
        }
        Command::Get { path } => probe.raw(HttpMethod::Get, &path, None)?,
        Command::Delete { path } => probe.raw(HttpMethod::Delete, &path, None)?,
        Command::Post { path, body } => probe.raw(HttpMethod::Post, &path, body.as_deref())?,
        Command::Put { path, body } => probe.raw(HttpMethod::Put, &path, body.as_deref())?,
    };
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
