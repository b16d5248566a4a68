use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Parser;
use game_rest::{Config, RestClient, RestResponse};
use log::warn;

/// game-rest - call a game backend's REST endpoint
///
/// Sends one GET or POST request and prints the response body. On failure the
/// diagnostic record (error message, status code, connection status) is printed
/// to stderr as JSON.
///
/// If the GAME_REST_TOKEN environment variable is set, it is sent as the auth token.
///
/// Examples:
///   game-rest --endpoint https://api.example.com get /scores page=2
#[derive(Parser, Debug)]
#[command(author, version = env!("GAME_REST_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base endpoint URL (also via GAME_REST_ENDPOINT)
    #[arg(long, env = "GAME_REST_ENDPOINT", value_name = "URL", global = true)]
    pub endpoint: Option<String>,

    /// Query string sent with every request, e.g. "key=abc"
    #[arg(
        long,
        env = "GAME_REST_QUERY",
        value_name = "QUERY",
        default_value = "",
        global = true
    )]
    pub query: String,

    /// Auth token (also via GAME_REST_TOKEN)
    #[arg(
        long,
        env = "GAME_REST_TOKEN",
        value_name = "TOKEN",
        hide_env_values = true,
        global = true
    )]
    pub token: Option<String>,

    /// Prefix placed before the token in the Authorization header
    #[arg(long, value_name = "PREFIX", default_value = "Bearer ", global = true)]
    pub auth_prefix: String,

    /// Send the token and refuse to run without one
    #[arg(long, global = true)]
    pub require_auth: bool,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Send a GET request
    Get(GetArgs),

    /// POST a JSON document
    Post(PostArgs),
}

#[derive(clap::Args, Debug)]
pub struct GetArgs {
    /// Request path, e.g. "/scores"
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Extra query parameters in "name=value" form
    #[arg(value_name = "PARAM")]
    pub params: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct PostArgs {
    /// Request path, e.g. "/scores"
    #[arg(value_name = "PATH")]
    pub path: String,

    /// JSON body
    #[arg(long, short = 'd', value_name = "JSON", conflicts_with = "file")]
    pub data: Option<String>,

    /// Read the JSON body from a file
    #[arg(long, short = 'f', value_name = "FILE")]
    pub file: Option<PathBuf>,
}

impl Cli {
    fn config(&self) -> Result<Config> {
        let endpoint = self
            .endpoint
            .clone()
            .filter(|e| !e.is_empty())
            .context("End point URL not specified. Use --endpoint or GAME_REST_ENDPOINT.")?;

        let mut config = Config::new(endpoint, self.query.clone()).with_token(self.token.clone());
        if self.require_auth {
            config = config.with_auth(self.auth_prefix.clone());
        }
        Ok(config)
    }
}

fn read_body(args: &PostArgs) -> Result<String> {
    match (&args.data, &args.file) {
        (Some(data), _) => Ok(data.clone()),
        (None, Some(file)) => std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read request body from {:?}", file)),
        (None, None) => Ok(String::new()),
    }
}

fn report(response: &RestResponse) -> Result<ExitCode> {
    if response.request_failed() {
        let diagnostics = response
            .diagnostic_info_json()
            .context("Failed to serialize diagnostics")?;
        eprintln!("{}", diagnostics);
        if response.request_was_unauthorized() {
            eprintln!("The auth token was rejected; obtain a new one.");
        } else if !response.connection_status.reached_server() {
            eprintln!("The server could not be reached.");
        }
        return Ok(ExitCode::FAILURE);
    }

    if !response.body.is_empty() {
        println!("{}", response.body);
    }
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let mut client = RestClient::new(cli.config()?)?;
    client.add_network_error_listener(|response: &RestResponse| {
        warn!(
            "Network error: {}",
            response.error_message.as_deref().unwrap_or("unknown")
        );
    });

    if !client.has_valid_auth_token() {
        bail!("An auth token is required. Use --token or GAME_REST_TOKEN.");
    }

    let response = match &cli.command {
        Commands::Get(args) => client.get(&args.path, &args.params).await,
        Commands::Post(args) => client.post_json(&args.path, &read_body(args)?).await,
    };

    report(&response)
}
