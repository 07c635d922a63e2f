use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Url;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "proxy-cli")]
#[command(about = "Management CLI for registry-proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:8081")]
    url: String,

    #[arg(short, long, env = "REGISTRY_PROXY_ADMIN_KEY")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check proxy status and route table size
    Status,
    /// List every routing key and its backend
    Routes,
    /// Ask whether a host may be issued a certificate
    Domain {
        /// Host name, e.g. git.example.com
        host: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
    );

    let url = match &cli.command {
        Commands::Status => admin_url(&cli.url, &["status"])?,
        Commands::Routes => admin_url(&cli.url, &["routes"])?,
        Commands::Domain { host } => admin_url(&cli.url, &["domains", host])?,
    };

    let res = client
        .get(url)
        .headers(headers)
        .send()
        .await?;
    print_response(res).await
}

/// `<base>/admin/<segments...>`, each segment percent-encoded.
fn admin_url(base: &str, segments: &[&str]) -> Result<Url, Box<dyn std::error::Error>> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| format!("{base} cannot be used as an admin URL"))?
        .pop_if_empty()
        .push("admin")
        .extend(segments);
    Ok(url)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    // The domain check answers 403 with a JSON body worth printing.
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => eprintln!("Error: Admin API returned status {status}: {text}"),
    }
    if !status.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
