use clap::{Parser, Subcommand};
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "viewer-cli")]
#[command(about = "Command-line client for the SQLite table viewer", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log this machine in
    Login { username: String, password: String },
    /// Log this machine out
    Logout,
    /// List the tables visible to this machine
    Tables,
    /// Dump every row of a table
    Table { name: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    // Redirects carry meaning (login required / access denied); report them instead of following.
    let client = reqwest::Client::builder().redirect(Policy::none()).build()?;
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Login { username, password } => {
            client
                .post(format!("{base}/login"))
                .json(&json!({ "username": username, "password": password }))
                .send()
                .await?
        }
        Commands::Logout => client.post(format!("{base}/logout")).send().await?,
        Commands::Tables => client.get(format!("{base}/")).send().await?,
        Commands::Table { name } => client.get(format!("{base}/{name}")).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if status.is_redirection() {
        let location = res
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        match location {
            "/login" => eprintln!("Not logged in. Run `viewer-cli login <username> <password>` first."),
            "/" => eprintln!("Access to this table is denied."),
            other => eprintln!("Redirected to {other}"),
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    if status != StatusCode::OK {
        eprintln!("Error: viewer returned status {status}");
    }
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
