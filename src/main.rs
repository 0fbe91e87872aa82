use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use rmcp::{ServiceExt, transport::stdio};
use std::{io::IsTerminal, path::PathBuf, sync::Arc};
use tracing_subscriber::{self, EnvFilter};

mod config;
mod context;
mod format;
mod koleo;
mod server;
mod tools;

use context::ClientContext;
use server::KoleoServer;

const AFTER_HELP: &str = "\
MCP Server Information:
    This is an MCP (Model Context Protocol) server that automatically detects
    when started by an MCP client (via piped stdin) and enters server mode.

    For MCP Inspector:
      npx @modelcontextprotocol/inspector <path-to-koleo-mcp>

    Credentials for realtime data are read from ~/.config/koleo-mcp/config.json:
      {\"email\": \"your@email.com\", \"password\": \"yourpassword\"}

    Note: The 'serve' command is optional - auto-detection handles most cases.";

#[derive(Parser)]
#[command(name = "koleo-mcp")]
#[command(about = "Koleo MCP Server - Polish railway timetables, connections and seats", long_about = None)]
#[command(version)]
#[command(after_help = AFTER_HELP)]
struct Cli {
    /// Path to the JSON config file
    #[arg(long, global = true, env = "KOLEO_MCP_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the MCP server (listens on stdin/stdout)
    Serve,

    /// List available resources
    #[command(subcommand)]
    List(ListCommands),

    #[command(hide = true)]
    Version,
}

#[derive(Subcommand)]
enum ListCommands {
    /// List all available tools
    Tools,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let context = Arc::new(ClientContext::from_config_path(cli.config));

    match cli.command {
        Some(Commands::List(ListCommands::Tools)) => {
            KoleoServer::new(context).list_tools();
            Ok(())
        }
        Some(Commands::Serve) => start_mcp_server(context).await,
        Some(Commands::Version) => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        None => {
            if std::io::stdin().is_terminal() {
                let mut cmd = Cli::command();
                let _ = cmd.print_help();
                Ok(())
            } else {
                start_mcp_server(context).await
            }
        }
    }
}

async fn start_mcp_server(context: Arc<ClientContext>) -> Result<()> {
    tracing::info!("Koleo MCP Server starting");

    let service = KoleoServer::new(context)
        .serve(stdio())
        .await
        .inspect_err(|e| {
            tracing::error!("serving error: {:?}", e);
        })?;

    service.waiting().await?;
    Ok(())
}
