#![warn(clippy::pedantic)]

use std::net::SocketAddr;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use porkbun_mcp::config::Settings;
use porkbun_mcp::PorkbunServer;
use rmcp::{
    transport::{sse_server::SseServer, stdio},
    ServiceExt,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Transport {
    Stdio,
    Sse,
}

#[derive(Debug, Parser)]
#[command(name = "porkbun-mcp", version, about = "MCP server for the Porkbun domain registrar API")]
struct Args {
    /// Transport to serve on.
    #[arg(long, value_enum, default_value = "stdio")]
    transport: Transport,

    /// Enable write operations. Without this flag the server is read-only.
    #[arg(long)]
    get_muddy: bool,

    /// Listen address for the SSE transport.
    #[arg(long, default_value = "127.0.0.1:8000")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let args = Args::parse();
    let settings = Settings::resolve(args.get_muddy);

    if settings.get_muddy {
        tracing::warn!("write operations ENABLED");
    } else {
        tracing::info!("running read-only; pass --get-muddy to enable write operations");
    }

    let server = PorkbunServer::new(&settings);

    match args.transport {
        Transport::Stdio => {
            tracing::info!("Starting Porkbun MCP Server on stdio");
            let service = server.serve(stdio()).await.inspect_err(|e| {
                tracing::error!("serving error: {:?}", e);
            })?;
            service.waiting().await?;
        }
        Transport::Sse => {
            tracing::info!("Starting Porkbun MCP Server on http://{}/sse", args.bind);
            let ct = SseServer::serve(args.bind)
                .await?
                .with_service(move || server.clone());
            tokio::signal::ctrl_c().await?;
            ct.cancel();
        }
    }

    Ok(())
}
