/// Transport selection and serving loops shared by MCP server binaries.
///
/// Three transports are supported:
/// - stdio (default): a single session over stdin/stdout
/// - raw TCP (`MCP_TCP_LISTEN_ADDR`): one session per accepted connection
/// - streamable HTTP (`MCP_HTTP_LISTEN_ADDR`): `POST /mcp`, anything else is a JSON 404
use axum::{Json, Router, http::StatusCode};
use rmcp::{
    ServerHandler, ServiceExt,
    transport::stdio,
    transport::streamable_http_server::{
        StreamableHttpService, session::local::LocalSessionManager,
    },
};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::error::CommonError;

const TCP_ADDR_VAR: &str = "MCP_TCP_LISTEN_ADDR";
const HTTP_ADDR_VAR: &str = "MCP_HTTP_LISTEN_ADDR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    Stdio,
    Tcp(String),
    Http(String),
}

impl Transport {
    /// Reads `MCP_TCP_LISTEN_ADDR` and `MCP_HTTP_LISTEN_ADDR`. Setting both is an error.
    pub fn from_env() -> Result<Self, CommonError> {
        Self::select(
            std::env::var(TCP_ADDR_VAR).ok(),
            std::env::var(HTTP_ADDR_VAR).ok(),
        )
    }

    fn select(tcp: Option<String>, http: Option<String>) -> Result<Self, CommonError> {
        let tcp = tcp.filter(|addr| !addr.trim().is_empty());
        let http = http.filter(|addr| !addr.trim().is_empty());
        match (tcp, http) {
            (Some(_), Some(_)) => Err(CommonError::Transport(format!(
                "{TCP_ADDR_VAR} and {HTTP_ADDR_VAR} are mutually exclusive"
            ))),
            (Some(addr), None) => Ok(Self::Tcp(addr)),
            (None, Some(addr)) => Ok(Self::Http(addr)),
            (None, None) => Ok(Self::Stdio),
        }
    }
}

/// Serve `server` on the selected transport until the client (or process) goes away.
pub async fn serve<S>(server: S, transport: Transport) -> Result<(), CommonError>
where
    S: ServerHandler + Clone + Send + Sync + 'static,
{
    match transport {
        Transport::Stdio => serve_stdio(server).await,
        Transport::Tcp(addr) => serve_tcp(server, &addr).await,
        Transport::Http(addr) => serve_http(server, &addr).await,
    }
}

async fn serve_stdio<S>(server: S) -> Result<(), CommonError>
where
    S: ServerHandler + Clone + Send + Sync + 'static,
{
    info!("MCP server ready, serving on stdio");
    let service = server.serve(stdio()).await.map_err(|e| {
        error!(error = %e, "MCP server error");
        CommonError::Transport(e.to_string())
    })?;
    service
        .waiting()
        .await
        .map_err(|e| CommonError::Transport(e.to_string()))?;
    info!("MCP server shut down");
    Ok(())
}

async fn serve_tcp<S>(server: S, addr: &str) -> Result<(), CommonError>
where
    S: ServerHandler + Clone + Send + Sync + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    info!(listen_addr = %addr, "MCP server ready, serving on TCP");
    loop {
        let (stream, peer) = listener.accept().await?;
        let server = server.clone();
        tokio::spawn(async move {
            info!(peer = %peer, "MCP client connected");
            let service = match server.serve(stream).await {
                Ok(service) => service,
                Err(e) => {
                    error!(peer = %peer, error = %e, "MCP server error");
                    return;
                }
            };
            if let Err(e) = service.waiting().await {
                error!(peer = %peer, error = %e, "MCP session task failed");
            }
            info!(peer = %peer, "MCP client disconnected");
        });
    }
}

async fn serve_http<S>(server: S, addr: &str) -> Result<(), CommonError>
where
    S: ServerHandler + Clone + Send + Sync + 'static,
{
    let service = StreamableHttpService::new(
        move || Ok(server.clone()),
        LocalSessionManager::default().into(),
        Default::default(),
    );
    let router = Router::new()
        .nest_service("/mcp", service)
        .fallback(unknown_endpoint);

    let listener = TcpListener::bind(addr).await?;
    info!(listen_addr = %addr, "MCP server ready, serving streamable HTTP on /mcp");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("MCP server shut down");
    Ok(())
}

async fn unknown_endpoint() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Unknown endpoint. Use POST /mcp for MCP requests." })),
    )
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }
}
