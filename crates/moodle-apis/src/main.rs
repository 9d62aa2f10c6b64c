use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use moodle_apis::config::ServeConfig;
use moodle_apis::dataset::load_dataset;
use moodle_apis::index::CatalogIndex;
use moodle_apis::server::MoodleApisServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing to stderr (stdout is reserved for MCP JSON-RPC)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting moodle-apis MCP server");

    // 1. Load config from environment
    let config = ServeConfig::from_env()?;
    info!(
        data_file = %config.data_file,
        transport = ?config.transport,
        "configuration loaded"
    );

    // 2. Load and index the dataset
    let dataset = load_dataset(&config.data_file_path())?;
    let (index, diagnostics) = CatalogIndex::build(dataset);
    for diagnostic in &diagnostics {
        warn!(%diagnostic, "dataset diagnostic");
    }
    info!(
        apis = index.len(),
        categories = index.list_categories().len(),
        generated_at = %index.generated_at(),
        "catalogue indexed"
    );

    // 3. Build MCP server and serve
    let server = MoodleApisServer::new(Arc::new(index));
    mcp_common::transport::serve(server, config.transport).await?;
    Ok(())
}
