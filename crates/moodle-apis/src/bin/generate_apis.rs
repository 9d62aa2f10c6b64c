use chrono::Utc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use moodle_apis::catalog::build_dataset;
use moodle_apis::config::GenerateConfig;
use moodle_apis::dataset::write_dataset;
use moodle_apis::error::AppError;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = GenerateConfig::from_env()?;
    info!(
        source_html = %config.source_html,
        source_url = %config.source_url,
        data_file = %config.data_file,
        "generating catalogue"
    );

    let html = std::fs::read_to_string(&config.source_html).map_err(|e| {
        AppError::Config(format!("failed to read {}: {e}", config.source_html))
    })?;
    let dataset = build_dataset(&html, &config.source_url, Utc::now())?;
    write_dataset(&config.data_file_path(), &dataset)?;

    info!(
        apis = dataset.count,
        generated_at = %dataset.generated_at,
        "catalogue generated"
    );
    Ok(())
}
