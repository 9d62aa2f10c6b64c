use std::path::{Path, PathBuf};

use mcp_common::transport::Transport;
use url::Url;

use crate::catalog::DEFAULT_SOURCE_URL;
use crate::error::AppError;

const DEFAULT_DATA_FILE: &str = "data/apis.json";

/// Server configuration loaded explicitly from environment variables.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    /// Path to the dataset JSON written by `generate-apis`.
    pub data_file: String,
    pub transport: Transport,
}

impl ServeConfig {
    /// Optional:
    /// - `MOODLE_APIS_DATA_FILE`: dataset path (default: "data/apis.json")
    /// - `MCP_TCP_LISTEN_ADDR` / `MCP_HTTP_LISTEN_ADDR`: serve over TCP or HTTP instead of stdio
    pub fn from_env() -> Result<Self, AppError> {
        let data_file = data_file_from_env();
        if !Path::new(&data_file).exists() {
            return Err(AppError::Config(format!(
                "dataset not found at {data_file}; run generate-apis first or set MOODLE_APIS_DATA_FILE"
            )));
        }

        Ok(Self {
            data_file,
            transport: Transport::from_env()?,
        })
    }

    pub fn data_file_path(&self) -> PathBuf {
        Path::new(&self.data_file).to_path_buf()
    }
}

/// Catalog build configuration.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Saved copy of the documentation page.
    pub source_html: String,
    /// Page URL, used to resolve relative links and recorded as the dataset source.
    pub source_url: Url,
    /// Where the dataset JSON is written.
    pub data_file: String,
}

impl GenerateConfig {
    /// Required:
    /// - `MOODLE_APIS_SOURCE_HTML`: path to the saved documentation page
    ///
    /// Optional:
    /// - `MOODLE_APIS_SOURCE_URL` (default: "https://moodledev.io/docs/4.5/apis")
    /// - `MOODLE_APIS_DATA_FILE` (default: "data/apis.json")
    pub fn from_env() -> Result<Self, AppError> {
        let source_html = std::env::var("MOODLE_APIS_SOURCE_HTML").map_err(|_| {
            AppError::Config("MOODLE_APIS_SOURCE_HTML environment variable is required".to_string())
        })?;
        if !Path::new(&source_html).exists() {
            return Err(AppError::Config(format!(
                "source page not found: {source_html}"
            )));
        }

        let raw_url = std::env::var("MOODLE_APIS_SOURCE_URL")
            .unwrap_or_else(|_| DEFAULT_SOURCE_URL.to_string());
        let source_url = Url::parse(&raw_url).map_err(|e| {
            AppError::Config(format!("MOODLE_APIS_SOURCE_URL is not an absolute URL ({raw_url}): {e}"))
        })?;

        Ok(Self {
            source_html,
            source_url,
            data_file: data_file_from_env(),
        })
    }

    pub fn data_file_path(&self) -> PathBuf {
        Path::new(&self.data_file).to_path_buf()
    }
}

fn data_file_from_env() -> String {
    std::env::var("MOODLE_APIS_DATA_FILE").unwrap_or_else(|_| DEFAULT_DATA_FILE.to_string())
}
