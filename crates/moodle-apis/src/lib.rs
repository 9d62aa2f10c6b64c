//! Moodle 4.5 API catalogue: builds a structured dataset from the developer documentation
//! page and serves lookup, search and category browsing over MCP.

pub mod catalog;
pub mod config;
pub mod dataset;
pub mod error;
pub mod extract;
pub mod html;
pub mod index;
pub mod model;
pub mod render;
pub mod resolve;
pub mod resources;
pub mod search;
pub mod server;
pub mod slug;
pub mod text;

#[cfg(test)]
mod testing;
