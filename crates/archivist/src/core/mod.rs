//! Core utilities shared by the catalog, the store and the transports.
//!
//! - **Configuration** (`config`): server settings, file loaders and discovery
//! - **I/O** (`io`): identifier validation and file reading
//! - **MIME** (`mime`): MIME, category and tag inference from filenames

pub mod config;
pub mod io;
pub mod mime;

pub use config::ServerConfig;
