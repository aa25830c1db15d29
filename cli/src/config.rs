use anyhow::{Context, Result};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 8080;

/// Directories and connection settings the interpreter starts with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Working directory holding project files and `actors.yaml`
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Where calculation workbooks are looked up
    pub calc_dir: PathBuf,
    /// Converter assets (stylesheet includes, reference document)
    pub template_dir: PathBuf,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("output"),
            calc_dir: PathBuf::from("calculations"),
            template_dir: PathBuf::from("template"),
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    /// Defaults overridden by `UPREPORT_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(dir) = var("UPREPORT_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = var("UPREPORT_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(dir) = var("UPREPORT_CALC_DIR") {
            config.calc_dir = PathBuf::from(dir);
        }
        if let Some(dir) = var("UPREPORT_TEMPLATE_DIR") {
            config.template_dir = PathBuf::from(dir);
        }
        if let Some(port) = var("UPREPORT_PORT") {
            config.port = port
                .trim()
                .parse()
                .with_context(|| format!("UPREPORT_PORT must be a port number, got '{}'", port))?;
        }

        Ok(config)
    }
}
