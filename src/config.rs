use crate::persistence::{ensure_dir, get_data_dir};
use crate::voice::client::DEFAULT_API_BASE;
use crate::voice::FfmpegRecorder;
use anyhow::{Context, Result};
use reqwest::Url;
use std::path::{Path, PathBuf};

/// Process-level configuration (user preferences live in `AppSettings`)
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub api_base: Url,
    pub recorder_command: String,
}

impl Config {
    /// Resolve from CLI flags / environment values
    pub fn resolve(
        data_dir: Option<&Path>,
        api_base: Option<&str>,
        recorder_command: Option<&str>,
    ) -> Result<Self> {
        let data_dir = get_data_dir(data_dir)?;
        ensure_dir(&data_dir)?;

        let api_base = parse_api_base(api_base.unwrap_or(DEFAULT_API_BASE))?;
        let recorder_command = recorder_command
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| FfmpegRecorder::default_command_line())
            .to_string();

        Ok(Self {
            data_dir,
            api_base,
            recorder_command,
        })
    }
}

/// Parse a base URL, making sure relative endpoint joins keep its path
fn parse_api_base(raw: &str) -> Result<Url> {
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    Url::parse(&with_slash).with_context(|| format!("Invalid API base URL: {}", raw))
}
