use std::{fs, path::Path, time::Duration};

use anyhow::{anyhow, Context};
use serde::Deserialize;
use tracing::warn;
use url::Url;

pub const DEFAULT_ENDPOINT_URL: &str =
    "https://mobileqa.liris.com.ec/delportal/wp-json/delportal/v1/Navidad_Pavos_Canje";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub endpoint_url: String,
    pub request_timeout_secs: u64,
    pub connectivity_timeout_secs: u64,
    pub connectivity_target: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT_URL.into(),
            request_timeout_secs: 15,
            connectivity_timeout_secs: 3,
            connectivity_target: None,
        }
    }
}

impl Settings {
    pub fn endpoint(&self) -> anyhow::Result<Url> {
        parse_endpoint(&self.endpoint_url)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.endpoint()?;
        if self.request_timeout_secs == 0 {
            return Err(anyhow!("request_timeout_secs must be greater than zero"));
        }
        if self.connectivity_timeout_secs == 0 {
            return Err(anyhow!("connectivity_timeout_secs must be greater than zero"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connectivity_timeout(&self) -> Duration {
        Duration::from_secs(self.connectivity_timeout_secs)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    endpoint_url: Option<String>,
    request_timeout_secs: Option<u64>,
    connectivity_timeout_secs: Option<u64>,
    connectivity_target: Option<String>,
}

/// Defaults, then `path` if it exists, then environment overrides.
pub fn load_settings(path: &Path) -> Settings {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            if let Err(err) = apply_file(&mut settings, &raw) {
                warn!(path = %path.display(), "ignoring config file: {err:#}");
            }
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => warn!(path = %path.display(), "failed to read config file: {err}"),
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    settings
}

pub(crate) fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw).context("invalid scanner config")?;

    if let Some(v) = file_cfg.endpoint_url {
        settings.endpoint_url = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
    if let Some(v) = file_cfg.connectivity_timeout_secs {
        settings.connectivity_timeout_secs = v;
    }
    if let Some(v) = file_cfg.connectivity_target {
        settings.connectivity_target = Some(v);
    }

    Ok(())
}

pub(crate) fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("REDEEM_ENDPOINT_URL") {
        settings.endpoint_url = v;
    }
    if let Some(v) = lookup("APP__ENDPOINT_URL") {
        settings.endpoint_url = v;
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }

    if let Some(v) = lookup("APP__CONNECTIVITY_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.connectivity_timeout_secs = parsed;
        }
    }

    if let Some(v) = lookup("APP__CONNECTIVITY_TARGET") {
        settings.connectivity_target = Some(v);
    }
}

fn parse_endpoint(raw: &str) -> anyhow::Result<Url> {
    let raw = raw.trim();
    let url = Url::parse(raw).with_context(|| format!("invalid endpoint url '{raw}'"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(anyhow!(
            "endpoint url '{raw}' must use http or https, not '{other}'"
        )),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
