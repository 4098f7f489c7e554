use anyhow::{Context, Result};
use optimus_client::BridgeClient;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Where and how to reach the tool bridge.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub url: Url,
    pub timeout_secs: u64,
}

impl BridgeConfig {
    pub fn new(url: Url, timeout_secs: u64) -> Self {
        Self { url, timeout_secs }
    }

    pub fn client(&self) -> Result<BridgeClient> {
        BridgeClient::new(self.url.as_str(), Duration::from_secs(self.timeout_secs))
            .with_context(|| format!("Invalid bridge configuration for {}", self.url))
    }
}

/// Parse and check a bridge URL given on the command line or environment.
pub fn parse_bridge_url(value: &str) -> std::result::Result<Url, String> {
    let url = Url::parse(value).map_err(|e| format!("invalid URL '{}': {}", value, e))?;
    match url.scheme() {
        "http" => Ok(url),
        other => Err(format!(
            "unsupported scheme '{}' (the bridge speaks plain http)",
            other
        )),
    }
}

/// `~/.optimus`, where the selected application is remembered.
pub fn default_state_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".optimus"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bridge_url() {
        let url = parse_bridge_url("http://localhost:3000").unwrap();
        assert_eq!(url.port(), Some(3000));
        assert!(parse_bridge_url("localhost:3000").is_err());
        assert!(parse_bridge_url("ftp://bridge").is_err());
        assert!(parse_bridge_url("not a url").is_err());
    }

    #[test]
    fn test_client_from_config() {
        let config = BridgeConfig::new(Url::parse("http://127.0.0.1:3000").unwrap(), 5);
        let client = config.client().unwrap();
        assert_eq!(client.base_url().as_str(), "http://127.0.0.1:3000/");
    }
}
