use std::net::SocketAddr;

use anyhow::Context;
use url::Url;

pub const DEFAULT_CONSTITUENTS_URL: &str =
    "https://en.wikipedia.org/wiki/List_of_S%26P_500_companies";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_DESCRIPTORS_PATH: &str = "config/descriptors.json";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub constituents_url: Url,
    pub descriptors_path: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr = std::env::var("BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR is not a valid socket address")?;

        let constituents_url = std::env::var("CONSTITUENTS_URL")
            .unwrap_or_else(|_| DEFAULT_CONSTITUENTS_URL.to_string());
        let constituents_url =
            Url::parse(&constituents_url).context("CONSTITUENTS_URL is not a valid URL")?;

        let descriptors_path = std::env::var("DESCRIPTORS_PATH")
            .unwrap_or_else(|_| DEFAULT_DESCRIPTORS_PATH.to_string());

        Ok(Self {
            bind_addr,
            constituents_url,
            descriptors_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_url_is_valid() {
        let url = Url::parse(DEFAULT_CONSTITUENTS_URL).unwrap();
        assert_eq!(url.scheme(), "https");
    }

    #[test]
    fn default_bind_addr_is_valid() {
        let addr: SocketAddr = DEFAULT_BIND_ADDR.parse().unwrap();
        assert_eq!(addr.port(), 3000);
    }
}
