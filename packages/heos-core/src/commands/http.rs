//! HTTP transport for control commands.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Url};

use super::{Command, CommandError, CommandResult, CommandTransport};

/// Sends each command as `GET {base_url}/{name}?pid=..[&...]`.
#[derive(Clone)]
pub struct HttpCommandTransport {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpCommandTransport {
    /// Creates a transport using a shared HTTP client.
    #[must_use]
    pub fn new(client: Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            timeout,
        }
    }

    /// Builds the request URL for `command`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::InvalidUrl`] if the base URL does not parse.
    pub fn url_for(&self, command: &Command) -> CommandResult<Url> {
        let raw = format!("{}/{}", self.base_url.trim_end_matches('/'), command.name());
        let mut url = Url::parse(&raw).map_err(|e| CommandError::InvalidUrl(e.to_string()))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in command.query() {
                pairs.append_pair(key, &value);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl CommandTransport for HttpCommandTransport {
    async fn send(&self, command: &Command) -> CommandResult<()> {
        let url = self.url_for(command)?;
        log::debug!("[Command] {} -> {}", command.name(), url);

        let start = Instant::now();
        let res = self.client.get(url).timeout(self.timeout).send().await?;
        let status = res.status();
        log::debug!(
            "[Command] {} completed in {:?}: {}",
            command.name(),
            start.elapsed(),
            status
        );

        if !status.is_success() {
            return Err(CommandError::HttpStatus(status.as_u16()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::PlayerId;

    fn transport(base: &str) -> HttpCommandTransport {
        HttpCommandTransport::new(Client::new(), base, Duration::from_secs(5))
    }

    #[test]
    fn builds_relative_endpoint_urls() {
        let t = transport("http://heos.local:8080/");
        let url = t
            .url_for(&Command::Pause {
                pid: PlayerId::new("42"),
            })
            .unwrap();
        assert_eq!(url.as_str(), "http://heos.local:8080/pause?pid=42");

        let url = t
            .url_for(&Command::SetVolume {
                pid: PlayerId::new("-7"),
                level: 20,
            })
            .unwrap();
        assert_eq!(url.as_str(), "http://heos.local:8080/set_volume?pid=-7&level=20");
    }

    #[test]
    fn keeps_base_path_prefix() {
        let t = transport("http://host/remote");
        let url = t
            .url_for(&Command::Next {
                pid: PlayerId::new("1"),
            })
            .unwrap();
        assert_eq!(url.as_str(), "http://host/remote/next?pid=1");
    }

    #[test]
    fn rejects_unparsable_base() {
        let t = transport("not a url");
        let err = t
            .url_for(&Command::Play {
                pid: PlayerId::new("1"),
            })
            .unwrap_err();
        assert!(matches!(err, CommandError::InvalidUrl(_)));
    }
}
