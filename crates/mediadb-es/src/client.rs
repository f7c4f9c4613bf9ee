//! Per-channel connection handles and the immutable registry that owns
//! them. One sync + one async client pair per channel, built once at
//! startup and shared by every caller.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use mediadb_core::config::ChannelConfig;
use mediadb_core::error::{Error, Result};
use tracing::info;

/// Hard bound on every engine call; a request past this is a failure.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// One configured channel. Both handles carry the base URL and optional
/// basic auth; certificate verification is off, these endpoints live on
/// internal networks with self-signed certs.
pub struct EsChannel {
    name: String,
    base_url: String,
    auth: Option<(String, String)>,
    http: reqwest::Client,
    blocking: reqwest::blocking::Client,
}

impl EsChannel {
    fn open(cfg: &ChannelConfig) -> Result<Self> {
        let conn_err = |detail: String| Error::Connection {
            channel: cfg.name.clone(),
            detail,
        };
        let auth = cfg.elastic_search.password.as_ref().map(|password| {
            (
                cfg.elastic_search.user.clone().unwrap_or_default(),
                password.clone(),
            )
        });
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| conn_err(e.to_string()))?;
        let blocking = reqwest::blocking::Client::builder()
            .danger_accept_invalid_certs(true)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| conn_err(e.to_string()))?;
        Ok(Self {
            name: cfg.name.clone(),
            base_url: cfg.elastic_search.base_url(),
            auth,
            http,
            blocking,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn with_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Some((user, password)) => req.basic_auth(user, Some(password)),
            None => req,
        }
    }

    /// Async POST to `{base_url}/{path}`, auth attached.
    pub(crate) fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.with_auth(self.http.post(format!("{}/{}", self.base_url, path)))
    }

    /// Async GET to `{base_url}/{path}`, auth attached.
    pub(crate) fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.with_auth(self.http.get(format!("{}/{}", self.base_url, path)))
    }

    /// Blocking liveness probe against the engine root. Must not be called
    /// from inside an async runtime; startup runs before the executor.
    pub fn ping(&self) -> Result<()> {
        let mut req = self.blocking.get(&self.base_url);
        if let Some((user, password)) = &self.auth {
            req = req.basic_auth(user, Some(password));
        }
        let response = req.send().map_err(|e| Error::Connection {
            channel: self.name.clone(),
            detail: e.to_string(),
        })?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Error::Connection {
                channel: self.name.clone(),
                detail: format!("engine root returned {}", response.status()),
            })
        }
    }
}

/// Immutable channel name → handle map. Constructed once and passed by
/// reference into whatever needs a connection; there is no ambient global
/// registry, so tests can inject their own.
pub struct ConnectionProvider {
    channels: HashMap<String, Arc<EsChannel>>,
}

impl ConnectionProvider {
    /// Build and probe every channel. Any failure aborts the whole
    /// registry; there is no partial or degraded startup.
    pub fn connect(configs: &[ChannelConfig]) -> Result<Self> {
        let provider = Self::connect_lazy(configs)?;
        for channel in provider.channels.values() {
            channel.ping()?;
            info!(channel = %channel.name(), url = %channel.base_url(), "search engine connection established");
        }
        Ok(provider)
    }

    /// Build handles without probing. For test doubles and deployments
    /// where the engine comes up after this process.
    pub fn connect_lazy(configs: &[ChannelConfig]) -> Result<Self> {
        let mut channels = HashMap::new();
        for cfg in configs {
            if channels.contains_key(&cfg.name) {
                return Err(Error::InvalidConfig(format!(
                    "duplicate channel name: {}",
                    cfg.name
                )));
            }
            channels.insert(cfg.name.clone(), Arc::new(EsChannel::open(cfg)?));
        }
        Ok(Self { channels })
    }

    /// Unknown names are a caller error and propagate; this is not a
    /// condition the provider recovers from.
    pub fn get(&self, name: &str) -> Result<Arc<EsChannel>> {
        self.channels
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownChannel(name.to_string()))
    }

    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }
}
