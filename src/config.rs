use serde::Deserialize;

/// Lower bound of the collection interval, bounding load on the runtime API.
pub const MIN_INTERVAL_SECS: u64 = 3;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub collection: CollectionConfig,
    pub runtime: RuntimeConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 9487,
            host: "0.0.0.0".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Seconds between collection cycles; values below [`MIN_INTERVAL_SECS`] are raised to it.
    pub interval_secs: u64,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self { interval_secs: 15 }
    }
}

/// Remote Docker endpoint. Both unset means the local socket / named pipe.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl RuntimeConfig {
    /// `tcp://host:port` when a remote endpoint is configured.
    pub fn remote_address(&self) -> Option<String> {
        match (self.host.as_deref(), self.port) {
            (Some(host), Some(port)) if !host.is_empty() && port > 0 => {
                Some(format!("tcp://{}:{}", host, port))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Also expose process-level metrics of the exporter itself.
    pub collect_default: bool,
}

impl AppConfig {
    /// Load from `CONFIG_FILE` (default `config.toml`), then apply `DOCKERSTATS_*` overrides.
    /// A missing default file means built-in defaults; a missing explicit file is an error.
    pub fn load() -> anyhow::Result<Self> {
        let explicit = std::env::var("CONFIG_FILE").ok();
        let path = explicit.clone().unwrap_or_else(|| "config.toml".into());
        let mut config = match std::fs::read_to_string(&path) {
            Ok(s) => toml::from_str(&s)?,
            Err(e) if explicit.is_none() && e.kind() == std::io::ErrorKind::NotFound => {
                AppConfig::default()
            }
            Err(e) => return Err(anyhow::anyhow!("reading {}: {}", path, e)),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.finish()
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.finish()
    }

    /// Apply `DOCKERSTATS_*` variables looked up through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(v) = lookup("DOCKERSTATS_PORT") {
            self.server.port = v
                .parse()
                .map_err(|e| anyhow::anyhow!("DOCKERSTATS_PORT={}: {}", v, e))?;
        }
        if let Some(v) = lookup("DOCKERSTATS_INTERVAL") {
            self.collection.interval_secs = v
                .parse()
                .map_err(|e| anyhow::anyhow!("DOCKERSTATS_INTERVAL={}: {}", v, e))?;
        }
        if let Some(v) = lookup("DOCKERSTATS_HOSTIP").filter(|v| !v.is_empty()) {
            self.runtime.host = Some(v);
        }
        if let Some(v) = lookup("DOCKERSTATS_HOSTPORT") {
            let port: u16 = v
                .parse()
                .map_err(|e| anyhow::anyhow!("DOCKERSTATS_HOSTPORT={}: {}", v, e))?;
            self.runtime.port = (port > 0).then_some(port);
        }
        if let Some(v) = lookup("DOCKERSTATS_DEFAULTMETRICS") {
            self.metrics.collect_default = matches!(v.to_lowercase().as_str(), "1" | "true" | "yes");
        }
        Ok(())
    }

    fn finish(mut self) -> anyhow::Result<Self> {
        if self.collection.interval_secs < MIN_INTERVAL_SECS {
            tracing::warn!(
                interval_secs = self.collection.interval_secs,
                min = MIN_INTERVAL_SECS,
                "collection.interval_secs below minimum; clamping"
            );
            self.collection.interval_secs = MIN_INTERVAL_SECS;
        }
        let host_set = self.runtime.host.as_deref().is_some_and(|h| !h.is_empty());
        let port_set = self.runtime.port.is_some_and(|p| p > 0);
        if host_set != port_set {
            tracing::warn!(
                host = ?self.runtime.host,
                port = ?self.runtime.port,
                "runtime.host and runtime.port must be set together; using the local socket"
            );
            self.runtime = RuntimeConfig::default();
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(!self.server.host.is_empty(), "server.host must be non-empty");
        Ok(())
    }
}
