//! Server configuration.

use std::time::Duration;

use pairmatch_engine::EngineConfig;

/// Everything needed to start a [`PairmatchServer`](crate::PairmatchServer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the WebSocket listener binds to.
    pub bind_addr: String,

    /// Game rule tunables.
    pub engine: EngineConfig,

    /// Capacity of the orchestrator's command queue. Connection tasks wait
    /// when it is full.
    pub command_buffer: usize,
}

impl ServerConfig {
    pub const DEFAULT_BIND_ADDR: &'static str = "0.0.0.0:8086";
    pub const DEFAULT_COMMAND_BUFFER: usize = 256;

    /// Reads overrides from the process environment:
    ///
    /// | Variable                  | Meaning                              |
    /// |---------------------------|--------------------------------------|
    /// | `PAIRMATCH_BIND`          | full bind address                    |
    /// | `APP_PORT`                | port only, bound on `0.0.0.0`        |
    /// | `PAIRMATCH_FLIP_BACK_MS`  | mismatch lock window in milliseconds |
    /// | `PAIRMATCH_SHUFFLE_SEED`  | fixed board shuffle seed             |
    ///
    /// `PAIRMATCH_BIND` wins over `APP_PORT`. Values that don't parse are
    /// logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`ServerConfig::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = lookup("PAIRMATCH_BIND") {
            config.bind_addr = addr;
        } else if let Some(port) = parse_var::<u16>(&lookup, "APP_PORT") {
            config.bind_addr = format!("0.0.0.0:{port}");
        }

        if let Some(ms) = parse_var::<u64>(&lookup, "PAIRMATCH_FLIP_BACK_MS") {
            config.engine.flip_back_delay = Duration::from_millis(ms);
        }

        if let Some(seed) = parse_var::<u64>(&lookup, "PAIRMATCH_SHUFFLE_SEED") {
            config.engine.shuffle_seed = Some(seed);
        }

        config
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: Self::DEFAULT_BIND_ADDR.to_string(),
            engine: EngineConfig::default(),
            command_buffer: Self::DEFAULT_COMMAND_BUFFER,
        }
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparsable setting");
            None
        }
    }
}
