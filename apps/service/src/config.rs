use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::time::Duration;
use std::{env, fmt, fs, io, path};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::monitoring::checker::DEFAULT_TIMEOUT;
use crate::monitoring::scheduler::DEFAULT_INTERVAL;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read { path: path::PathBuf, source: io::Error },
    #[error("failed to write config {path}: {source}")]
    Write { path: path::PathBuf, source: io::Error },
    #[error("failed to parse config {path}: {source}")]
    Parse { path: path::PathBuf, source: toml::de::Error },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("no config directory available, set XDG_CONFIG_HOME or HOME")]
    PathUnavailable,
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub monitor: MonitorConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Hostnames or URLs, reported under exactly this spelling
    pub targets: Vec<String>,
    pub interval_seconds: u64,
    pub timeout_seconds: u64,
}

impl ServerConfig {
    /// Listen address; `bind` must be an IPv4 or IPv6 literal
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        let ip: IpAddr = self.bind.trim().parse()?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl MonitorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: "0.0.0.0".into(), port: 8080 }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            targets: vec![
                "google.com".into(),
                "https://todoappdb-kaushiksahu18.onrender.com/".into(),
                "https://theconnect-fa2u.onrender.com/".into(),
            ],
            interval_seconds: DEFAULT_INTERVAL.as_secs(),
            timeout_seconds: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

/// Used to ensure we are actually reading a toml file
fn normalize_toml_path(path: &path::Path) -> path::PathBuf {
    let mut path = path.to_path_buf();
    if path.extension().map(|ext| ext != "toml").unwrap_or(true) {
        path.set_extension("toml");
    }
    path
}

/// Get default config path ($XDG_CONFIG_HOME/siteping/config.toml or
/// $HOME/.config/...)
fn default_config_path() -> Result<path::PathBuf, ConfigError> {
    let path = if let Ok(config_home) = env::var("XDG_CONFIG_HOME") {
        path::PathBuf::from(config_home)
    } else if let Some(home_dir) = env::home_dir() {
        home_dir.join(".config")
    } else {
        return Err(ConfigError::PathUnavailable);
    };

    Ok(path.join("siteping/config.toml"))
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str, value: &dyn fmt::Display| {
                writeln!(f, "  {:indent$}{}: {}", "", label, value, indent = level * 2)
            }
        };
        let write_title_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str| {
                writeln!(f, "{:indent$}{}", "", label, indent = level * 2)
            }
        };

        let write_title_1 = write_title_indented(1);
        let write_1 = write_indented(1);
        let write_2 = write_indented(2);

        writeln!(f, "Current Configuration State:")?;
        write_title_1(f, "Server")?;
        write_1(f, "Bind Address", &self.server.bind)?;
        write_1(f, "Port", &self.server.port)?;
        write_title_1(f, "Monitor")?;
        write_1(f, "Interval (s)", &self.monitor.interval_seconds)?;
        write_1(f, "Timeout (s)", &self.monitor.timeout_seconds)?;
        write_1(f, "Targets", &self.monitor.targets.len())?;
        for target in &self.monitor.targets {
            write_2(f, "-", target)?;
        }

        Ok(())
    }
}

impl Config {
    /// Generate Config structure from file
    ///
    /// Creates a default config in ~/.config/siteping/config.toml
    ///  or the specified path, with the name config.toml if one does not exist
    ///
    /// ```no_run
    /// use siteping_service::config::Config;
    ///
    /// let cfg = Config::from_config(None::<&std::path::Path>)?;
    /// println!("{}", cfg);
    /// # Ok::<(), siteping_service::config::ConfigError>(())
    /// ```
    pub fn from_config(optional_path: Option<impl AsRef<path::Path>>) -> Result<Self, ConfigError> {
        let config_path: path::PathBuf = if let Some(path) = optional_path {
            normalize_toml_path(path.as_ref())
        } else {
            default_config_path()?
        };

        if config_path.exists() {
            let raw_string = fs::read_to_string(&config_path)
                .map_err(|source| ConfigError::Read { path: config_path.clone(), source })?;
            toml::from_str(raw_string.as_str())
                .map_err(|source| ConfigError::Parse { path: config_path, source })
        } else {
            let config = Self::default();
            config.write_config(&config_path)?;
            Ok(config)
        }
    }

    /// Serialize and write a config to a file
    pub fn write_config(&self, path: &path::Path) -> Result<(), ConfigError> {
        let config_str: String = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|source| ConfigError::Write { path: parent.to_path_buf(), source })?;
        }

        fs::write(path, config_str)
            .map_err(|source| ConfigError::Write { path: path.to_path_buf(), source })
    }

    /// Apply `BIND` and `PORT` from the environment, ignoring unparsable values
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(env::var("BIND").ok(), env::var("PORT").ok());
    }

    fn apply_overrides(&mut self, bind: Option<String>, port: Option<String>) {
        if let Some(bind) = bind.filter(|b| !b.trim().is_empty()) {
            self.server.bind = bind;
        }
        if let Some(raw) = port {
            match raw.parse() {
                Ok(port) => self.server.port = port,
                Err(e) => warn!("Ignoring PORT={raw:?}: {e}"),
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.monitor.interval_seconds == 0 {
            return Err(ConfigError::Invalid("monitor.interval_seconds must be positive".into()));
        }
        if self.monitor.timeout_seconds == 0 {
            return Err(ConfigError::Invalid("monitor.timeout_seconds must be positive".into()));
        }
        if let Some(index) = self.monitor.targets.iter().position(|t| t.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!("monitor.targets[{index}] is empty")));
        }
        Ok(())
    }
}
