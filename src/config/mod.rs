use configparser::ini::Ini;
use std::path::Path;

/// Port used when neither the config file, `PORT` nor the CLI sets one
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Failed to read config file '{path}': {message}")]
  Read { path: String, message: String },

  #[error("Invalid port from {source_name}: '{value}'")]
  InvalidPort {
    source_name: &'static str,
    value: String,
  },
}

/// Log configuration
#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
  /// Log file path, if not set, logs will be printed to stdout
  pub file: Option<String>,
  /// Log level, default is "info"
  pub level: String,
}

fn default_log_level() -> String {
  "info".to_string()
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      file: None,
      level: default_log_level(),
    }
  }
}

/// Service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
  /// Interface to listen on
  pub host: String,
  /// HTTP listening port
  pub port: u16,
  /// Log configuration
  pub log: LogConfig,
}

fn default_host() -> String {
  "0.0.0.0".to_string()
}

impl Default for Config {
  fn default() -> Self {
    Self {
      host: default_host(),
      port: DEFAULT_PORT,
      log: LogConfig::default(),
    }
  }
}

impl Config {
  /// Load configuration from an INI file
  pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let mut ini = Ini::new();
    ini.load(path).map_err(|message| ConfigError::Read {
      path: path.display().to_string(),
      message,
    })?;
    Self::from_ini(&ini)
  }

  /// Parse configuration from INI text
  pub fn from_ini_str(text: &str) -> Result<Self, ConfigError> {
    let mut ini = Ini::new();
    ini.read(text.to_string()).map_err(|message| ConfigError::Read {
      path: "<inline>".to_string(),
      message,
    })?;
    Self::from_ini(&ini)
  }

  fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
    let mut config = Config::default();

    if let Some(host) = ini.get("server", "host") {
      config.host = host;
    }
    if let Some(port) = ini.get("server", "port") {
      config.port = parse_port("config file", &port)?;
    }
    if let Some(level) = ini.get("log", "level") {
      config.log.level = level;
    }
    config.log.file = ini.get("log", "file").filter(|file| !file.is_empty());

    Ok(config)
  }

  /// Override the port with the value of the `PORT` environment variable, if set
  pub fn apply_port_env(&mut self, value: Option<String>) -> Result<(), ConfigError> {
    if let Some(value) = value {
      self.port = parse_port("PORT", &value)?;
    }
    Ok(())
  }

  /// Address to bind, e.g. "0.0.0.0:3000"
  pub fn server_addr(&self) -> String {
    format!("{}:{}", self.host, self.port)
  }
}

fn parse_port(source_name: &'static str, value: &str) -> Result<u16, ConfigError> {
  value
    .trim()
    .parse::<u16>()
    .map_err(|_| ConfigError::InvalidPort {
      source_name,
      value: value.to_string(),
    })
}
