use crate::error::{AgroError, Result};
use dialoguer::{Confirm, Input};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port", deserialize_with = "deserialize_port")]
    pub port: u16,
    /// Origins allowed to call the API from a browser. Empty disables CORS.
    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Built front-end served for any non-API path.
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_allowed_origins: default_cors_origins(),
            max_body_bytes: default_max_body_bytes(),
            static_dir: None,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    5000
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:3000".into()]
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PortValue {
    Number(u16),
    Text(String),
}

/// Ports may be written as numbers or as strings (e.g. `"${AGROMANAGE_PORT}"`).
fn deserialize_port<'de, D>(deserializer: D) -> std::result::Result<u16, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    match PortValue::deserialize(deserializer)? {
        PortValue::Number(port) => Ok(port),
        PortValue::Text(value) => value.trim().parse::<u16>().map_err(|_| {
            D::Error::custom(format!(
                "invalid port '{}' - ensure AGROMANAGE_PORT environment variable is set",
                value
            ))
        }),
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Explicit database file. Defaults to `<data dir>/agromanage.db`.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Insert the demo fields, resources and workers into an empty database.
    #[serde(default = "default_seed_demo_data")]
    pub seed_demo_data: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            seed_demo_data: default_seed_demo_data(),
        }
    }
}

fn default_seed_demo_data() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct PaginationConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

fn default_page_size() -> u32 {
    10
}

fn default_max_page_size() -> u32 {
    100
}

impl Config {
    /// Load from `--config`, `config/config.yaml` or the XDG config dir.
    /// An explicit path must exist; otherwise a missing file means defaults.
    pub fn load(config_override: Option<&PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => {
                if !p.exists() {
                    return Err(AgroError::Config(format!(
                        "Config file not found at {:?}",
                        p
                    )));
                }
                p.clone()
            }
            None => match Self::find_config_path() {
                Some(p) => p,
                None => {
                    tracing::warn!(
                        "No config file found, using defaults. Run `agromanage init` to create one."
                    );
                    return Ok(Self::default());
                }
            },
        };

        let config = Self::from_file(&config_path)?;
        tracing::debug!(path = %config_path.display(), "Loaded config");
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .map_err(|e| AgroError::Config(format!("Failed to read config: {}", e)))?;
        Self::parse(&config_str)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let content = Self::substitute_env_vars(content)?;
        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| AgroError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let p = &self.pagination;
        if p.default_page_size == 0 || p.max_page_size == 0 {
            return Err(AgroError::Config("page sizes must be at least 1".into()));
        }
        if p.default_page_size > p.max_page_size {
            return Err(AgroError::Config(format!(
                "default_page_size {} exceeds max_page_size {}",
                p.default_page_size, p.max_page_size
            )));
        }
        Ok(())
    }

    fn find_config_path() -> Option<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Some(local_config);
        }

        dirs::config_dir()
            .map(|dir| dir.join("agromanage").join("config.yaml"))
            .filter(|p| p.exists())
    }

    /// Default path for writing new config files (~/.config/agromanage/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AgroError::Config("Cannot determine config directory".into()))?
            .join("agromanage");
        Ok(config_dir.join("config.yaml"))
    }

    /// Prompt for the common settings and write the result to `target`
    /// (or the default config path).
    pub fn setup_interactive(target: Option<&PathBuf>) -> Result<(Self, PathBuf)> {
        let input_err = |e: dialoguer::Error| AgroError::Config(format!("Input error: {}", e));

        println!();
        println!("Let's set up AgroManage!");
        println!();

        println!("HTTP server");
        let host: String = Input::new()
            .with_prompt("  Bind address")
            .default(default_host())
            .interact_text()
            .map_err(input_err)?;

        let port: u16 = Input::new()
            .with_prompt("  Port")
            .default(default_port())
            .interact_text()
            .map_err(input_err)?;

        let origins: String = Input::new()
            .with_prompt("  Allowed CORS origins (comma separated, blank for none)")
            .default(default_cors_origins().join(","))
            .allow_empty(true)
            .interact_text()
            .map_err(input_err)?;

        println!();
        println!("Database");
        let seed_demo_data = Confirm::new()
            .with_prompt("  Insert demo data into an empty database?")
            .default(true)
            .interact()
            .map_err(input_err)?;

        let default_page_size: u32 = Input::new()
            .with_prompt("  Default page size for filter endpoints")
            .default(default_page_size())
            .interact_text()
            .map_err(input_err)?;

        println!();

        let config = Config {
            server: ServerConfig {
                host,
                port,
                cors_allowed_origins: split_origins(&origins),
                ..ServerConfig::default()
            },
            database: DatabaseConfig {
                path: None,
                seed_demo_data,
            },
            pagination: PaginationConfig {
                default_page_size,
                max_page_size: default_max_page_size().max(default_page_size),
            },
        };

        let config_path = match target {
            Some(p) => p.clone(),
            None => Self::default_config_path()?,
        };
        config.write_to(&config_path)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(self)
            .map_err(|e| AgroError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# AgroManage Configuration\n# Generated by `agromanage init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Replace `${VAR}` with the variable's value. Unset variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| AgroError::Config(format!("Bad substitution pattern: {}", e)))?;

        let result = re.replace_all(content, |caps: &regex_lite::Captures| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        });
        Ok(result.into_owned())
    }

    pub fn data_dir(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        // CLI override takes priority
        if let Some(dir) = data_dir_override {
            std::fs::create_dir_all(dir)?;
            return Ok(dir.clone());
        }

        if let Ok(dir) = std::env::var("AGROMANAGE_DATA_DIR") {
            let p = PathBuf::from(dir);
            std::fs::create_dir_all(&p)?;
            return Ok(p);
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| AgroError::Config("Cannot determine data directory".into()))?
            .join("agromanage");

        std::fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    /// The configured database file, or `agromanage.db` in the data directory.
    pub fn db_path(&self, data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        if let Some(path) = &self.database.path {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            return Ok(path.clone());
        }
        Ok(Self::data_dir(data_dir_override)?.join("agromanage.db"))
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::parse("{}").unwrap();
        assert_eq!(config.server.bind_addr(), "127.0.0.1:5000");
        assert_eq!(config.pagination.default_page_size, 10);
        assert!(config.database.seed_demo_data);
        assert!(config.database.path.is_none());
    }

    #[test]
    fn port_accepts_number_or_string() {
        let numeric = Config::parse("server:\n  port: 8080\n").unwrap();
        assert_eq!(numeric.server.port, 8080);

        let quoted = Config::parse("server:\n  port: \"9090\"\n").unwrap();
        assert_eq!(quoted.server.port, 9090);

        assert!(Config::parse("server:\n  port: \"not-a-port\"\n").is_err());
    }

    #[test]
    fn env_vars_are_substituted() {
        std::env::set_var("AGROMANAGE_TEST_HOST", "0.0.0.0");
        let config = Config::parse("server:\n  host: ${AGROMANAGE_TEST_HOST}\n").unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn unset_env_var_is_left_in_place() {
        let out = Config::substitute_env_vars("x: ${AGROMANAGE_SURELY_UNSET_VAR}").unwrap();
        assert_eq!(out, "x: ${AGROMANAGE_SURELY_UNSET_VAR}");
    }

    #[test]
    fn page_size_bounds_are_checked() {
        let err = Config::parse("pagination:\n  default_page_size: 50\n  max_page_size: 20\n");
        assert!(matches!(err, Err(AgroError::Config(_))));
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let missing = PathBuf::from("/nonexistent/agromanage/config.yaml");
        assert!(matches!(
            Config::load(Some(&missing)),
            Err(AgroError::Config(_))
        ));
    }

    #[test]
    fn written_config_reads_back() {
        let dir = std::env::temp_dir().join(format!("agromanage-config-{}", std::process::id()));
        let path = dir.join("config.yaml");
        let mut config = Config::default();
        config.server.port = 6123;
        config.database.seed_demo_data = false;
        config.write_to(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.server.port, 6123);
        assert!(!loaded.database.seed_demo_data);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn explicit_database_path_wins() {
        let mut config = Config::default();
        config.database.path = Some(PathBuf::from("agro.db"));
        assert_eq!(config.db_path(None).unwrap(), PathBuf::from("agro.db"));
    }

    #[test]
    fn origins_are_split_and_trimmed() {
        assert_eq!(
            split_origins(" http://a.test , ,http://b.test"),
            vec!["http://a.test", "http://b.test"]
        );
        assert!(split_origins("").is_empty());
    }
}
