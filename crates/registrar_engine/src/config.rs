use registrar_base::{FilePath, Pal, RegistrarError, RegistrarResult, ResultExt};
use serde::Deserialize;
use tracing::{debug, info};

/// Name of the optional configuration file, relative to the working directory.
pub const CONFIG_FILE_NAME: &str = "registrar.toml";

/// Startup configuration for the registrar server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Address to bind the HTTP server to.
    pub host: String,
    pub port: u16,
    /// Load the demo courses and enrollments at startup.
    pub seed_demo_data: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            seed_demo_data: true,
        }
    }
}

impl Config {
    pub fn parse(content: &str) -> RegistrarResult<Self> {
        toml::from_str(content).map_err(|e| {
            Box::new(RegistrarError::message(format!(
                "Invalid configuration: {}",
                e.message()
            )))
        })
    }
}

/// Load the configuration file at `path`, falling back to defaults if it does not exist.
pub fn load_config(pal: &dyn Pal, path: &FilePath) -> RegistrarResult<Config> {
    if !pal.file_exists(path)? {
        debug!(%path, "no configuration file, using defaults");
        return Ok(Config::default());
    }
    let content = pal.read_file_to_string(path)?;
    let config = Config::parse(&content).with_context(|| format!("Failed to load {}", path))?;
    info!(%path, host = %config.host, port = config.port, "loaded configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use registrar_base::MockPal;

    #[test]
    fn test_missing_file_gives_defaults() {
        let pal = MockPal::new();
        let config = load_config(&pal, &FilePath::from(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.port, 3000);
        assert!(config.seed_demo_data);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let pal = MockPal::new();
        pal.add_file(FilePath::from(CONFIG_FILE_NAME), "port = 8080\nseed_demo_data = false\n");

        let config = load_config(&pal, &FilePath::from(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(
            config,
            Config {
                host: "127.0.0.1".to_string(),
                port: 8080,
                seed_demo_data: false,
            }
        );
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let pal = MockPal::new();
        pal.add_file(FilePath::from(CONFIG_FILE_NAME), "port = \"three thousand\"");

        let error = load_config(&pal, &FilePath::from(CONFIG_FILE_NAME)).unwrap_err();
        let message = error.to_string();
        assert!(message.starts_with("Failed to load registrar.toml: Invalid configuration"));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let error = Config::parse("hostname = \"0.0.0.0\"").unwrap_err();
        assert!(error.to_string().contains("hostname"));
    }
}
