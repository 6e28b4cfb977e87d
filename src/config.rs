use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    pub boundaries: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    pub site_dir: PathBuf,
    #[serde(default = "default_map_width")]
    pub map_width: u32,
    #[serde(default = "default_map_height")]
    pub map_height: u32,
    #[serde(default = "default_chart_width")]
    pub chart_width: u32,
    #[serde(default = "default_chart_height")]
    pub chart_height: u32,
}

fn default_map_width() -> u32 {
    900
}

fn default_map_height() -> u32 {
    860
}

fn default_chart_width() -> u32 {
    640
}

fn default_chart_height() -> u32 {
    360
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| "Failed to parse TOML configuration")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_full_config() {
        let toml_src = r#"
            [input]
            boundaries = "data/india_states.geojson"

            [output]
            site_dir = "site"
            map_width = 900
            map_height = 860
            chart_width = 640
            chart_height = 360

            [server]
            port = 8080
        "#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(toml_src.as_bytes()).unwrap();

        let config = AppConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.input.boundaries, PathBuf::from("data/india_states.geojson"));
        assert_eq!(config.output.map_width, 900);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn omitted_dimensions_fall_back_to_defaults() {
        let toml_src = r#"
            [input]
            boundaries = "data/india_states.geojson"

            [output]
            site_dir = "site"

            [server]
            port = 8080
        "#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(toml_src.as_bytes()).unwrap();

        let config = AppConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.output.map_width, 900);
        assert_eq!(config.output.map_height, 860);
        assert_eq!(config.output.chart_width, 640);
        assert_eq!(config.output.chart_height, 360);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = AppConfig::load_from_file(Path::new("no/such/config.toml")).unwrap_err();
        assert!(err.to_string().contains("config"));
    }
}
