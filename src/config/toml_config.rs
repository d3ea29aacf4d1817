use crate::config::settings::DashboardSettings;
use crate::utils::error::{DashboardError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional config file. Every key may be omitted; omitted keys keep the
/// built-in defaults.
///
/// ```toml
/// [data]
/// data_dir = "${DATA_DIR}"
/// enrollment_csv = "afiliados_por_departamento_y_regimen_limpio.csv"
/// geometry_file = "coordenadas/COLOMBIA/COLOMBIA.shp"
///
/// [server]
/// port = 8050
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub data: Option<DataConfig>,
    pub server: Option<ServerConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    pub data_dir: Option<String>,
    pub enrollment_csv: Option<String>,
    pub geometry_file: Option<String>,
    pub code_column: Option<String>,
    pub name_column: Option<String>,
    pub geometry_key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DashboardError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DashboardError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the value of the environment variable. Unset
    /// variables are left verbatim.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DashboardError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Overlays the keys present in the file onto `settings`.
    pub fn apply_to(&self, settings: &mut DashboardSettings) {
        if let Some(data) = &self.data {
            overlay(&mut settings.data_dir, &data.data_dir);
            overlay(&mut settings.enrollment_csv, &data.enrollment_csv);
            overlay(&mut settings.geometry_file, &data.geometry_file);
            overlay(&mut settings.code_column, &data.code_column);
            overlay(&mut settings.name_column, &data.name_column);
            overlay(&mut settings.geometry_key, &data.geometry_key);
        }
        if let Some(server) = &self.server {
            overlay(&mut settings.host, &server.host);
            if let Some(port) = server.port {
                settings.port = port;
            }
        }
    }
}

fn overlay(target: &mut String, value: &Option<String>) {
    if let Some(value) = value {
        target.clone_from(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
[data]
geometry_file = "deptos.geojson"

[server]
port = 9000
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let mut settings = DashboardSettings::default();
        config.apply_to(&mut settings);

        assert_eq!(settings.geometry_file, "deptos.geojson");
        assert_eq!(settings.port, 9000);
        assert_eq!(settings.code_column, "CodDepto");
        assert_eq!(settings.host, "0.0.0.0");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("AFILIADOS_TEST_DATA_DIR", "/srv/afiliados");

        let toml_content = r#"
[data]
data_dir = "${AFILIADOS_TEST_DATA_DIR}"
enrollment_csv = "${AFILIADOS_TEST_UNSET_VAR}.csv"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let data = config.data.unwrap();
        assert_eq!(data.data_dir.as_deref(), Some("/srv/afiliados"));
        assert_eq!(
            data.enrollment_csv.as_deref(),
            Some("${AFILIADOS_TEST_UNSET_VAR}.csv")
        );

        std::env::remove_var("AFILIADOS_TEST_DATA_DIR");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = TomlConfig::from_toml_str("[server]\nport = \"not a number\"\n");
        assert!(matches!(result, Err(DashboardError::ConfigError { .. })));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[data]\ncode_column = \"COD_DPTO\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(
            config.data.unwrap().code_column.as_deref(),
            Some("COD_DPTO")
        );
    }
}
