use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_path, validate_range, Validate,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ENROLLMENT_CSV: &str = "afiliados_por_departamento_y_regimen_limpio.csv";
pub const DEFAULT_GEOMETRY_FILE: &str = "coordenadas/COLOMBIA/COLOMBIA.shp";
pub const DEFAULT_CODE_COLUMN: &str = "CodDepto";
pub const DEFAULT_NAME_COLUMN: &str = "Departamento";
pub const DEFAULT_GEOMETRY_KEY: &str = "DPTO_CCDGO";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8050;

pub const ENROLLMENT_EXTENSIONS: [&str; 1] = ["csv"];
pub const GEOMETRY_EXTENSIONS: [&str; 3] = ["shp", "geojson", "json"];

/// Fully resolved runtime settings: defaults, then the TOML file, then CLI flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSettings {
    pub data_dir: String,
    pub enrollment_csv: String,
    pub geometry_file: String,
    pub code_column: String,
    pub name_column: String,
    pub geometry_key: String,
    pub host: String,
    pub port: u16,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            data_dir: ".".to_string(),
            enrollment_csv: DEFAULT_ENROLLMENT_CSV.to_string(),
            geometry_file: DEFAULT_GEOMETRY_FILE.to_string(),
            code_column: DEFAULT_CODE_COLUMN.to_string(),
            name_column: DEFAULT_NAME_COLUMN.to_string(),
            geometry_key: DEFAULT_GEOMETRY_KEY.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ConfigProvider for DashboardSettings {
    fn enrollment_csv(&self) -> &str {
        &self.enrollment_csv
    }

    fn geometry_file(&self) -> &str {
        &self.geometry_file
    }

    fn code_column(&self) -> &str {
        &self.code_column
    }

    fn name_column(&self) -> &str {
        &self.name_column
    }

    fn geometry_key(&self) -> &str {
        &self.geometry_key
    }

    fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Validate for DashboardSettings {
    fn validate(&self) -> Result<()> {
        validate_path("data_dir", &self.data_dir)?;
        validate_path("enrollment_csv", &self.enrollment_csv)?;
        validate_file_extension("enrollment_csv", &self.enrollment_csv, &ENROLLMENT_EXTENSIONS)?;
        validate_path("geometry_file", &self.geometry_file)?;
        validate_file_extension("geometry_file", &self.geometry_file, &GEOMETRY_EXTENSIONS)?;
        validate_non_empty_string("code_column", &self.code_column)?;
        validate_non_empty_string("name_column", &self.name_column)?;
        validate_non_empty_string("geometry_key", &self.geometry_key)?;
        validate_non_empty_string("host", &self.host)?;
        validate_range("port", self.port, 1, u16::MAX)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = DashboardSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.bind_address(), "0.0.0.0:8050");
    }

    #[test]
    fn test_rejects_unsupported_geometry_format() {
        let settings = DashboardSettings {
            geometry_file: "deptos.kml".to_string(),
            ..DashboardSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_rejects_blank_column_and_zero_port() {
        let settings = DashboardSettings {
            code_column: "  ".to_string(),
            ..DashboardSettings::default()
        };
        assert!(settings.validate().is_err());

        let settings = DashboardSettings {
            port: 0,
            ..DashboardSettings::default()
        };
        assert!(settings.validate().is_err());
    }
}
