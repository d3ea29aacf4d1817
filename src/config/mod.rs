pub mod cli;
pub mod settings;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::logger::LogFormat;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use settings::DashboardSettings;
#[cfg(feature = "cli")]
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "afiliados-dashboard")]
#[command(about = "Dashboard of health-insurance enrollment by Colombian department")]
pub struct CliConfig {
    #[arg(long, help = "TOML config file; flags given here take precedence")]
    pub config: Option<String>,

    #[arg(long, help = "Directory the input paths are relative to")]
    pub data_dir: Option<String>,

    #[arg(long, help = "Enrollment CSV file")]
    pub enrollment_csv: Option<String>,

    #[arg(long, help = "Department boundaries (.shp, .geojson or .json)")]
    pub geometry: Option<String>,

    #[arg(long)]
    pub code_column: Option<String>,

    #[arg(long)]
    pub name_column: Option<String>,

    #[arg(long, help = "Department code attribute in the geometry file")]
    pub geometry_key: Option<String>,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log process CPU and memory while loading")]
    pub monitor: bool,

    #[arg(long, value_enum, default_value = "compact")]
    pub log_format: LogFormat,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Defaults, then the config file, then flags.
    pub fn resolve(&self) -> Result<DashboardSettings> {
        let mut settings = DashboardSettings::default();

        if let Some(path) = &self.config {
            tracing::debug!("Reading config file: {}", path);
            TomlConfig::from_file(path)?.apply_to(&mut settings);
        }

        let overrides = [
            (&mut settings.data_dir, &self.data_dir),
            (&mut settings.enrollment_csv, &self.enrollment_csv),
            (&mut settings.geometry_file, &self.geometry),
            (&mut settings.code_column, &self.code_column),
            (&mut settings.name_column, &self.name_column),
            (&mut settings.geometry_key, &self.geometry_key),
            (&mut settings.host, &self.host),
        ];
        for (target, value) in overrides {
            if let Some(value) = value {
                target.clone_from(value);
            }
        }
        if let Some(port) = self.port {
            settings.port = port;
        }

        Ok(settings)
    }
}
