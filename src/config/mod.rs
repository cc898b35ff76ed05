use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Environment variable that overrides `publish.token`.
pub const TOKEN_ENV: &str = "SITEFEED_GITHUB_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub supporters: SupportersConfig,
    #[serde(default)]
    pub publish: PublishConfig,
}

/// Fetch/publish transport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
}

/// Program schedule spreadsheet
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub csv_url: String,
    pub time_column: String,
    pub location_column: String,
    pub activity_column: String,
    /// Activity label of an unscheduled slot
    pub free_label: String,
    /// 0 = idle slots merge only when they touch exactly
    pub merge_tolerance_minutes: i64,
    pub pages: Vec<PageConfig>,
}

/// Supporters spreadsheet
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SupportersConfig {
    pub csv_url: String,
    pub status_column: String,
    pub active_status: String,
    pub organization_column: String,
    pub contact_column: String,
    pub contact_from_us_column: String,
    pub website_column: String,
    pub blocked_domains: Vec<String>,
    pub pages: Vec<PageConfig>,
}

/// One rendered file: locale, optional template file, path in the site repository.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageConfig {
    pub locale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    pub target: String,
}

/// Target website repository
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    pub api_url: String,
    pub repository: String,
    pub branch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub commit_message: String,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}

fn page(locale: &str, target: &str) -> PageConfig {
    PageConfig {
        locale: locale.to_string(),
        template: None,
        target: target.to_string(),
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_retries: 3,
            retry_backoff_ms: 1000,
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            csv_url: String::new(),
            time_column: "Aika".to_string(),
            location_column: "Paikka".to_string(),
            activity_column: "Aktiviteetti".to_string(),
            free_label: "Vapaa".to_string(),
            merge_tolerance_minutes: 0,
            pages: vec![page("fi", "program.html"), page("en", "en/program.html")],
        }
    }
}

impl Default for SupportersConfig {
    fn default() -> Self {
        Self {
            csv_url: String::new(),
            status_column: "Status:".to_string(),
            active_status: "Mukana".to_string(),
            organization_column: "Taho:".to_string(),
            contact_column: "Yhteyshenkilö:".to_string(),
            contact_from_us_column: "Yhteyshenkilö meiltä:".to_string(),
            website_column: "Nettisivu:".to_string(),
            blocked_domains: vec![
                "gmail.com".to_string(),
                "outlook.com".to_string(),
                "yahoo.com".to_string(),
            ],
            pages: vec![
                page("fi", "supporters.html"),
                page("en", "en/supporters.html"),
            ],
        }
    }
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            repository: "botsarefuture/mielenterveyskaikille.fi".to_string(),
            branch: "main".to_string(),
            token: None,
            commit_message: "Update HTML content".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            http: HttpConfig::default(),
            schedule: ScheduleConfig::default(),
            supporters: SupportersConfig::default(),
            publish: PublishConfig::default(),
        }
    }
}

impl PublishConfig {
    /// Token from the environment first, then from the config file.
    pub fn resolve_token(&self) -> AppResult<String> {
        env::var(TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.token.clone().filter(|t| !t.trim().is_empty()))
            .ok_or_else(|| {
                AppError::Config(format!(
                    "no GitHub token: set publish.token or {TOKEN_ENV}"
                ))
            })
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("sitefeed")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".sitefeed")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("sitefeed.conf")
    }

    /// Return the full path of the run log database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("sitefeed.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
        let cfg: Config = serde_yaml::from_str(&content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.schedule.merge_tolerance_minutes < 0 {
            return Err(AppError::Config(
                "schedule.merge_tolerance_minutes must not be negative".into(),
            ));
        }
        for (name, pages) in [
            ("schedule", &self.schedule.pages),
            ("supporters", &self.supporters.pages),
        ] {
            if pages.is_empty() {
                return Err(AppError::Config(format!("{name}.pages is empty")));
            }
            if let Some(p) = pages.iter().find(|p| p.target.trim().is_empty()) {
                return Err(AppError::Config(format!(
                    "{name}.pages: locale '{}' has an empty target",
                    p.locale
                )));
            }
        }
        Ok(())
    }

    /// Path of the run log database with `~` expanded
    pub fn database_path(&self) -> PathBuf {
        expand_tilde(&self.database)
    }

    /// Write a fresh configuration file (unless `is_test`) and return it.
    pub fn init_all(
        config_path: &Path,
        custom_db: Option<String>,
        is_test: bool,
    ) -> AppResult<Config> {
        let mut config = Config::default();

        // DB name: user provided or default
        if let Some(name) = custom_db {
            let p = Path::new(&name);
            config.database = if p.is_absolute() {
                name.clone()
            } else {
                Self::config_dir().join(p).to_string_lossy().to_string()
            };
        }

        if !is_test {
            if let Some(dir) = config_path.parent() {
                fs::create_dir_all(dir)?;
            }
            let yaml = serde_yaml::to_string(&config)?;
            let mut file = fs::File::create(config_path)?;
            file.write_all(yaml.as_bytes())?;
        }

        Ok(config)
    }
}
