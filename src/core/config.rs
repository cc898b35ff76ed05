use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use std::path::Path;
use std::process::Command;

pub struct ConfigLogic;

impl ConfigLogic {
    /// Effective configuration as YAML, with the token masked.
    pub fn to_yaml(cfg: &Config) -> AppResult<String> {
        let mut shown = cfg.clone();
        if shown.publish.token.is_some() {
            shown.publish.token = Some("********".into());
        }
        Ok(serde_yaml::to_string(&shown)?)
    }

    pub fn print(cfg: &Config, path: &Path) -> AppResult<()> {
        println!("📄 Current configuration ({}):\n", path.display());
        println!("{}", Self::to_yaml(cfg)?);
        Ok(())
    }

    fn default_editor() -> String {
        std::env::var("EDITOR")
            .or_else(|_| std::env::var("VISUAL"))
            .unwrap_or_else(|_| {
                if cfg!(target_os = "windows") {
                    "notepad".to_string()
                } else {
                    "nano".to_string()
                }
            })
    }

    fn run_editor(editor: &str, path: &Path) -> bool {
        Command::new(editor)
            .arg(path)
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Open the config file in `editor` (or $EDITOR/$VISUAL), falling back
    /// to the platform default when the requested one is not available.
    pub fn edit(path: &Path, editor: Option<&str>) -> AppResult<()> {
        if !path.exists() {
            return Err(AppError::Config(format!(
                "{} does not exist; run `sitefeed init` first",
                path.display()
            )));
        }

        let default_editor = Self::default_editor();
        let requested = editor.map(str::to_string).unwrap_or_else(|| default_editor.clone());

        if Self::run_editor(&requested, path) {
            success(format!("Configuration file edited using '{requested}'"));
            return Ok(());
        }

        warning(format!(
            "Editor '{requested}' not available, falling back to '{default_editor}'"
        ));
        if requested != default_editor && Self::run_editor(&default_editor, path) {
            success(format!(
                "Configuration file edited using fallback '{default_editor}'"
            ));
            return Ok(());
        }

        Err(AppError::Config(format!(
            "failed to edit {} with '{default_editor}'",
            path.display()
        )))
    }
}
