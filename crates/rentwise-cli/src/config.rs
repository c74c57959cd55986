// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use rentwise_app::StepperOrientation;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_NAME: &str = "rentwise";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_CHAT_TIMEOUT: &str = "30s";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub chat: Chat,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub logging: Logging,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            chat: Chat::default(),
            ui: Ui::default(),
            logging: Logging::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub base_url: Option<String>,
    pub timeout: Option<String>,
    pub booking_id: Option<String>,
}

impl Default for Chat {
    fn default() -> Self {
        Self {
            base_url: Some(rentwise_chat::DEFAULT_BASE_URL.to_owned()),
            timeout: Some(DEFAULT_CHAT_TIMEOUT.to_owned()),
            booking_id: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub orientation: Option<String>,
    pub show_chat: Option<bool>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            orientation: Some(StepperOrientation::Horizontal.as_str().to_owned()),
            show_chat: Some(true),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Logging {
    pub enabled: Option<bool>,
    pub file: Option<String>,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            enabled: Some(true),
            file: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("RENTWISE_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set RENTWISE_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and put values under [chat], [ui], and [logging]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(timeout) = &self.chat.timeout {
            let parsed = parse_duration(timeout)?;
            if parsed <= Duration::ZERO {
                bail!(
                    "chat.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        if let Some(base_url) = &self.chat.base_url
            && base_url.trim().is_empty()
        {
            bail!("chat.base_url in {} must not be empty", path.display());
        }

        if let Some(orientation) = &self.ui.orientation
            && StepperOrientation::parse(orientation).is_none()
        {
            bail!(
                "ui.orientation in {} must be \"horizontal\" or \"vertical\", got {:?}",
                path.display(),
                orientation
            );
        }

        if let Some(file) = &self.logging.file
            && file.trim().is_empty()
        {
            bail!(
                "logging.file in {} must not be empty; remove it to use the default",
                path.display()
            );
        }

        Ok(())
    }

    pub fn chat_base_url(&self) -> &str {
        self.chat
            .base_url
            .as_deref()
            .unwrap_or(rentwise_chat::DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn chat_timeout(&self) -> Result<Duration> {
        parse_duration(self.chat.timeout.as_deref().unwrap_or(DEFAULT_CHAT_TIMEOUT))
    }

    pub fn booking_id(&self) -> Option<&str> {
        self.chat
            .booking_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    pub fn orientation(&self) -> StepperOrientation {
        self.ui
            .orientation
            .as_deref()
            .and_then(StepperOrientation::parse)
            .unwrap_or_default()
    }

    pub fn show_chat(&self) -> bool {
        self.ui.show_chat.unwrap_or(true)
    }

    pub fn logging_enabled(&self) -> bool {
        self.logging.enabled.unwrap_or(true)
    }

    pub fn log_file(&self) -> Result<PathBuf> {
        if let Some(file) = &self.logging.file {
            return Ok(PathBuf::from(file));
        }
        let data_root = dirs::data_local_dir().ok_or_else(|| {
            anyhow!("cannot resolve data directory; set [logging].file to an explicit path")
        })?;
        Ok(data_root.join(APP_NAME).join(format!("{APP_NAME}.log")))
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# rentwise config\n# Place this file at: {}\n\nversion = 1\n\n[chat]\nbase_url = \"{}\"\ntimeout = \"{}\"\n# booking_id = \"your-booking-id\"\n\n[ui]\n# horizontal or vertical\norientation = \"horizontal\"\nshow_chat = true\n\n[logging]\nenabled = true\n# Optional. Default is the platform data dir (for example ~/.local/share/rentwise/rentwise.log)\n# file = \"/absolute/path/to/rentwise.log\"\n",
            path.display(),
            rentwise_chat::DEFAULT_BASE_URL,
            DEFAULT_CHAT_TIMEOUT,
        )
    }
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 30s)")
}

#[cfg(test)]
mod tests {
    use super::{Config, parse_duration};
    use anyhow::Result;
    use rentwise_app::StepperOrientation;
    use rentwise_testkit::temp_config_path;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};
    use std::time::Duration;

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let (temp, path) = temp_config_path()?;
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert!(config.show_chat());
        assert_eq!(config.orientation(), StepperOrientation::Horizontal);
        assert_eq!(config.chat_timeout()?, Duration::from_secs(30));
        assert_eq!(config.booking_id(), None);
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[chat]\nbooking_id=\"abc\"\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        let message = error.to_string();
        assert!(message.contains("version = 1"));
        assert!(message.contains("[chat], [ui], and [logging]"));
        Ok(())
    }

    #[test]
    fn v1_config_parses() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[chat]\nbase_url=\"http://rent.example/api/ai-engine//\"\ntimeout=\"2s\"\nbooking_id=\" B-7 \"\n[ui]\norientation=\"vertical\"\nshow_chat=false\n[logging]\nenabled=false\nfile=\"/tmp/rw.log\"\n",
        )?;

        let config = Config::load(&path)?;
        assert_eq!(config.chat_base_url(), "http://rent.example/api/ai-engine");
        assert_eq!(config.chat_timeout()?, Duration::from_secs(2));
        assert_eq!(config.booking_id(), Some("B-7"));
        assert_eq!(config.orientation(), StepperOrientation::Vertical);
        assert!(!config.show_chat());
        assert!(!config.logging_enabled());
        assert_eq!(config.log_file()?, PathBuf::from("/tmp/rw.log"));
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 3\n")?;
        let error = Config::load(&path).expect_err("v3 config should fail");
        assert!(error.to_string().contains("unsupported config version 3"));
        Ok(())
    }

    #[test]
    fn unknown_orientation_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[ui]\norientation = \"diagonal\"\n")?;
        let error = Config::load(&path).expect_err("bad orientation should fail");
        assert!(error.to_string().contains("ui.orientation"));
        Ok(())
    }

    #[test]
    fn blank_base_url_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[chat]\nbase_url = \"  \"\n")?;
        let error = Config::load(&path).expect_err("blank base url should fail");
        assert!(error.to_string().contains("chat.base_url"));
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("RENTWISE_CONFIG_PATH", &override_path);
        }
        let resolved = Config::default_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("RENTWISE_CONFIG_PATH");
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn default_path_uses_config_toml_suffix_when_no_env_override() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var("RENTWISE_CONFIG_PATH");
        }
        let path = Config::default_path()?;
        assert!(path.ends_with("config.toml"));
        Ok(())
    }

    #[test]
    fn default_log_file_lives_under_app_dir() -> Result<()> {
        let config = Config::default();
        let file = config.log_file()?;
        assert!(file.ends_with("rentwise/rentwise.log"), "got {}", file.display());
        Ok(())
    }

    #[test]
    fn chat_timeout_parses_ms_seconds_and_minutes() -> Result<()> {
        assert_eq!(parse_duration("500ms")?, Duration::from_millis(500));
        assert_eq!(parse_duration("5s")?, Duration::from_secs(5));
        assert_eq!(parse_duration("2m")?, Duration::from_secs(120));
        Ok(())
    }

    #[test]
    fn chat_timeout_rejects_invalid_duration() {
        let error = parse_duration("oops").expect_err("invalid duration should fail");
        assert!(error.to_string().contains("invalid duration"));
    }

    #[test]
    fn chat_timeout_rejects_non_positive_values_in_config() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[chat]\ntimeout = \"0s\"\n")?;
        let error = Config::load(&path).expect_err("zero timeout should fail");
        assert!(error.to_string().contains("must be positive"));
        Ok(())
    }

    #[test]
    fn example_config_round_trips_through_load() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        let example = Config::example_config(&path);
        assert!(example.contains("version = 1"));
        assert!(example.contains("[chat]"));
        assert!(example.contains("[ui]"));
        assert!(example.contains("[logging]"));

        std::fs::write(&path, example)?;
        let config = Config::load(&path)?;
        assert_eq!(config.chat_base_url(), rentwise_chat::DEFAULT_BASE_URL);
        Ok(())
    }
}
