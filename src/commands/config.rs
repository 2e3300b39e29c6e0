use crate::Result;
use crate::documents::{DocumentState, EntityField, MetadataField};
use camino::{Utf8Path, Utf8PathBuf};
use core::time::Duration;
use ohno::{IntoAppError, app_err, bail};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::io;
use url::Url;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// Name of the configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "documents.toml";

/// A named project of the extraction API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    pub name: String,
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Root URL of the document extraction API
    pub base_url: String,

    /// Upper bound on each API request, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Projects selectable by name; the first one is the default
    pub projects: Vec<Project>,

    /// Document states exported when none are given on the command line
    #[serde(default)]
    pub default_states: Vec<DocumentState>,

    /// Metadata columns exported when none are given on the command line
    #[serde(default)]
    pub default_metadata: Vec<MetadataField>,

    /// Entity fields exported when none are given on the command line
    #[serde(default)]
    pub default_entities: Vec<EntityField>,
}

const fn default_request_timeout_secs() -> u64 {
    60
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// Without an explicit path, `documents.toml` in `base_dir` is used if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading configuration file '{path}'"))?;
            (path.clone(), text)
        } else {
            let path = base_dir.join(DEFAULT_CONFIG_FILE);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    log::debug!("No {DEFAULT_CONFIG_FILE} found in {base_dir}, using the default configuration");
                    return Self::default_config();
                }
                Err(e) => return Err(e).into_app_err_with(|| format!("reading configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate().map_err(|e| app_err!("invalid configuration file '{final_path}': {e}"))?;

        Ok(config)
    }

    /// The embedded default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error only if the embedded defaults are broken
    pub fn default_config() -> Result<Self> {
        let config: Self = toml::from_str(DEFAULT_CONFIG_TOML).into_app_err("parsing the default configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Save the default configuration to a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The project selected when none is named.
    #[must_use]
    pub fn default_project(&self) -> Option<&Project> {
        self.projects.first()
    }

    /// Look up a project by name.
    #[must_use]
    pub fn project(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name == name)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL, timeout, or project list is unusable
    fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url).into_app_err_with(|| format!("base_url '{}' is not a valid URL", self.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("base_url '{}' must use http or https", self.base_url);
        }

        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than 0");
        }

        if self.projects.is_empty() {
            bail!("at least one project must be configured");
        }

        let mut names = HashSet::new();
        for project in &self.projects {
            if project.name.trim().is_empty() || project.id.trim().is_empty() {
                bail!("projects need a non-empty name and id");
            }
            if !names.insert(project.name.as_str()) {
                bail!("project name '{}' is configured more than once", project.name);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(name: &str, id: &str) -> Project {
        Project {
            name: name.to_string(),
            id: id.to_string(),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default_config().unwrap();
        assert_eq!(config.base_url, "https://api.cloud.hypatos.ai/v1");
        assert_eq!(config.request_timeout(), Duration::from_secs(60));
        assert_eq!(
            config.default_states,
            [DocumentState::ReviewRequired, DocumentState::InCompletion, DocumentState::Extracted]
        );
        assert_eq!(config.default_metadata, [MetadataField::Id, MetadataField::FileName, MetadataField::State]);
        assert_eq!(config.default_entities.len(), 7);
    }

    #[test]
    fn test_default_projects() {
        let config = Config::default_config().unwrap();
        assert_eq!(config.default_project(), Some(&project("2.1.Zeit_Rechnungen", "62fac5f1b2ddfb95f3b076e4")));
        assert_eq!(
            config.project("1.1.Handelsblatt_Rechnungen").map(|p| p.id.as_str()),
            Some("62fac51d68a5582b24f3ef31")
        );
        assert_eq!(config.project("unknown"), None);
    }

    #[test]
    fn test_validate_bad_base_url() {
        let config = Config { base_url: "nope".into(), ..Config::default_config().unwrap() };
        assert!(config.validate().is_err());

        let config = Config { base_url: "ftp://example.com".into(), ..Config::default_config().unwrap() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let config = Config { request_timeout_secs: 0, ..Config::default_config().unwrap() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_projects() {
        let config = Config { projects: Vec::new(), ..Config::default_config().unwrap() };
        assert!(config.validate().is_err());

        let config = Config { projects: vec![project("a", "1"), project("a", "2")], ..Config::default_config().unwrap() };
        assert!(config.validate().is_err());

        let config = Config { projects: vec![project("a", " ")], ..Config::default_config().unwrap() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let text = format!("{DEFAULT_CONFIG_TOML}\nunexpected = 1\n");
        assert!(toml::from_str::<Config>(&text).is_err());
    }

    #[test]
    fn test_unknown_state_is_rejected() {
        let text = DEFAULT_CONFIG_TOML.replace("\"inCompletion\"", "\"archived\"");
        assert!(toml::from_str::<Config>(&text).is_err());
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_save_default_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        let output_path = Utf8PathBuf::try_from(tmp.path().join("documents.toml")).unwrap();
        Config::save_default(&output_path).unwrap();
        let loaded = Config::load(&Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap(), Some(&output_path)).unwrap();
        assert_eq!(loaded.projects.len(), 2);
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_load_finds_file_in_base_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let base_dir = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        fs::write(
            base_dir.join(DEFAULT_CONFIG_FILE),
            "base_url = \"http://localhost:9000\"\n[[projects]]\nname = \"local\"\nid = \"p1\"\n",
        )
        .unwrap();

        let config = Config::load(&base_dir, None).unwrap();
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.request_timeout_secs, 60);
        assert!(config.default_states.is_empty());
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_load_missing_config_uses_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let base_dir = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        let config = Config::load(&base_dir, None).unwrap();
        assert_eq!(config.projects.len(), 2);
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_load_explicit_missing_file_fails() {
        let missing = Utf8PathBuf::from("/definitely/not/here/documents.toml");
        assert!(Config::load(Utf8Path::new("."), Some(&missing)).is_err());
    }
}
