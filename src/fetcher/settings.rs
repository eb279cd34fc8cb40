//! Layered configuration: built-in defaults, optional TOML file, environment overrides

use super::{FetcherError, Manifest, ManifestEntry, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "xcasset-fetch.toml";
/// Environment variable naming an alternative config file
pub const CONFIG_PATH_ENV: &str = "XCASSET_FETCH_CONFIG";
/// Prefix for environment overrides, e.g. `XCASSET_FETCH__DELAY_MS=0`
pub const ENV_PREFIX: &str = "XCASSET_FETCH";

const DEFAULT_FALLBACK_ROOT: &str =
    "/Users/joeygu/Desktop/pokemon/pokemonLibrary/pokemonLibrary/Assets.xcassets";
const DEFAULT_URL_TEMPLATE: &str = "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork/{id}.png";
const DEFAULT_CRY_URL_TEMPLATE: &str = "https://play.pokemonshowdown.com/audio/cries/{slug}.mp3";

/// Fetcher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Catalog roots probed in order; the first existing one wins
    pub root_candidates: Vec<PathBuf>,
    /// Root used (and created) when no candidate exists
    pub fallback_root: PathBuf,
    /// Folder inside the root holding the image sets
    pub container: String,
    /// Image URL with an `{id}` placeholder
    pub url_template: String,
    /// Extension of the written image files
    pub image_extension: String,
    /// Pause after every entry, in milliseconds
    pub delay_ms: u64,
    /// Request timeout in seconds; unset means wait indefinitely
    pub request_timeout_secs: Option<u64>,
    pub user_agent: String,
    pub manifest: Vec<ManifestEntry>,
    pub cries: CriesConfig,
    pub log: LogConfig,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            root_candidates: vec![
                PathBuf::from("../Assets.xcassets"),
                PathBuf::from("../../Assets.xcassets"),
                PathBuf::from("../../../Assets.xcassets"),
                PathBuf::from("../../../../Assets.xcassets"),
                PathBuf::from("../../../../../Assets.xcassets"),
            ],
            fallback_root: PathBuf::from(DEFAULT_FALLBACK_ROOT),
            container: "Pokemon".to_string(),
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            image_extension: "png".to_string(),
            delay_ms: 500,
            request_timeout_secs: None,
            user_agent: format!("xcasset-fetch/{}", env!("CARGO_PKG_VERSION")),
            manifest: Manifest::default().entries().to_vec(),
            cries: CriesConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl FetcherConfig {
    /// Load configuration from the default file location and the environment
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load_from(&path)
    }

    /// Load configuration from `path` (optional) layered under environment overrides
    pub fn load_from(path: &Path) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the fetch loop cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.container.trim().is_empty() {
            return Err(FetcherError::Config("container must not be empty".into()));
        }
        if self.image_extension.trim().is_empty() {
            return Err(FetcherError::Config(
                "image_extension must not be empty".into(),
            ));
        }
        if !self.url_template.contains("{id}") {
            return Err(FetcherError::Config(format!(
                "url_template has no {{id}} placeholder: {}",
                self.url_template
            )));
        }
        if self.cries.enabled && !self.cries.url_template.contains("{slug}") {
            return Err(FetcherError::Config(format!(
                "cries.url_template has no {{slug}} placeholder: {}",
                self.cries.url_template
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn manifest(&self) -> Manifest {
        Manifest::new(self.manifest.clone())
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Cry audio download settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CriesConfig {
    pub enabled: bool,
    /// Output directory for the `.mp3` files
    pub directory: PathBuf,
    /// Audio URL with a `{slug}` placeholder
    pub url_template: String,
}

impl Default for CriesConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            directory: PathBuf::from("Resources/Sounds"),
            url_template: DEFAULT_CRY_URL_TEMPLATE.to_string(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter used when `RUST_LOG` is unset
    pub filter: String,
    pub format: LogFormat,
    /// Also write daily rolling log files here
    pub directory: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "xcasset_fetch=info".to_string(),
            format: LogFormat::Pretty,
            directory: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_builtin_behaviour() {
        let config = FetcherConfig::default();

        assert_eq!(config.root_candidates.len(), 5);
        assert_eq!(config.root_candidates[0], PathBuf::from("../Assets.xcassets"));
        assert_eq!(config.container, "Pokemon");
        assert_eq!(config.delay(), Duration::from_millis(500));
        assert!(config.request_timeout().is_none());
        assert_eq!(config.manifest().len(), 10);
        assert!(!config.cries.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_template_without_id() {
        let config = FetcherConfig {
            url_template: "https://example.com/static.png".into(),
            ..FetcherConfig::default()
        };

        assert!(matches!(config.validate(), Err(FetcherError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_empty_container() {
        let config = FetcherConfig {
            container: "  ".into(),
            ..FetcherConfig::default()
        };

        assert!(matches!(config.validate(), Err(FetcherError::Config(_))));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = FetcherConfig::load_from(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(config.container, "Pokemon");
        assert_eq!(config.manifest.len(), 10);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xcasset-fetch.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
container = "Sprites"
delay_ms = 0
request_timeout_secs = 15

[[manifest]]
id = 1
name = "A"

[cries]
enabled = true
directory = "sounds"
"#
        )
        .unwrap();

        let config = FetcherConfig::load_from(&path).unwrap();

        assert_eq!(config.container, "Sprites");
        assert_eq!(config.delay_ms, 0);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.manifest, vec![ManifestEntry::new(1, "A")]);
        assert!(config.cries.enabled);
        assert_eq!(config.cries.directory, PathBuf::from("sounds"));
        // untouched keys keep their defaults
        assert_eq!(config.image_extension, "png");
        assert_eq!(config.cries.url_template, DEFAULT_CRY_URL_TEMPLATE);
    }
}
