//! Configuration file loading and source factories.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizshow_core::narration::Locale;
use quizshow_core::traits::{BankSource, SpeechSynthesizer};

use crate::github::{GitHubLocation, GitHubSource};
use crate::local::LocalSource;
use crate::tts::GoogleTranslateTts;

/// Configuration for a single bank source.
///
/// Note: Custom Debug impl masks tokens to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    GitHub {
        owner: String,
        repo: String,
        #[serde(default = "default_github_path")]
        path: String,
        #[serde(default = "default_branch")]
        branch: String,
        #[serde(default)]
        token: Option<String>,
        #[serde(default)]
        api_base_url: Option<String>,
        #[serde(default)]
        raw_base_url: Option<String>,
    },
    Local {
        path: PathBuf,
    },
}

impl std::fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceConfig::GitHub {
                owner,
                repo,
                path,
                branch,
                token,
                api_base_url,
                raw_base_url,
            } => f
                .debug_struct("GitHub")
                .field("owner", owner)
                .field("repo", repo)
                .field("path", path)
                .field("branch", branch)
                .field("token", &token.as_ref().map(|_| "***"))
                .field("api_base_url", api_base_url)
                .field("raw_base_url", raw_base_url)
                .finish(),
            SourceConfig::Local { path } => f.debug_struct("Local").field("path", path).finish(),
        }
    }
}

fn default_github_path() -> String {
    "LISTAS".to_string()
}
fn default_branch() -> String {
    "main".to_string()
}

/// Voice used for narration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// Language code passed to the speech service.
    #[serde(default = "default_lang")]
    pub lang: String,
    /// Accent region, e.g. "com.ar" for Argentine Spanish.
    #[serde(default = "default_tld")]
    pub tld: String,
    /// Language of the narration phrases.
    #[serde(default = "default_locale")]
    pub locale: Locale,
    /// Override for the speech service host.
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_lang() -> String {
    "es".to_string()
}
fn default_tld() -> String {
    "com.ar".to_string()
}
fn default_locale() -> Locale {
    Locale::Es
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            lang: default_lang(),
            tld: default_tld(),
            locale: default_locale(),
            base_url: None,
        }
    }
}

/// Top-level quizshow configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizshowConfig {
    /// Source configurations keyed by name.
    #[serde(default = "default_sources")]
    pub sources: HashMap<String, SourceConfig>,
    /// Source used when none is given.
    #[serde(default = "default_source")]
    pub default_source: String,
    /// Bank loaded when none is given.
    #[serde(default = "default_bank")]
    pub default_bank: String,
    /// Whether narration audio is produced.
    #[serde(default = "default_true")]
    pub audio_enabled: bool,
    #[serde(default)]
    pub voice: VoiceConfig,
}

fn default_sources() -> HashMap<String, SourceConfig> {
    let mut sources = HashMap::new();
    sources.insert(
        "github".to_string(),
        SourceConfig::GitHub {
            owner: "raul752".to_string(),
            repo: "TEST-PREGUNTAS".to_string(),
            path: default_github_path(),
            branch: default_branch(),
            token: None,
            api_base_url: None,
            raw_base_url: None,
        },
    );
    sources
}
fn default_source() -> String {
    "github".to_string()
}
fn default_bank() -> String {
    "CLUB ATLETICO HURACAN.txt".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for QuizshowConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            default_source: default_source(),
            default_bank: default_bank(),
            audio_enabled: true,
            voice: VoiceConfig::default(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    let mut from = 0;
    while let Some(offset) = result[from..].find("${") {
        let start = from + offset;
        let Some(len) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + len];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + len + 1..]);
        from = start + value.len();
    }
    result
}

fn resolve_source_config(config: &SourceConfig) -> SourceConfig {
    match config {
        SourceConfig::GitHub {
            owner,
            repo,
            path,
            branch,
            token,
            api_base_url,
            raw_base_url,
        } => SourceConfig::GitHub {
            owner: resolve_env_vars(owner),
            repo: resolve_env_vars(repo),
            path: resolve_env_vars(path),
            branch: resolve_env_vars(branch),
            token: token
                .as_deref()
                .map(resolve_env_vars)
                .filter(|t| !t.is_empty()),
            api_base_url: api_base_url.as_deref().map(resolve_env_vars),
            raw_base_url: raw_base_url.as_deref().map(resolve_env_vars),
        },
        SourceConfig::Local { path } => SourceConfig::Local {
            path: PathBuf::from(resolve_env_vars(&path.to_string_lossy())),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizshow.toml` in the current directory
/// 2. `~/.config/quizshow/config.toml`
///
/// Environment variable override: `QUIZSHOW_GITHUB_TOKEN`.
pub fn load_config() -> Result<QuizshowConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizshowConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("quizshow.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|dir| dir.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<QuizshowConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => QuizshowConfig::default(),
    };

    config.sources = config
        .sources
        .iter()
        .map(|(k, v)| (k.clone(), resolve_source_config(v)))
        .collect();

    if let Ok(token) = std::env::var("QUIZSHOW_GITHUB_TOKEN") {
        for source in config.sources.values_mut() {
            if let SourceConfig::GitHub { token: t, .. } = source {
                *t = Some(token.clone()).filter(|t| !t.is_empty());
            }
        }
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizshow"))
}

/// Create a bank source from its configuration.
pub fn create_source(name: &str, config: &SourceConfig) -> Result<Box<dyn BankSource>> {
    match config {
        SourceConfig::GitHub {
            owner,
            repo,
            path,
            branch,
            token,
            api_base_url,
            raw_base_url,
        } => {
            if token.is_none() {
                tracing::warn!(
                    source = name,
                    "no GitHub token configured, requests are limited to 60 per hour"
                );
            }
            let location = GitHubLocation {
                owner: owner.clone(),
                repo: repo.clone(),
                path: path.clone(),
                branch: branch.clone(),
            };
            Ok(Box::new(
                GitHubSource::new(location, token.clone())
                    .with_base_urls(api_base_url.clone(), raw_base_url.clone()),
            ))
        }
        SourceConfig::Local { path } => {
            anyhow::ensure!(
                path.is_dir(),
                "source '{name}': not a directory: {}",
                path.display()
            );
            Ok(Box::new(LocalSource::new(path.clone())))
        }
    }
}

/// Create the speech synthesizer described by the voice settings.
pub fn create_synthesizer(voice: &VoiceConfig) -> Box<dyn SpeechSynthesizer> {
    Box::new(GoogleTranslateTts::new(voice.base_url.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_QUIZSHOW_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_QUIZSHOW_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_QUIZSHOW_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${_QUIZSHOW_UNSET_VAR}"), "");
        assert_eq!(resolve_env_vars("no ${closing"), "no ${closing");
        std::env::remove_var("_QUIZSHOW_TEST_VAR");
    }

    #[test]
    fn resolved_value_is_not_expanded_again() {
        std::env::set_var("_QUIZSHOW_NESTED", "${_QUIZSHOW_NESTED}");
        assert_eq!(resolve_env_vars("${_QUIZSHOW_NESTED}!"), "${_QUIZSHOW_NESTED}!");
        std::env::remove_var("_QUIZSHOW_NESTED");
    }

    #[test]
    fn default_config() {
        let config = QuizshowConfig::default();
        assert_eq!(config.default_source, "github");
        assert_eq!(config.default_bank, "CLUB ATLETICO HURACAN.txt");
        assert!(config.audio_enabled);
        assert_eq!(config.voice.tld, "com.ar");
        assert!(matches!(
            config.sources.get("github"),
            Some(SourceConfig::GitHub { .. })
        ));
    }

    #[test]
    fn parse_source_config() {
        let toml_str = r#"
default_source = "local"
default_bank = "history.txt"
audio_enabled = false

[voice]
lang = "en"
tld = "com"
locale = "en"

[sources.github]
type = "github"
owner = "octo"
repo = "banks"
token = "ghp_test"

[sources.local]
type = "local"
path = "banks"
"#;
        let config: QuizshowConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.sources.len(), 2);
        assert!(!config.audio_enabled);
        assert_eq!(config.voice.locale, Locale::En);
        match config.sources.get("github") {
            Some(SourceConfig::GitHub { path, branch, .. }) => {
                assert_eq!(path, "LISTAS");
                assert_eq!(branch, "main");
            }
            other => panic!("unexpected source: {other:?}"),
        }
    }

    #[test]
    fn debug_masks_token() {
        let config = SourceConfig::GitHub {
            owner: "o".into(),
            repo: "r".into(),
            path: "p".into(),
            branch: "main".into(),
            token: Some("ghp_supersecret".into()),
            api_base_url: None,
            raw_base_url: None,
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("supersecret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn explicit_missing_config_fails() {
        let err = load_config_from(Some(Path::new("/no/such/quizshow.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn load_explicit_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizshow.toml");
        std::fs::write(
            &path,
            "default_source = \"local\"\n[sources.local]\ntype = \"local\"\npath = \"banks\"\n",
        )
        .unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.default_source, "local");
        assert_eq!(config.voice.lang, "es");
    }

    #[test]
    fn local_source_requires_directory() {
        let err = create_source(
            "local",
            &SourceConfig::Local {
                path: PathBuf::from("/no/such/banks"),
            },
        )
        .err()
        .unwrap();
        assert!(err.to_string().contains("not a directory"));
    }
}
