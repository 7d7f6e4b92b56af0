//! Agent configuration: the cache version name, the scope the agent governs,
//! the asset manifest to pre-populate, and the caching policy knobs.
//!
//! Configuration is fixed for the lifetime of an agent version. It can be
//! built in code (struct literal or builder) or loaded from a YAML file:
//!
//! ```yaml
//! cache_name: myapp-shell-v1
//! scope: https://example.com/myapp/
//! manifest:
//!   - index.html
//!   - manifest.json
//!   - icon-192.png
//! policy:
//!   eager_activate: true
//! ```

use derive_builder::Builder;
use serde::Deserialize;
use std::{fs, path};
use url::Url;

use crate::policy::CachePolicy;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
    #[error("Invalid scope `{0}`: {1}")]
    InvalidScope(Url, String),
    #[error("Manifest path `{0}` does not resolve against the scope")]
    ManifestPath(String),
}

#[derive(Builder, Debug, Clone, Deserialize, PartialEq)]
#[builder(public, setter(into))]
pub struct AgentConfig {
    /// Name of the current cache bucket. Bump it to refresh everything:
    /// buckets with any other name are deleted on activation.
    pub cache_name: String,
    /// Origin-plus-prefix the agent governs. Must be http(s) and end with a
    /// trailing slash, since manifest paths resolve against it.
    pub scope: Url,
    /// Paths pre-populated at install time. Relative paths resolve under the
    /// scope directory; a leading slash resolves from the origin root.
    pub manifest: Vec<String>,
    #[builder(default)]
    #[serde(default)]
    pub policy: CachePolicy,
}

impl AgentConfig {
    /// Load a configuration from a YAML file.
    pub fn from_yaml(
        config_file_path: impl AsRef<path::Path>,
    ) -> Result<Self, ConfigError> {
        let content: String = fs::read_to_string(config_file_path)?;
        let config: AgentConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the scope is usable as a join base.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.scope.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidScope(
                self.scope.clone(),
                "scheme must be http or https".to_string(),
            ));
        }
        if !self.scope.path().ends_with('/') {
            return Err(ConfigError::InvalidScope(
                self.scope.clone(),
                "path must end with a trailing slash".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve every manifest path into an absolute asset URL.
    pub fn asset_urls(&self) -> Result<Vec<Url>, ConfigError> {
        self.manifest
            .iter()
            .map(|p| {
                self.scope
                    .join(p)
                    .map_err(|_| ConfigError::ManifestPath(p.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn scope() -> Url {
        Url::parse("https://example.com/myapp/").unwrap()
    }

    #[test]
    fn test_builder_defaults_policy() {
        let config = AgentConfigBuilder::default()
            .cache_name("myapp-shell-v1")
            .scope(scope())
            .manifest(vec!["index.html".to_string()])
            .build()
            .unwrap();

        assert_eq!(config.policy, CachePolicy::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_yaml_config() {
        let yaml = r#"
cache_name: myapp-shell-v1
scope: https://example.com/myapp/
manifest:
  - index.html
  - manifest.json
policy:
  eager_activate: true
"#;
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("agent.yml");
        let mut file = File::create(&config_path).unwrap();
        write!(file, "{yaml}").unwrap();

        let config = AgentConfig::from_yaml(&config_path).unwrap();
        assert_eq!(config.cache_name, "myapp-shell-v1");
        assert_eq!(config.manifest.len(), 2);
        assert!(config.policy.eager_activate);
        // unspecified knobs keep their defaults
        assert!(config.policy.exact_path_match);
    }

    #[test]
    fn test_invalid_yaml() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("agent.yml");
        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "cache_name: : broken").unwrap();

        assert!(matches!(
            AgentConfig::from_yaml(&config_path),
            Err(ConfigError::YamlParse(_))
        ));
    }

    #[test]
    fn test_scope_must_end_with_slash() {
        let config = AgentConfigBuilder::default()
            .cache_name("v1")
            .scope(Url::parse("https://example.com/myapp").unwrap())
            .manifest(Vec::<String>::new())
            .build()
            .unwrap();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidScope(_, _))
        ));
    }

    #[test]
    fn test_scope_must_be_http() {
        let config = AgentConfigBuilder::default()
            .cache_name("v1")
            .scope(Url::parse("ftp://example.com/").unwrap())
            .manifest(Vec::<String>::new())
            .build()
            .unwrap();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidScope(_, _))
        ));
    }

    #[test]
    fn test_asset_urls_resolution() {
        let config = AgentConfigBuilder::default()
            .cache_name("v1")
            .scope(scope())
            .manifest(vec![
                "index.html".to_string(),
                "/rooted/icon.png".to_string(),
            ])
            .build()
            .unwrap();

        let urls = config.asset_urls().unwrap();
        assert_eq!(urls[0].as_str(), "https://example.com/myapp/index.html");
        assert_eq!(urls[1].as_str(), "https://example.com/rooted/icon.png");
    }
}
