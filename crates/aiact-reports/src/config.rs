//! Configuration for the hosted report backend

use serde::{Deserialize, Serialize};

use crate::error::{ReportsError, Result};

/// Variables read when the layered configuration leaves a field empty.
pub const URL_FALLBACK_VARS: &[&str] = &["SUPABASE_URL", "NEXT_PUBLIC_SUPABASE_URL"];
pub const KEY_FALLBACK_VARS: &[&str] = &["SUPABASE_SERVICE_ROLE_KEY"];

/// Top-level reports configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportsConfig {
    /// Hosted backend configuration
    #[serde(default)]
    pub backend: BackendConfig,
}

/// Hosted backend location and credentials
#[derive(Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project base URL
    #[serde(default)]
    pub url: String,

    /// Service role key used for both the function and the archive table
    #[serde(default)]
    pub service_role_key: String,

    /// Name of the report generation function
    #[serde(default = "default_function_name")]
    pub function_name: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            service_role_key: String::new(),
            function_name: default_function_name(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("url", &self.url)
            .field("service_role_key", &"<redacted>")
            .field("function_name", &self.function_name)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

fn default_function_name() -> String {
    "bright-api".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl BackendConfig {
    /// Fail unless both the URL and the key are present.
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() || self.service_role_key.trim().is_empty() {
            return Err(ReportsError::Config(
                "Missing SUPABASE_URL or SUPABASE_SERVICE_ROLE_KEY".into(),
            ));
        }
        Ok(())
    }

    fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Endpoint of the report generation function
    pub fn function_url(&self) -> String {
        format!("{}/functions/v1/{}", self.base_url(), self.function_name)
    }

    /// REST endpoint of a table
    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url(), table)
    }

    /// Fill empty fields from the fallback variables, using `lookup` to read
    /// them.
    pub fn apply_fallbacks<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |vars: &[&str]| {
            vars.iter()
                .filter_map(|var| lookup(*var))
                .find(|value| !value.trim().is_empty())
        };

        if self.url.trim().is_empty() {
            if let Some(url) = first(URL_FALLBACK_VARS) {
                self.url = url;
            }
        }
        if self.service_role_key.trim().is_empty() {
            if let Some(key) = first(KEY_FALLBACK_VARS) {
                self.service_role_key = key;
            }
        }
    }
}

impl ReportsConfig {
    /// Load configuration: defaults, then the optional file, then `AIACT_*`
    /// environment variables (`__` separates nested keys, e.g.
    /// `AIACT_BACKEND__URL`), then the fallback variables.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&ReportsConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("AIACT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut loaded: ReportsConfig = builder.build()?.try_deserialize()?;
        loaded.backend.apply_fallbacks(|var| std::env::var(var).ok());
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> BackendConfig {
        BackendConfig {
            url: "https://project.supabase.co/".into(),
            service_role_key: "service-key".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = ReportsConfig::default();
        assert_eq!(config.backend.function_name, "bright-api");
        assert_eq!(config.backend.request_timeout_secs, 30);
        assert!(config.backend.url.is_empty());
    }

    #[test]
    fn test_validate_requires_url_and_key() {
        let err = BackendConfig::default().validate().unwrap_err();
        assert!(err
            .to_string()
            .contains("Missing SUPABASE_URL or SUPABASE_SERVICE_ROLE_KEY"));
        assert!(configured().validate().is_ok());
    }

    #[test]
    fn test_endpoints_strip_trailing_slash() {
        let backend = configured();
        assert_eq!(
            backend.function_url(),
            "https://project.supabase.co/functions/v1/bright-api"
        );
        assert_eq!(
            backend.table_url("compliance_packages"),
            "https://project.supabase.co/rest/v1/compliance_packages"
        );
    }

    #[test]
    fn test_fallbacks_fill_only_empty_fields() {
        let lookup = |var: &str| match var {
            "SUPABASE_URL" => Some(String::new()),
            "NEXT_PUBLIC_SUPABASE_URL" => Some("https://public.supabase.co".to_string()),
            "SUPABASE_SERVICE_ROLE_KEY" => Some("from-env".to_string()),
            _ => None,
        };

        let mut empty = BackendConfig::default();
        empty.apply_fallbacks(lookup);
        assert_eq!(empty.url, "https://public.supabase.co");
        assert_eq!(empty.service_role_key, "from-env");

        let mut set = configured();
        set.apply_fallbacks(lookup);
        assert_eq!(set.service_role_key, "service-key");
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", configured());
        assert!(!rendered.contains("service-key"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports.toml");
        std::fs::write(
            &path,
            "[backend]\nfunction_name = \"render-package\"\nrequest_timeout_secs = 12\n",
        )
        .unwrap();

        let config = ReportsConfig::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.backend.function_name, "render-package");
        assert_eq!(config.backend.request_timeout_secs, 12);
    }
}
