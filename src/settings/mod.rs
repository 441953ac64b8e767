//! Configuration resolution.
//!
//! Settings are resolved once at process start by overlaying four
//! sources, lowest to highest precedence:
//! - built-in defaults
//! - the local `.env` override file, if present
//! - the process environment
//! - a remote secret bundle, fetched only inside the hosting platform
//!
//! The resolved [`Settings`] value is immutable for the remainder of
//! the process lifetime; nothing reads ambient environment state after
//! resolution completes.

use std::collections::HashMap;
use std::env;

use crate::secrets::{self, SecretBundle, SecretsError};

/// Environment name interpolated into responses.
pub const KEY_ENVIRONMENT: &str = "ENVIRONMENT";
/// API title used in the root welcome message.
pub const KEY_API_TITLE: &str = "API_TITLE";
/// Human-readable description of the API.
pub const KEY_API_DESCRIPTION: &str = "API_DESCRIPTION";
/// Advertised API version.
pub const KEY_API_VERSION: &str = "API_VERSION";
/// Debug flag.
pub const KEY_DEBUG: &str = "DEBUG";
/// Tracing filter directive for the log subscriber.
pub const KEY_LOG_LEVEL: &str = "LOG_LEVEL";

/// Keys recognized by the resolver. Pairs under any other key in an
/// override file or secret bundle are ignored.
const KNOWN_KEYS: [&str; 6] = [
    KEY_ENVIRONMENT,
    KEY_API_TITLE,
    KEY_API_DESCRIPTION,
    KEY_API_VERSION,
    KEY_DEBUG,
    KEY_LOG_LEVEL,
];

const DEFAULT_ENVIRONMENT: &str = "development";
const DEFAULT_API_TITLE: &str = "Hello World API";
const DEFAULT_API_DESCRIPTION: &str = "A simple API that returns hello world messages";
const DEFAULT_DEBUG: &str = "false";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Local override file consulted during resolution.
const ENV_FILE: &str = ".env";

/// Marker variable set by the hosting platform on every deployment.
/// Its presence selects whether the secret bundle fetch is attempted.
const PLATFORM_MARKER: &str = "VERCEL";

/// Region variable for the remote secret client.
const REGION_VAR: &str = "AWS_REGION";
const DEFAULT_REGION: &str = "us-east-1";

/// Resolved, immutable configuration for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Environment name interpolated into responses.
    pub environment: String,
    /// API title used in the root welcome message.
    pub api_title: String,
    /// Human-readable description of the API.
    pub api_description: String,
    /// Advertised API version.
    pub api_version: String,
    /// Debug flag. Resolved and reported at startup, nothing else
    /// keys off it.
    pub debug: bool,
    /// Tracing filter directive for the log subscriber.
    pub log_level: String,
}

impl Settings {
    /// Resolve configuration from all real sources.
    ///
    /// The log subscriber is installed after the local layers are read
    /// (so a `LOG_LEVEL` from the override file is honored) but before
    /// the remote fetch (so fetch failures land in the logs). Any
    /// secret-fetch failure is logged and swallowed: the service must
    /// start whether or not the secret store is reachable. The resolved
    /// values are reported in a final "settings resolved" line, so
    /// every entry point records what it is running with.
    pub async fn load() -> Self {
        let mut resolver = Resolver::from_defaults();

        if let Some(pairs) = load_env_file(ENV_FILE) {
            resolver.overlay(pairs);
        }
        resolver.overlay(process_env());

        crate::logging::init(resolver.get(KEY_LOG_LEVEL).unwrap_or(DEFAULT_LOG_LEVEL));

        if running_on_platform() {
            let environment = resolver
                .get(KEY_ENVIRONMENT)
                .unwrap_or(DEFAULT_ENVIRONMENT)
                .to_string();
            let name = bundle_name(&environment);
            let region = secret_region();
            tracing::info!(%name, %region, "fetching secret bundle");
            resolver.apply_secret_bundle(secrets::fetch_bundle(&region, &name).await);
        }

        let settings = resolver.finish();
        tracing::info!(
            title = %settings.api_title,
            description = %settings.api_description,
            version = %settings.api_version,
            environment = %settings.environment,
            debug = settings.debug,
            "settings resolved"
        );
        settings
    }
}

/// Accumulates configuration layers before producing [`Settings`].
///
/// Later overlays win, which gives the resolver its precedence order:
/// whatever is applied last shadows everything before it.
#[derive(Debug)]
pub struct Resolver {
    values: HashMap<&'static str, String>,
}

impl Resolver {
    /// Start from the built-in defaults.
    ///
    /// The advertised API version defaults to the crate version so it
    /// tracks releases without a separate bump.
    pub fn from_defaults() -> Self {
        let mut values = HashMap::new();
        values.insert(KEY_ENVIRONMENT, DEFAULT_ENVIRONMENT.to_string());
        values.insert(KEY_API_TITLE, DEFAULT_API_TITLE.to_string());
        values.insert(KEY_API_DESCRIPTION, DEFAULT_API_DESCRIPTION.to_string());
        values.insert(KEY_API_VERSION, crate::version().to_string());
        values.insert(KEY_DEBUG, DEFAULT_DEBUG.to_string());
        values.insert(KEY_LOG_LEVEL, DEFAULT_LOG_LEVEL.to_string());
        Resolver { values }
    }

    /// Overlay key/value pairs from the next configuration layer.
    /// Unknown keys are dropped.
    pub fn overlay<I, K, V>(&mut self, pairs: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in pairs {
            if let Some(&known) = KNOWN_KEYS.iter().find(|&&k| k == key.as_ref()) {
                self.values.insert(known, value.into());
            }
        }
        self
    }

    /// Overlay the outcome of the secret bundle fetch.
    ///
    /// Failures are logged and swallowed; resolution proceeds with
    /// whatever values are already set.
    pub fn apply_secret_bundle(
        &mut self,
        outcome: Result<SecretBundle, SecretsError>,
    ) -> &mut Self {
        match outcome {
            Ok(bundle) => {
                tracing::info!(pairs = bundle.len(), "applying secret bundle overrides");
                self.overlay(bundle)
            }
            Err(err @ SecretsError::NotFound { .. }) => {
                tracing::warn!(error = %err, "secret bundle not found, continuing with local settings");
                self
            }
            Err(err) => {
                tracing::error!(error = %err, "secret bundle fetch failed, continuing with local settings");
                self
            }
        }
    }

    /// Current value of a key mid-resolution.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Finalize the accumulated layers into an immutable [`Settings`].
    pub fn finish(&self) -> Settings {
        Settings {
            environment: self.value(KEY_ENVIRONMENT),
            api_title: self.value(KEY_API_TITLE),
            api_description: self.value(KEY_API_DESCRIPTION),
            api_version: self.value(KEY_API_VERSION),
            debug: parse_flag(&self.value(KEY_DEBUG)),
            log_level: self.value(KEY_LOG_LEVEL),
        }
    }

    // Every known key is seeded in from_defaults, so lookups cannot miss.
    fn value(&self, key: &'static str) -> String {
        self.values.get(key).cloned().unwrap_or_default()
    }
}

/// Read the local override file, if present.
///
/// Uses the iterator API so resolution never mutates the process
/// environment. A missing file is not an error; a malformed line is
/// skipped.
pub fn load_env_file(path: &str) -> Option<Vec<(String, String)>> {
    let iter = dotenvy::from_filename_iter(path).ok()?;
    let mut pairs = Vec::new();
    for item in iter {
        match item {
            Ok(pair) => pairs.push(pair),
            Err(err) => {
                tracing::warn!(path, error = %err, "skipping malformed line in override file");
            }
        }
    }
    Some(pairs)
}

/// Read the known settings keys from the process environment.
pub fn process_env() -> Vec<(String, String)> {
    KNOWN_KEYS
        .iter()
        .filter_map(|key| env::var(key).ok().map(|value| (key.to_string(), value)))
        .collect()
}

/// True when executing inside the hosting platform.
pub fn running_on_platform() -> bool {
    env::var_os(PLATFORM_MARKER).is_some()
}

/// Region for the remote secret client.
fn secret_region() -> String {
    env::var(REGION_VAR).unwrap_or_else(|_| DEFAULT_REGION.to_string())
}

/// Secret bundle identifier derived from the environment name.
fn bundle_name(environment: &str) -> String {
    format!("hello-world-api/{environment}")
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
