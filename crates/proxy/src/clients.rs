//! Per-client store credentials.
//!
//! Each client identifier `C` is configured with three environment variables:
//!
//! - `{C}_STORE_URL` - Store domain (`acme.myshopify.com`) or full origin
//!   (`https://acme.myshopify.com`)
//! - `{C}_CLIENT_ID` - OAuth client ID of the store's custom app
//! - `{C}_CLIENT_SECRET` - OAuth client secret of the store's custom app
//!
//! The variables are snapshotted once at startup into a [`ClientDirectory`];
//! [`ClientDirectory::resolve`] builds a fresh [`ClientConfig`] from that
//! snapshot on every call.

use std::collections::{BTreeSet, HashMap};

use fixedscope_core::{ClientId, ClientIdError};
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const STORE_URL_SUFFIX: &str = "STORE_URL";
const CLIENT_ID_SUFFIX: &str = "CLIENT_ID";
const CLIENT_SECRET_SUFFIX: &str = "CLIENT_SECRET";

const SUFFIXES: [&str; 3] = [STORE_URL_SUFFIX, CLIENT_ID_SUFFIX, CLIENT_SECRET_SUFFIX];

/// A client's configuration could not be resolved.
#[derive(Debug, Error)]
pub enum ClientConfigError {
    /// The identifier in the request path is not a valid client identifier.
    #[error("Invalid client identifier: {0}")]
    InvalidClientId(#[from] ClientIdError),

    /// A required variable is missing or blank.
    #[error("Client '{client}' is not configured: {variable} is missing or empty")]
    MissingVariable {
        /// The client being resolved.
        client: ClientId,
        /// Name of the missing environment variable.
        variable: String,
    },

    /// The store URL is not a usable origin.
    #[error("Client '{client}' has an invalid store URL: {reason}")]
    InvalidStoreUrl {
        /// The client being resolved.
        client: ClientId,
        /// Why the URL was rejected.
        reason: String,
    },
}

/// Resolved store credentials for one client.
///
/// Implements `Debug` manually to redact the client secret.
#[derive(Clone)]
pub struct ClientConfig {
    /// The client these credentials belong to.
    pub client: ClientId,
    /// Store origin without trailing slash (e.g., `https://acme.myshopify.com`).
    pub store_origin: String,
    /// OAuth client ID.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: SecretString,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("client", &self.client)
            .field("store_origin", &self.store_origin)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

impl ClientConfig {
    /// URL of the OAuth token endpoint.
    #[must_use]
    pub fn token_url(&self) -> String {
        format!("{}/admin/oauth/access_token", self.store_origin)
    }

    /// URL of an Admin REST resource, e.g. `orders.json`.
    #[must_use]
    pub fn resource_url(&self, api_version: &str, resource: &str) -> String {
        format!(
            "{}/admin/api/{api_version}/{}",
            self.store_origin,
            resource.trim_start_matches('/')
        )
    }
}

/// Snapshot of the per-client environment variables.
#[derive(Debug, Clone, Default)]
pub struct ClientDirectory {
    vars: HashMap<String, String>,
}

impl ClientDirectory {
    /// Snapshot per-client variables from the process environment.
    ///
    /// Call after `dotenvy::dotenv()` so `.env` entries are included.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Build a directory from `(name, value)` pairs.
    ///
    /// Only variables ending in one of the per-client suffixes are kept.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| SUFFIXES.iter().any(|suffix| k.ends_with(&format!("_{suffix}"))))
            .collect();

        Self { vars }
    }

    /// Resolve a client's store credentials.
    ///
    /// # Errors
    ///
    /// Returns `ClientConfigError::MissingVariable` if any of the three
    /// variables is missing or blank, or `ClientConfigError::InvalidStoreUrl`
    /// if the store URL is not an `http(s)` origin.
    pub fn resolve(&self, client: &ClientId) -> Result<ClientConfig, ClientConfigError> {
        let store_url = self.required(client, STORE_URL_SUFFIX)?;
        let client_id = self.required(client, CLIENT_ID_SUFFIX)?;
        let client_secret = self.required(client, CLIENT_SECRET_SUFFIX)?;

        let store_origin = normalize_store_url(store_url).map_err(|reason| {
            ClientConfigError::InvalidStoreUrl {
                client: client.clone(),
                reason,
            }
        })?;

        Ok(ClientConfig {
            client: client.clone(),
            store_origin,
            client_id: client_id.to_string(),
            client_secret: SecretString::from(client_secret.to_string()),
        })
    }

    /// Identifiers of every client with a `{C}_STORE_URL` variable, sorted.
    #[must_use]
    pub fn configured_clients(&self) -> Vec<ClientId> {
        let suffix = format!("_{STORE_URL_SUFFIX}");
        self.vars
            .keys()
            .filter_map(|k| k.strip_suffix(&suffix))
            .filter_map(|prefix| ClientId::parse(prefix).ok())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn required(&self, client: &ClientId, suffix: &str) -> Result<&str, ClientConfigError> {
        let variable = client.env_var(suffix);
        self.vars
            .get(&variable)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ClientConfigError::MissingVariable {
                client: client.clone(),
                variable: variable.clone(),
            })
    }
}

/// Turn `acme.myshopify.com`, `https://acme.myshopify.com/` or
/// `http://127.0.0.1:8080` into an origin without trailing slash.
fn normalize_store_url(raw: &str) -> Result<String, String> {
    let candidate = if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };

    let url = Url::parse(&candidate).map_err(|e| e.to_string())?;

    if url.host_str().is_none_or(str::is_empty) {
        return Err("missing host".to_string());
    }
    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err("must not contain a path, query or fragment".to_string());
    }

    Ok(url.origin().ascii_serialization())
}
