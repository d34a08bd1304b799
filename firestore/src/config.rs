//! Firestore connection settings.

use crate::error::FirestoreError;
use std::time::Duration;
use waymark_markers::MarkerId;

/// Public Firestore REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Database used when none is configured.
pub const DEFAULT_DATABASE: &str = "(default)";

/// Collection the markers live in.
pub const DEFAULT_COLLECTION: &str = "markers";

/// Documents requested per list page.
pub const DEFAULT_PAGE_SIZE: u32 = 300;

/// Per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where and how to reach the marker collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FirestoreConfig {
    /// REST endpoint, without a trailing slash.
    pub base_url: String,
    /// Google Cloud project id.
    pub project_id: String,
    /// Database id.
    pub database: String,
    /// Collection id.
    pub collection: String,
    /// Web API key, sent as the `key` query parameter.
    pub api_key: Option<String>,
    /// OAuth access token, sent as a bearer token.
    pub auth_token: Option<String>,
    /// Page size for listing.
    pub page_size: u32,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl FirestoreConfig {
    /// Settings for `project_id` with every other value at its default.
    #[must_use]
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            project_id: project_id.into(),
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            api_key: None,
            auth_token: None,
            page_size: DEFAULT_PAGE_SIZE,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Load settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `FirestoreError::MissingProjectId` if `FIRESTORE_PROJECT_ID`
    /// is not set, or `InvalidConfig` if a numeric variable does not parse.
    pub fn from_env() -> Result<Self, FirestoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through `lookup`, which maps a variable name to its
    /// value.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `FIRESTORE_PROJECT_ID` | required |
    /// | `FIRESTORE_API_KEY` | none |
    /// | `FIRESTORE_AUTH_TOKEN` | none |
    /// | `FIRESTORE_DATABASE` | `(default)` |
    /// | `FIRESTORE_COLLECTION` | `markers` |
    /// | `FIRESTORE_BASE_URL` | `https://firestore.googleapis.com/v1` |
    /// | `FIRESTORE_PAGE_SIZE` | `300` |
    /// | `FIRESTORE_TIMEOUT_SECS` | `10` |
    ///
    /// Empty values count as unset.
    ///
    /// # Errors
    ///
    /// See [`FirestoreConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, FirestoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let project_id = get("FIRESTORE_PROJECT_ID").ok_or(FirestoreError::MissingProjectId)?;
        let mut config = Self::new(project_id);

        if let Some(base_url) = get("FIRESTORE_BASE_URL") {
            config = config.with_base_url(base_url);
        }
        if let Some(database) = get("FIRESTORE_DATABASE") {
            config.database = database;
        }
        if let Some(collection) = get("FIRESTORE_COLLECTION") {
            config.collection = collection;
        }
        config.api_key = get("FIRESTORE_API_KEY");
        config.auth_token = get("FIRESTORE_AUTH_TOKEN");

        if let Some(raw) = get("FIRESTORE_PAGE_SIZE") {
            let page_size = raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or_else(|| FirestoreError::InvalidConfig {
                    key: "FIRESTORE_PAGE_SIZE",
                    message: format!("expected a positive integer, got '{raw}'"),
                })?;
            config.page_size = page_size;
        }
        if let Some(raw) = get("FIRESTORE_TIMEOUT_SECS") {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| FirestoreError::InvalidConfig {
                    key: "FIRESTORE_TIMEOUT_SECS",
                    message: e.to_string(),
                })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Use another endpoint (an emulator, a test server).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Use another collection.
    #[must_use]
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Send a web API key with every request.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Send a bearer token with every request.
    #[must_use]
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Change the list page size.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// URL of the marker collection.
    #[must_use]
    pub fn collection_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/{}/documents/{}",
            self.base_url, self.project_id, self.database, self.collection
        )
    }

    /// URL of one marker document.
    #[must_use]
    pub fn document_url(&self, id: &MarkerId) -> String {
        format!("{}/{}", self.collection_url(), id)
    }
}
