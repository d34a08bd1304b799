//! Firestore marker store implementation

use crate::{
    config::FirestoreConfig,
    document::{Document, ErrorResponse, ListDocumentsResponse},
    error::FirestoreError,
};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use std::sync::Arc;
use waymark_markers::{Marker, MarkerId, MarkerStore, NewMarker};

/// Marker store backed by a Firestore collection
///
/// Cloning is cheap; clones share the HTTP connection pool.
#[derive(Clone, Debug)]
pub struct FirestoreMarkerStore {
    client: Client,
    config: Arc<FirestoreConfig>,
}

impl FirestoreMarkerStore {
    /// Create a store with settings from the environment
    ///
    /// # Errors
    ///
    /// Returns `FirestoreError::MissingProjectId` if `FIRESTORE_PROJECT_ID`
    /// is not set, or any error from [`FirestoreMarkerStore::new`].
    pub fn from_env() -> Result<Self, FirestoreError> {
        Self::new(FirestoreConfig::from_env()?)
    }

    /// Create a store with explicit settings
    ///
    /// # Errors
    ///
    /// Returns `FirestoreError::ClientBuild` if the HTTP client cannot be
    /// constructed.
    pub fn new(config: FirestoreConfig) -> Result<Self, FirestoreError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FirestoreError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Settings in use
    #[must_use]
    pub fn config(&self) -> &FirestoreConfig {
        &self.config
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut request = self.client.request(method, url);
        if let Some(key) = &self.config.api_key {
            request = request.query(&[("key", key)]);
        }
        if let Some(token) = &self.config.auth_token {
            request = request.bearer_auth(token);
        }
        request
    }

    async fn send(request: RequestBuilder) -> Result<Response, FirestoreError> {
        let response = request
            .send()
            .await
            .map_err(|e| FirestoreError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FirestoreError::RateLimited);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|envelope| envelope.error.message)
            .unwrap_or(body);
        Err(FirestoreError::ApiError {
            status: status.as_u16(),
            message,
        })
    }

    async fn list_page(
        &self,
        page_token: Option<&str>,
    ) -> Result<ListDocumentsResponse, FirestoreError> {
        let mut request = self
            .request(Method::GET, &self.config.collection_url())
            .query(&[("pageSize", self.config.page_size)]);
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        Self::send(request)
            .await?
            .json::<ListDocumentsResponse>()
            .await
            .map_err(|e| FirestoreError::ResponseParseFailed(e.to_string()))
    }

    /// Fetch every marker document, following page tokens to the end
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, or documents that
    /// are not markers.
    pub async fn list_documents(&self) -> Result<Vec<Marker>, FirestoreError> {
        let mut markers = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0_u32;

        loop {
            let page = self.list_page(page_token.as_deref()).await?;
            pages += 1;
            for document in page.documents {
                markers.push(document.into_marker()?);
            }
            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        tracing::debug!(
            collection = %self.config.collection,
            count = markers.len(),
            pages,
            "Listed marker documents"
        );
        Ok(markers)
    }

    /// Create a marker document and return its server-assigned id
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, or a response
    /// without a document name.
    pub async fn create_document(&self, marker: &NewMarker) -> Result<MarkerId, FirestoreError> {
        let request = self
            .request(Method::POST, &self.config.collection_url())
            .json(&Document::from_new_marker(marker));

        let created = Self::send(request)
            .await?
            .json::<Document>()
            .await
            .map_err(|e| FirestoreError::ResponseParseFailed(e.to_string()))?;

        let id = created.id().ok_or_else(|| FirestoreError::InvalidDocument {
            name: String::new(),
            reason: "created document has no name".to_string(),
        })?;
        tracing::debug!(marker_id = %id, "Created marker document");
        Ok(id)
    }

    /// Delete a marker document
    ///
    /// # Errors
    ///
    /// Returns `FirestoreError::NotFound` if the server reports the document
    /// missing, or errors for network failures and other API errors.
    pub async fn delete_document(&self, id: &MarkerId) -> Result<(), FirestoreError> {
        let request = self.request(Method::DELETE, &self.config.document_url(id));

        match Self::send(request).await {
            Ok(_) => {
                tracing::debug!(marker_id = %id, "Deleted marker document");
                Ok(())
            },
            Err(FirestoreError::ApiError { status: 404, .. }) => {
                Err(FirestoreError::NotFound(id.clone()))
            },
            Err(e) => Err(e),
        }
    }
}

impl MarkerStore for FirestoreMarkerStore {
    async fn list_all(&self) -> waymark_markers::Result<Vec<Marker>> {
        Ok(self.list_documents().await?)
    }

    async fn create(&self, marker: &NewMarker) -> waymark_markers::Result<MarkerId> {
        Ok(self.create_document(marker).await?)
    }

    async fn delete_by_id(&self, id: &MarkerId) -> waymark_markers::Result<()> {
        Ok(self.delete_document(id).await?)
    }
}
