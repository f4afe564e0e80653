//! The Coredata API client.
//!
//! [`CoredataClient`] holds the validated host, the credential pair, and one
//! `reqwest` client, and offers the four document operations: `create`,
//! `get` (single, collection, sub-collection, and fully-drained pagination),
//! `edit`, and `delete`. It is stateless between calls: no caching, no
//! retries, no session beyond the credentials held for its lifetime.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::config::Credentials;
use crate::entity::Entity;
use crate::error::CoredataError;
use crate::query::add_url_parameters;

/// Default page size for collection reads.
pub const DEFAULT_LIMIT: u64 = 20;

/// How the entity-identifier segment terminates in a composed URL.
///
/// The API wants `.../{id}/` for instance GETs but `.../{id}` for PUT and
/// DELETE. Whether the asymmetry is intentional upstream is an open
/// question; it is preserved here exactly as observed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum IdSegment {
    /// `{id}/`, used by reads.
    Trailing,
    /// `{id}`, used by writes.
    Bare,
}

/// The collection envelope returned by the API for paginated reads.
#[derive(Debug, Deserialize)]
struct Envelope {
    objects: Vec<Value>,
    meta: Meta,
}

#[derive(Debug, Deserialize)]
struct Meta {
    next: Option<String>,
}

/// The error body the API attaches to server-side failures.
#[derive(Debug, Deserialize)]
struct ApiError {
    error_message: String,
}

/// Parameters for a [`CoredataClient::get`] call.
///
/// Built fluently; only the entity is required. Defaults are offset 0,
/// limit [`DEFAULT_LIMIT`], no filter terms, `sync` on.
///
/// # Example
///
/// ```rust
/// use coredata_api::{Entity, GetRequest};
///
/// let request = GetRequest::new(Entity::Projects)
///     .term("title__startswith", "Q3")
///     .limit(50);
/// ```
#[derive(Clone, Debug)]
pub struct GetRequest {
    entity: Entity,
    id: Option<String>,
    sub_entity: Option<Entity>,
    offset: u64,
    limit: u64,
    terms: HashMap<String, String>,
    sync: bool,
}

impl GetRequest {
    /// Creates a request for the given collection with default parameters.
    #[must_use]
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            id: None,
            sub_entity: None,
            offset: 0,
            limit: DEFAULT_LIMIT,
            terms: HashMap::new(),
            sync: true,
        }
    }

    /// Targets one instance instead of the whole collection.
    ///
    /// When an id is set, `limit` and `offset` are not sent.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Targets a collection nested under the instance (e.g. a project's
    /// files). [`Entity::Content`] is not valid here; fetch raw content
    /// with [`CoredataClient::get_content`].
    #[must_use]
    pub const fn sub_entity(mut self, sub_entity: Entity) -> Self {
        self.sub_entity = Some(sub_entity);
        self
    }

    /// Sets the pagination offset for the first page.
    #[must_use]
    pub const fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the page size.
    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// Adds one filter term (e.g. `title__startswith`). Bools and integers
    /// encode as their lowercase/decimal string forms.
    #[must_use]
    pub fn term(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.terms.insert(key.into(), value.to_string());
        self
    }

    /// Merges a whole term set; later insertions win per key.
    #[must_use]
    pub fn terms(mut self, terms: HashMap<String, String>) -> Self {
        self.terms.extend(terms);
        self
    }

    /// Sets the server-side `sync` flag.
    #[must_use]
    pub const fn sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }
}

/// A client for one Coredata deployment.
///
/// Constructed once per host and credential pair; every call is an
/// independent round trip. The client is `Send + Sync`, but it imposes no
/// serialization of overlapping calls of its own.
///
/// # Example
///
/// ```rust,ignore
/// use coredata_api::{CoredataClient, Credentials, Entity, GetRequest};
///
/// let client = CoredataClient::new(
///     "https://example.coredata.is",
///     Credentials::new("alice", "hunter2"),
/// )?;
///
/// // Every project, across all pages.
/// let projects = client.get(&GetRequest::new(Entity::Projects)).await?;
///
/// // One project's files.
/// let files = client
///     .get(&GetRequest::new(Entity::Projects).id(project_id).sub_entity(Entity::Files))
///     .await?;
/// ```
#[derive(Debug)]
pub struct CoredataClient {
    client: reqwest::Client,
    base: Url,
    credentials: Credentials,
}

// Verify CoredataClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CoredataClient>();
};

impl CoredataClient {
    /// Creates a client for `host`, normalizing it to the `/api/v2/` prefix.
    ///
    /// No network call is made here.
    ///
    /// # Errors
    ///
    /// Returns [`CoredataError::InvalidHost`] when the host lacks a scheme
    /// indicator or does not parse as a URL. Scheme detection is
    /// substring-based (`"http"`), matching the upstream client's observed
    /// rule rather than a full URI validation.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created, which
    /// should only happen on TLS initialization failure.
    pub fn new(host: impl AsRef<str>, credentials: Credentials) -> Result<Self, CoredataError> {
        let host = host.as_ref();
        if !host.contains("http") {
            return Err(CoredataError::InvalidHost {
                host: host.to_string(),
            });
        }
        let base = Url::parse(host)
            .and_then(|url| url.join("/api/v2/"))
            .map_err(|_| CoredataError::InvalidHost {
                host: host.to_string(),
            })?;

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .expect("Failed to create HTTP client");

        Ok(Self {
            client,
            base,
            credentials,
        })
    }

    /// Returns the normalized base URL, including the `/api/v2/` prefix.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Creates a new document and returns its identifier.
    ///
    /// The identifier is the final path segment of the `Location` header the
    /// server answers with. The created document is not fetched back;
    /// callers wanting the stored representation should `get` it.
    ///
    /// # Errors
    ///
    /// [`CoredataError::Remote`] when the server reports a failure with an
    /// `error_message` body, [`CoredataError::Status`] for other server-side
    /// failures, [`CoredataError::MissingLocation`] when the success
    /// response carries no `Location` header.
    pub async fn create(
        &self,
        entity: Entity,
        payload: &Value,
        sync: bool,
    ) -> Result<String, CoredataError> {
        let url = add_url_parameters(
            &self.resource_url(entity, None, None, IdSegment::Trailing)?,
            &sync_param(sync),
        );
        tracing::debug!(%url, %entity, "create");

        let response = self
            .client
            .post(url.clone())
            .basic_auth(self.credentials.username(), Some(self.credentials.secret()))
            .json(payload)
            .send()
            .await?;
        let response = fail_on_server_error(&url, response).await?;

        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| CoredataError::MissingLocation {
                url: url.to_string(),
            })?;
        let id = location.rsplit('/').next().unwrap_or(location);
        Ok(id.to_string())
    }

    /// Fetches documents, transparently draining pagination.
    ///
    /// With no id, fetches the whole collection: the server's `meta.next`
    /// continuation is followed page by page, advancing the offset by the
    /// limit, until it reports no further page. The concatenation of all
    /// pages' objects is returned in order. Follow-up pages carry only the
    /// advanced `offset` parameter, matching the upstream client.
    ///
    /// With an id, fetches that single instance; the API answers bare
    /// objects without the collection envelope, which are normalized to a
    /// one-element list.
    ///
    /// # Errors
    ///
    /// [`CoredataError::Status`] on any non-success response, including a
    /// late page of a multi-page drain (no partial result is returned);
    /// [`CoredataError::ContentIsOpaque`] when the sub-entity is
    /// [`Entity::Content`]; [`CoredataError::Decode`] when a response is not
    /// the expected shape.
    pub async fn get(&self, request: &GetRequest) -> Result<Vec<Value>, CoredataError> {
        if request.sub_entity == Some(Entity::Content) {
            return Err(CoredataError::ContentIsOpaque);
        }

        let resource = self.resource_url(
            request.entity,
            request.id.as_deref(),
            request.sub_entity,
            IdSegment::Trailing,
        )?;

        let mut terms = request.terms.clone();
        terms.insert("sync".to_string(), request.sync.to_string());
        if request.id.is_none() {
            terms.insert("limit".to_string(), request.limit.to_string());
            terms.insert("offset".to_string(), request.offset.to_string());
        }

        let url = add_url_parameters(&resource, &terms);
        tracing::debug!(%url, entity = %request.entity, "get");
        let body = self.fetch_json(url).await?;

        // Single-instance responses come back without the envelope.
        if body.get("meta").is_none() {
            return Ok(normalize_single(body));
        }

        let envelope: Envelope = serde_json::from_value(body)?;
        let mut objects = envelope.objects;
        let mut next = envelope.meta.next;
        let mut offset = request.offset;

        while next.is_some() {
            offset += request.limit;
            let page = add_url_parameters(
                &resource,
                &HashMap::from([("offset".to_string(), offset.to_string())]),
            );
            tracing::debug!(%page, offset, "get next page");
            let envelope: Envelope = serde_json::from_value(self.fetch_json(page).await?)?;
            objects.extend(envelope.objects);
            next = envelope.meta.next;
        }

        Ok(objects)
    }

    /// Fetches an instance's raw content bytes.
    ///
    /// This is the `content` sub-entity path: the body is returned exactly
    /// as served, never decoded as JSON.
    ///
    /// # Errors
    ///
    /// [`CoredataError::Status`] on any non-success response.
    pub async fn get_content(
        &self,
        entity: Entity,
        id: &str,
        sync: bool,
    ) -> Result<Vec<u8>, CoredataError> {
        let resource =
            self.resource_url(entity, Some(id), Some(Entity::Content), IdSegment::Trailing)?;
        let url = add_url_parameters(&resource, &sync_param(sync));
        tracing::debug!(%url, %entity, "get content");

        let response = self
            .client
            .get(url.clone())
            .basic_auth(self.credentials.username(), Some(self.credentials.secret()))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CoredataError::Status {
                code: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// Replaces a document with `payload`.
    ///
    /// Nothing is returned on success; the server is not assumed to echo
    /// the updated document, so callers needing the stored state should
    /// `get` it again.
    ///
    /// # Errors
    ///
    /// [`CoredataError::Remote`] when the server reports a failure with an
    /// `error_message` body, [`CoredataError::Status`] for other
    /// server-side failures.
    pub async fn edit(
        &self,
        entity: Entity,
        id: &str,
        payload: &Value,
        sync: bool,
    ) -> Result<(), CoredataError> {
        let url = add_url_parameters(
            &self.resource_url(entity, Some(id), None, IdSegment::Bare)?,
            &sync_param(sync),
        );
        tracing::debug!(%url, %entity, "edit");

        let response = self
            .client
            .put(url.clone())
            .basic_auth(self.credentials.username(), Some(self.credentials.secret()))
            .json(payload)
            .send()
            .await?;
        fail_on_server_error(&url, response).await?;
        Ok(())
    }

    /// Deletes a document. Nothing is returned on success.
    ///
    /// # Errors
    ///
    /// [`CoredataError::Remote`] when the server reports a failure with an
    /// `error_message` body, [`CoredataError::Status`] for other
    /// server-side failures.
    pub async fn delete(&self, entity: Entity, id: &str, sync: bool) -> Result<(), CoredataError> {
        let url = add_url_parameters(
            &self.resource_url(entity, Some(id), None, IdSegment::Bare)?,
            &sync_param(sync),
        );
        tracing::debug!(%url, %entity, "delete");

        let response = self
            .client
            .delete(url.clone())
            .basic_auth(self.credentials.username(), Some(self.credentials.secret()))
            .send()
            .await?;
        fail_on_server_error(&url, response).await?;
        Ok(())
    }

    /// Composes the resource path: `/api/v2/` + collection + optional id
    /// segment + optional sub-collection.
    fn resource_url(
        &self,
        entity: Entity,
        id: Option<&str>,
        sub_entity: Option<Entity>,
        id_segment: IdSegment,
    ) -> Result<Url, CoredataError> {
        let mut url = self.base.join(entity.path())?;
        if let Some(id) = id {
            url = match id_segment {
                IdSegment::Trailing => url.join(&format!("{id}/"))?,
                IdSegment::Bare => url.join(id)?,
            };
        }
        if let Some(sub) = sub_entity {
            url = url.join(sub.path())?;
        }
        Ok(url)
    }

    /// Issues a GET and decodes the body as JSON, failing on any
    /// non-success status.
    async fn fetch_json(&self, url: Url) -> Result<Value, CoredataError> {
        let response = self
            .client
            .get(url.clone())
            .basic_auth(self.credentials.username(), Some(self.credentials.secret()))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CoredataError::Status {
                code: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.json().await?)
    }
}

/// Wraps a bare single-instance response in the uniform one-element list.
///
/// The API omits the collection envelope when fetching a single object.
/// The workaround lives in this one adapter so it can be dropped if the
/// upstream response shape is ever fixed.
fn normalize_single(object: Value) -> Vec<Value> {
    vec![object]
}

/// The `sync` flag as a query term set, encoded lowercase.
fn sync_param(sync: bool) -> HashMap<String, String> {
    HashMap::from([("sync".to_string(), sync.to_string())])
}

/// Turns a server-side failure into an error, decoding the server's
/// `error_message` when it supplies one.
async fn fail_on_server_error(
    url: &Url,
    response: reqwest::Response,
) -> Result<reqwest::Response, CoredataError> {
    let status = response.status();
    if !status.is_server_error() {
        return Ok(response);
    }
    let code = status.as_u16();
    match response.json::<ApiError>().await {
        Ok(body) => Err(CoredataError::Remote {
            message: body.error_message,
        }),
        Err(_) => Err(CoredataError::Status {
            code,
            url: url.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> CoredataClient {
        CoredataClient::new(
            "https://example.coredata.is",
            Credentials::new("username", "password"),
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_host_without_scheme() {
        let result = CoredataClient::new(
            "example.coredata.is",
            Credentials::new("username", "password"),
        );
        assert!(matches!(result, Err(CoredataError::InvalidHost { .. })));
    }

    #[test]
    fn test_new_rejects_non_http_scheme() {
        // Scheme detection is substring-based, so a scheme without "http"
        // anywhere in the string is rejected.
        let result = CoredataClient::new(
            "derp://example.coredata.is",
            Credentials::new("username", "password"),
        );
        assert!(matches!(result, Err(CoredataError::InvalidHost { .. })));
    }

    #[test]
    fn test_new_rejects_unparseable_host_containing_http() {
        let result = CoredataClient::new("not a url but http", Credentials::new("u", "p"));
        assert!(matches!(result, Err(CoredataError::InvalidHost { .. })));
    }

    #[test]
    fn test_new_normalizes_host_to_api_prefix() {
        let client = test_client();
        assert_eq!(
            client.base_url().as_str(),
            "https://example.coredata.is/api/v2/"
        );
    }

    #[test]
    fn test_new_replaces_existing_path_with_api_prefix() {
        let client = CoredataClient::new(
            "https://example.coredata.is/somewhere/else",
            Credentials::new("username", "password"),
        )
        .unwrap();
        assert_eq!(
            client.base_url().as_str(),
            "https://example.coredata.is/api/v2/"
        );
    }

    #[test]
    fn test_collection_url_composition() {
        let client = test_client();
        let url = client
            .resource_url(Entity::Projects, None, None, IdSegment::Trailing)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.coredata.is/api/v2/projects/"
        );
    }

    #[test]
    fn test_instance_url_trailing_segment_for_reads() {
        let client = test_client();
        let url = client
            .resource_url(Entity::Projects, Some("abc-123"), None, IdSegment::Trailing)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.coredata.is/api/v2/projects/abc-123/"
        );
    }

    #[test]
    fn test_instance_url_bare_segment_for_writes() {
        let client = test_client();
        let url = client
            .resource_url(Entity::Projects, Some("abc-123"), None, IdSegment::Bare)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.coredata.is/api/v2/projects/abc-123"
        );
    }

    #[test]
    fn test_sub_entity_url_composition() {
        let client = test_client();
        let url = client
            .resource_url(
                Entity::Projects,
                Some("abc-123"),
                Some(Entity::Files),
                IdSegment::Trailing,
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.coredata.is/api/v2/projects/abc-123/files/"
        );
    }

    #[test]
    fn test_sync_param_encodes_lowercase() {
        assert_eq!(sync_param(true)["sync"], "true");
        assert_eq!(sync_param(false)["sync"], "false");
    }

    #[test]
    fn test_normalize_single_wraps_object() {
        let object = serde_json::json!({"id": "abc", "title": "One"});
        let normalized = normalize_single(object.clone());
        assert_eq!(normalized, vec![object]);
    }

    #[test]
    fn test_get_request_defaults() {
        let request = GetRequest::new(Entity::Tasks);
        assert_eq!(request.offset, 0);
        assert_eq!(request.limit, DEFAULT_LIMIT);
        assert!(request.sync);
        assert!(request.id.is_none());
        assert!(request.sub_entity.is_none());
        assert!(request.terms.is_empty());
    }

    #[test]
    fn test_get_request_term_stringifies_values() {
        let request = GetRequest::new(Entity::Tasks)
            .term("done", false)
            .term("priority", 3);
        assert_eq!(request.terms["done"], "false");
        assert_eq!(request.terms["priority"], "3");
    }

    #[tokio::test]
    async fn test_get_rejects_content_sub_entity() {
        let client = test_client();
        let request = GetRequest::new(Entity::Files)
            .id("abc")
            .sub_entity(Entity::Content);
        let result = client.get(&request).await;
        assert!(matches!(result, Err(CoredataError::ContentIsOpaque)));
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CoredataClient>();
    }

    #[test]
    fn test_envelope_decodes_null_next() {
        let envelope: Envelope = serde_json::from_value(serde_json::json!({
            "objects": [{"id": "a"}],
            "meta": {"next": null, "total_count": 1}
        }))
        .unwrap();
        assert_eq!(envelope.objects.len(), 1);
        assert!(envelope.meta.next.is_none());
    }
}
