//! Document extraction API client
//!
//! Minimal client for listing a project's documents and fetching a document's details.

use super::{Credentials, DocumentState, FetchError, FieldSelection, Resource};
use crate::flatten::{EntityNode, FlatRecord, Scalar, flatten};
use core::time::Duration;
use ohno::{IntoAppError, bail};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Map, Value};
use url::Url;

const LOG_TARGET: &str = " documents";
const ENTITIES_KEY: &str = "entities";

/// Response of the document listing endpoint; only the ids are kept.
#[derive(Debug, Deserialize)]
struct DocumentList {
    data: Vec<DocumentSummary>,
}

#[derive(Debug, Deserialize)]
struct DocumentSummary {
    id: String,
}

/// Client for the document extraction API.
#[derive(Debug, Clone)]
pub struct DocumentClient {
    client: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
}

impl DocumentClient {
    /// Create a client for the API rooted at `base_url`.
    ///
    /// Every request is bounded by `timeout`.
    pub fn new(base_url: &str, credentials: Credentials, timeout: Duration) -> crate::Result<Self> {
        let base_url = parse_base_url(base_url)?;
        let client = reqwest::Client::builder()
            .user_agent(concat!("get-documents/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .into_app_err("creating the HTTP client")?;

        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    /// List the ids of a project's documents that are in any of `states`.
    ///
    /// An empty `states` selection matches nothing and returns without contacting the API.
    pub async fn list_ids(&self, project_id: &str, states: &[DocumentState]) -> Result<Vec<String>, FetchError> {
        if states.is_empty() {
            log::debug!(target: LOG_TARGET, "No document states selected, skipping listing for project {project_id}");
            return Ok(Vec::new());
        }

        let what = Resource::Project(project_id.to_string());
        let url = self.endpoint(&["projects", project_id, "documents"], &what)?;
        let query: Vec<_> = states.iter().map(|s| ("state", s.as_str())).collect();

        log::info!(target: LOG_TARGET, "Listing documents of project {project_id} in states {}", join_states(states));
        let body = self.get(url, &query, &what).await?;
        let list: DocumentList = serde_json::from_slice(&body).map_err(|e| FetchError::malformed(&what, e))?;

        let ids: Vec<String> = list.data.into_iter().map(|d| d.id).collect();
        log::debug!(target: LOG_TARGET, "Project {project_id} has {} matching document(s)", ids.len());
        Ok(ids)
    }

    /// Fetch a document and reduce it to the selected metadata and flattened entity fields.
    ///
    /// Metadata fields missing from the document are recorded as null; entity fields missing
    /// from the document are left out.
    pub async fn get_detail(&self, project_id: &str, doc_id: &str, selection: &FieldSelection) -> Result<FlatRecord, FetchError> {
        let what = Resource::Document {
            project_id: project_id.to_string(),
            doc_id: doc_id.to_string(),
        };
        let url = self.endpoint(&["projects", project_id, "documents", doc_id], &what)?;

        log::debug!(target: LOG_TARGET, "Fetching {what}");
        let body = self.get(url, &[], &what).await?;
        let document = match serde_json::from_slice::<Value>(&body).map_err(|e| FetchError::malformed(&what, e))? {
            Value::Object(map) => map,
            _ => return Err(FetchError::malformed(&what, "expected a JSON object")),
        };

        project_document(document, selection).map_err(|detail| FetchError::malformed(&what, detail))
    }

    fn endpoint(&self, segments: &[&str], what: &Resource) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| FetchError::transient(format!("cannot build a request URL for {what}")))?;
            let _ = path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    async fn get(&self, url: Url, query: &[(&str, &str)], what: &Resource) -> Result<Vec<u8>, FetchError> {
        let resp = self
            .client
            .get(url)
            .query(query)
            .basic_auth(self.credentials.username(), Some(self.credentials.password()))
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(&e, what))?;

        let status = resp.status();
        if !status.is_success() {
            log::debug!(target: LOG_TARGET, "Request for {what} returned HTTP {status}");
            return Err(classify_status(status, what));
        }

        let body = resp.bytes().await.map_err(|e| FetchError::from_reqwest(&e, what))?;
        Ok(body.to_vec())
    }
}

fn classify_status(status: StatusCode, what: &Resource) -> FetchError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => FetchError::Auth { status: status.as_u16() },
        StatusCode::NOT_FOUND => FetchError::NotFound { resource: what.clone() },
        _ => FetchError::transient(format!("unexpected HTTP status {status} for {what}")),
    }
}

/// Project a raw document onto the selected fields.
fn project_document(mut document: Map<String, Value>, selection: &FieldSelection) -> Result<FlatRecord, String> {
    let mut record: FlatRecord = selection
        .metadata
        .iter()
        .map(|field| (field.as_str(), document.remove(field.as_str()).map_or(Scalar::Null, Scalar::from_json)))
        .collect();

    match document.remove(ENTITIES_KEY) {
        Some(Value::Object(mut entities)) => {
            let selected: Vec<(String, EntityNode)> = selection
                .entities
                .iter()
                .filter_map(|field| {
                    entities
                        .remove(field.as_str())
                        .map(|v| (field.as_str().to_string(), EntityNode::from_json(v)))
                })
                .collect();

            record.extend(flatten(&selected).map_err(|e| e.to_string())?);
        }
        Some(Value::Null) | None => {}
        Some(_) => return Err(format!("'{ENTITIES_KEY}' is not an object")),
    }

    Ok(record)
}

fn parse_base_url(base_url: &str) -> crate::Result<Url> {
    let url = Url::parse(base_url).into_app_err_with(|| format!("invalid API base URL '{base_url}'"))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        bail!("API base URL '{base_url}' must be an http or https URL");
    }
    Ok(url)
}

fn join_states(states: &[DocumentState]) -> String {
    states.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
}
