//! Retrieval of documents from the extraction API
//!
//! The API exposes a listing endpoint (`/projects/{id}/documents?state=...`) and a detail
//! endpoint (`/projects/{id}/documents/{doc_id}`), both guarded by HTTP Basic authentication.
//! [`DocumentClient`] wraps the two calls and classifies failures into [`FetchError`] kinds;
//! [`fetch_records`] drives them sequentially for a whole project.
//!
//! Details are reduced to the caller's [`FieldSelection`] before they leave this module:
//! metadata fields are copied as-is and entity fields are flattened into `_`-joined columns.

mod client;
mod collector;
mod credentials;
mod fetch_error;
mod fields;
mod progress;

pub use client::DocumentClient;
pub use collector::fetch_records;
pub use credentials::Credentials;
pub use fetch_error::{FetchError, Resource};
pub use fields::{DocumentState, EntityField, FieldSelection, MetadataField, dedup};
pub use progress::Progress;
