use clap::ValueEnum;
use serde::Deserialize;
use strum::{Display, EnumIter, IntoStaticStr};

/// Workflow state of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr, ValueEnum, Deserialize)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
#[value(rename_all = "camelCase")]
pub enum DocumentState {
    /// Extraction finished, waiting for a human review
    ReviewRequired,

    /// Being completed by a reviewer
    InCompletion,

    /// Fully extracted
    Extracted,
}

/// Top-level document attribute that can be exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr, ValueEnum, Deserialize)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
#[value(rename_all = "camelCase")]
pub enum MetadataField {
    State,
    ProjectId,
    Id,
    FileName,
    UploadedAt,
}

/// Extracted business field that can be exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr, ValueEnum, Deserialize)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
#[value(rename_all = "camelCase")]
pub enum EntityField {
    DeliveredAt,
    IssuedAt,
    Type,
    Totals,
    Number,
    Sender,
    Vendor,
    RecipientCompany,
    Recipient,
    GgId,
}

impl DocumentState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

impl MetadataField {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

impl EntityField {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// The document attributes to export, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSelection {
    pub metadata: Vec<MetadataField>,
    pub entities: Vec<EntityField>,
}

impl FieldSelection {
    /// Build a selection, dropping repeated fields while keeping first occurrences in place.
    #[must_use]
    pub fn new(metadata: impl IntoIterator<Item = MetadataField>, entities: impl IntoIterator<Item = EntityField>) -> Self {
        Self {
            metadata: dedup(metadata),
            entities: dedup(entities),
        }
    }
}

/// Remove repeated items while keeping first occurrences in place.
pub fn dedup<T: PartialEq>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut result = Vec::new();
    for item in items {
        if !result.contains(&item) {
            result.push(item);
        }
    }
    result
}
