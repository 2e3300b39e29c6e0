use core::fmt::{Display, Formatter};

/// The remote resource a request was addressing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Project(String),
    Document { project_id: String, doc_id: String },
}

impl Display for Resource {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Project(id) => write!(f, "project '{id}'"),
            Self::Document { project_id, doc_id } => write!(f, "document '{doc_id}' in project '{project_id}'"),
        }
    }
}

/// Failures talking to the document API.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The API rejected the credentials (HTTP 401 or 403).
    #[error("authentication failed (HTTP {status}); check the username and password")]
    Auth { status: u16 },

    /// The project or document does not exist (HTTP 404).
    #[error("{resource} was not found")]
    NotFound { resource: Resource },

    /// Any other failure: network errors, timeouts, unexpected status codes, malformed responses.
    #[error("{reason}")]
    Transient { reason: String },
}

impl FetchError {
    pub(crate) fn transient(reason: impl Into<String>) -> Self {
        Self::Transient { reason: reason.into() }
    }

    pub(crate) fn malformed(what: &Resource, detail: impl Display) -> Self {
        Self::transient(format!("malformed response for {what}: {detail}"))
    }

    /// Classify a transport-level failure.
    pub(crate) fn from_reqwest(err: &reqwest::Error, what: &Resource) -> Self {
        if err.is_timeout() {
            Self::transient(format!("request for {what} timed out"))
        } else if err.is_decode() {
            Self::malformed(what, err)
        } else {
            Self::transient(format!("request for {what} failed: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert!(FetchError::Auth { status: 401 }.to_string().contains("HTTP 401"));

        let not_found = FetchError::NotFound {
            resource: Resource::Document {
                project_id: "p1".into(),
                doc_id: "d9".into(),
            },
        };
        assert_eq!(not_found.to_string(), "document 'd9' in project 'p1' was not found");

        let malformed = FetchError::malformed(&Resource::Project("p1".into()), "missing 'data' array");
        assert_eq!(malformed.to_string(), "malformed response for project 'p1': missing 'data' array");
        assert!(matches!(malformed, FetchError::Transient { .. }));
    }
}
