// Text frame envelope and egress response envelopes (spec §4.A, §6).

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    Missing,
    Invalid(String),
}

impl fmt::Display for VersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionError::Missing => write!(f, "missing version"),
            VersionError::Invalid(_) => write!(f, "invalid version"),
        }
    }
}

impl std::error::Error for VersionError {}

#[derive(Debug)]
pub enum EnvelopeParseError {
    Json(serde_json::Error),
    Version(VersionError),
    MissingType,
}

impl fmt::Display for EnvelopeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvelopeParseError::Json(e) => write!(f, "invalid JSON: {e}"),
            EnvelopeParseError::Version(e) => write!(f, "{e}"),
            EnvelopeParseError::MissingType => write!(f, "missing type"),
        }
    }
}

impl std::error::Error for EnvelopeParseError {}

/// A decoded text frame: `{version, type, payload}`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextEnvelope {
    pub version: String,
    pub kind: String,
    pub payload: serde_json::Value,
}

impl TextEnvelope {
    /// Parse a text frame, validating presence and well-formedness of the
    /// `version` field per spec §4.A. Does NOT check the field against a
    /// minimum version — that is the version gate's job (component B).
    pub fn parse(text: &str) -> Result<Self, EnvelopeParseError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(EnvelopeParseError::Json)?;
        let version = value
            .get("version")
            .and_then(serde_json::Value::as_str)
            .ok_or(EnvelopeParseError::Version(VersionError::Missing))?;
        semver::Version::parse(version)
            .map_err(|_| EnvelopeParseError::Version(VersionError::Invalid(version.to_owned())))?;
        let kind = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .ok_or(EnvelopeParseError::MissingType)?
            .to_owned();
        let payload = value.get("payload").cloned().unwrap_or(serde_json::Value::Null);
        Ok(Self {
            version: version.to_owned(),
            kind,
            payload,
        })
    }

    #[must_use]
    pub fn parsed_version(&self) -> Option<semver::Version> {
        semver::Version::parse(&self.version).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OkResponse {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cached: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptedResponse {
    pub status: u16,
    pub message: String,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub pending: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub retry: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionErrorDetails {
    pub received: String,
    pub info: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionRejectedResponse {
    pub status: u16,
    pub error: String,
    pub reason: String,
    pub details: VersionErrorDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnauthorizedResponse {
    pub status: u16,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreconditionRequiredResponse {
    pub status: u16,
    pub message: String,
    pub reason: String,
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalErrorResponse {
    pub status: u16,
    pub message: String,
    pub reason: String,
}

/// Closed sum type over every egress response envelope shape (spec §6).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IngestResponse {
    Ok(OkResponse),
    Accepted(AcceptedResponse),
    VersionRejected(VersionRejectedResponse),
    Unauthorized(UnauthorizedResponse),
    PreconditionRequired(PreconditionRequiredResponse),
    Internal(InternalErrorResponse),
}

impl IngestResponse {
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self::Ok(OkResponse {
            status: 200,
            message: message.into(),
            reason: None,
            cached: None,
        })
    }

    #[must_use]
    pub fn duplicate_checksum() -> Self {
        Self::Ok(OkResponse {
            status: 200,
            message: "duplicate checksum".to_owned(),
            reason: Some("duplicate_checksum".to_owned()),
            cached: Some(true),
        })
    }

    #[must_use]
    pub fn waiting_for_database() -> Self {
        Self::Accepted(AcceptedResponse {
            status: 202,
            message: "database already requested".to_owned(),
            reason: "waiting_for_database".to_owned(),
            pending: None,
            retry: Some(true),
            timeout: None,
        })
    }

    #[must_use]
    pub fn already_loading() -> Self {
        Self::Accepted(AcceptedResponse {
            status: 202,
            message: "a database ingest is already in progress".to_owned(),
            reason: "already_loading".to_owned(),
            pending: None,
            retry: Some(true),
            timeout: None,
        })
    }

    #[must_use]
    pub fn awaiting_database_zip() -> Self {
        Self::Accepted(AcceptedResponse {
            status: 202,
            message: "waiting for accompanying database_zip".to_owned(),
            reason: "awaiting_database_zip".to_owned(),
            pending: Some(true),
            retry: None,
            timeout: Some(5000),
        })
    }

    #[must_use]
    pub fn version_rejected(received: impl Into<String>, info: impl Into<String>) -> Self {
        Self::VersionRejected(VersionRejectedResponse {
            status: 400,
            error: "Protocol version check failed".to_owned(),
            reason: "version_too_old".to_owned(),
            details: VersionErrorDetails {
                received: received.into(),
                info: info.into(),
            },
        })
    }

    #[must_use]
    pub fn malformed_version(received: impl Into<String>, info: impl Into<String>) -> Self {
        Self::VersionRejected(VersionRejectedResponse {
            status: 400,
            error: "Protocol version check failed".to_owned(),
            reason: "invalid_version".to_owned(),
            details: VersionErrorDetails {
                received: received.into(),
                info: info.into(),
            },
        })
    }

    #[must_use]
    pub fn unauthorized() -> Self {
        Self::Unauthorized(UnauthorizedResponse {
            status: 401,
            message: "Access not authorized".to_owned(),
        })
    }

    #[must_use]
    pub fn precondition_required(missing: Vec<String>) -> Self {
        Self::PreconditionRequired(PreconditionRequiredResponse {
            status: 428,
            message: "Precondition Required: Missing required data".to_owned(),
            reason: "missing_preconditions".to_owned(),
            missing,
        })
    }

    #[must_use]
    pub fn plugin_preconditions(missing: Vec<String>) -> Self {
        Self::PreconditionRequired(PreconditionRequiredResponse {
            status: 428,
            message: "Precondition Required: Missing required data".to_owned(),
            reason: "plugin_preconditions".to_owned(),
            missing,
        })
    }

    #[must_use]
    pub fn internal_error(message: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Internal(InternalErrorResponse {
            status: 500,
            message: message.into(),
            reason: reason.into(),
        })
    }

    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::Ok(r) => r.status,
            Self::Accepted(r) => r.status,
            Self::VersionRejected(r) => r.status,
            Self::Unauthorized(r) => r.status,
            Self::PreconditionRequired(r) => r.status,
            Self::Internal(r) => r.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_missing_version() {
        let err = TextEnvelope::parse(r#"{"type":"update","payload":{}}"#).unwrap_err();
        assert!(matches!(err, EnvelopeParseError::Version(VersionError::Missing)));
        assert_eq!(err.to_string(), "missing version");
    }

    #[test]
    fn parse_rejects_malformed_semver() {
        let err = TextEnvelope::parse(r#"{"version":"not-semver","type":"update","payload":{}}"#)
            .unwrap_err();
        assert!(matches!(err, EnvelopeParseError::Version(VersionError::Invalid(_))));
        assert_eq!(err.to_string(), "invalid version");
    }

    #[test]
    fn parse_accepts_prerelease_suffix() {
        let env = TextEnvelope::parse(r#"{"version":"64.0.0-rc1","type":"update","payload":{}}"#)
            .unwrap();
        assert_eq!(env.version, "64.0.0-rc1");
        assert_eq!(env.parsed_version().unwrap().major, 64);
    }

    #[test]
    fn ingest_response_serializes_without_internal_tag() {
        let json = serde_json::to_value(IngestResponse::ok("update processed")).unwrap();
        assert_eq!(json["status"], 200);
        assert_eq!(json["message"], "update processed");
        assert!(json.get("reason").is_none());
    }

    #[test]
    fn precondition_required_serializes_missing_list() {
        let json = serde_json::to_value(IngestResponse::precondition_required(vec![
            "database".to_owned(),
            "translations_zip".to_owned(),
        ]))
        .unwrap();
        assert_eq!(json["status"], 428);
        assert_eq!(json["reason"], "missing_preconditions");
        assert_eq!(json["missing"][0], "database");
    }
}
