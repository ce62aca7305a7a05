//! Compliance package types
//!
//! A package is the pair of artifacts (PDF and JSON) rendered for one AI
//! system, plus the archive record that points at them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ReportsError, Result};

/// Archive table holding package records.
pub const PACKAGE_TABLE: &str = "compliance_packages";

/// Columns returned when listing the packages of one AI system.
pub const PACKAGE_COLUMNS: &str = "id,pdf_url,json_url,pdf_name,generated_at";

/// Columns returned when listing the whole archive, embedding the system name.
pub const ARCHIVE_COLUMNS: &str =
    "id,ai_system_id,generated_at,status,package_version,pdf_url,json_url,pdf_name,ai_systems:ai_system_id(name)";

/// Body sent to the report function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub ai_system_id: String,
}

/// Reply from the report function. Both URLs must be present for the
/// reply to be usable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FunctionReply {
    #[serde(default)]
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub json_url: Option<String>,
}

/// Locations of the rendered artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportArtifacts {
    pub pdf_url: String,
    pub json_url: String,
}

impl FunctionReply {
    /// Parse the raw reply body.
    pub fn parse(body: &str) -> Result<Self> {
        serde_json::from_str(body)
            .map_err(|_| ReportsError::InvalidResponse("Invalid JSON from edge function".into()))
    }

    /// Require both artifact URLs.
    pub fn into_artifacts(self) -> Result<ReportArtifacts> {
        match (non_empty(self.pdf_url), non_empty(self.json_url)) {
            (Some(pdf_url), Some(json_url)) => Ok(ReportArtifacts { pdf_url, json_url }),
            _ => Err(ReportsError::InvalidResponse(
                "Missing pdf_url or json_url from edge function".into(),
            )),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Lifecycle status stored with a package record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageStatus {
    #[default]
    Generated,
}

/// Download name of a package's PDF: `EU_AI_Act_<id>_<YYYY-MM-DD>.pdf`.
pub fn pdf_name(ai_system_id: &str, generated_at: DateTime<Utc>) -> String {
    format!(
        "EU_AI_Act_{}_{}.pdf",
        ai_system_id,
        generated_at.format("%Y-%m-%d")
    )
}

/// Archive record written after a successful generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCompliancePackage {
    pub ai_system_id: String,
    pub package_version: u32,
    pub status: PackageStatus,
    pub generated_at: DateTime<Utc>,
    pub pdf_url: String,
    pub json_url: String,
    pub pdf_name: String,
}

impl NewCompliancePackage {
    pub fn new(
        ai_system_id: impl Into<String>,
        artifacts: ReportArtifacts,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let ai_system_id = ai_system_id.into();
        Self {
            pdf_name: pdf_name(&ai_system_id, generated_at),
            ai_system_id,
            package_version: 1,
            status: PackageStatus::Generated,
            generated_at,
            pdf_url: artifacts.pdf_url,
            json_url: artifacts.json_url,
        }
    }
}

/// Archived package as listed for an AI system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompliancePackage {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub pdf_url: Option<String>,
    pub json_url: Option<String>,
    pub pdf_name: Option<String>,
    #[serde(default)]
    pub generated_at: Option<DateTime<Utc>>,
}

/// Archived package as listed across all AI systems, carrying the owning
/// system's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ArchiveRow")]
pub struct ArchiveEntry {
    pub id: String,
    pub ai_system_id: Option<String>,
    pub ai_system_name: Option<String>,
    pub generated_at: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub package_version: Option<u32>,
    pub pdf_url: Option<String>,
    pub json_url: Option<String>,
    pub pdf_name: Option<String>,
}

/// Archive row as returned by the REST API, with the system embedded.
#[derive(Deserialize)]
struct ArchiveRow {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    #[serde(default)]
    ai_system_id: Option<String>,
    #[serde(default)]
    generated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    package_version: Option<u32>,
    #[serde(default)]
    pdf_url: Option<String>,
    #[serde(default)]
    json_url: Option<String>,
    #[serde(default)]
    pdf_name: Option<String>,
    #[serde(default)]
    ai_systems: Option<EmbeddedSystem>,
    /// Present when the archive is re-read from this crate's own output.
    #[serde(default)]
    ai_system_name: Option<String>,
}

#[derive(Deserialize)]
struct EmbeddedSystem {
    #[serde(default)]
    name: Option<String>,
}

impl From<ArchiveRow> for ArchiveEntry {
    fn from(row: ArchiveRow) -> Self {
        Self {
            id: row.id,
            ai_system_id: row.ai_system_id,
            ai_system_name: row.ai_systems.and_then(|s| s.name).or(row.ai_system_name),
            generated_at: row.generated_at,
            status: row.status,
            package_version: row.package_version,
            pdf_url: row.pdf_url,
            json_url: row.json_url,
            pdf_name: row.pdf_name,
        }
    }
}

/// Accept ids stored either as text (uuid) or as integers.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("invalid id: {}", other))),
    }
}

/// Result handed back to the caller of a generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedPackage {
    pub ok: bool,
    pub pdf_url: String,
    pub json_url: String,
    pub pdf_name: String,
    pub generated_at: DateTime<Utc>,
}

impl From<&NewCompliancePackage> for GeneratedPackage {
    fn from(record: &NewCompliancePackage) -> Self {
        Self {
            ok: true,
            pdf_url: record.pdf_url.clone(),
            json_url: record.json_url.clone(),
            pdf_name: record.pdf_name.clone(),
            generated_at: record.generated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 9, 17, 45, 0).unwrap()
    }

    fn artifacts() -> ReportArtifacts {
        ReportArtifacts {
            pdf_url: "https://files.example/report.pdf".into(),
            json_url: "https://files.example/report.json".into(),
        }
    }

    #[test]
    fn test_pdf_name_uses_date_only() {
        assert_eq!(pdf_name("sys-42", at()), "EU_AI_Act_sys-42_2026-03-09.pdf");
    }

    #[test]
    fn test_reply_requires_both_urls() {
        let reply = FunctionReply::parse(r#"{"pdf_url": "https://a/p.pdf"}"#).unwrap();
        let err = reply.into_artifacts().unwrap_err();
        assert_eq!(err.to_string(), "Missing pdf_url or json_url from edge function");

        let reply = FunctionReply::parse(r#"{"pdf_url": "", "json_url": "https://a/j.json"}"#)
            .unwrap();
        assert!(reply.into_artifacts().is_err());

        let reply =
            FunctionReply::parse(r#"{"pdf_url": "https://a/p.pdf", "json_url": "https://a/j.json"}"#)
                .unwrap();
        assert_eq!(reply.into_artifacts().unwrap().json_url, "https://a/j.json");
    }

    #[test]
    fn test_reply_rejects_non_json() {
        let err = FunctionReply::parse("<html>gateway timeout</html>").unwrap_err();
        assert_eq!(err.to_string(), "Invalid JSON from edge function");
    }

    #[test]
    fn test_new_package_record() {
        let record = NewCompliancePackage::new("sys-42", artifacts(), at());
        assert_eq!(record.package_version, 1);
        assert_eq!(record.status, PackageStatus::Generated);
        assert_eq!(record.pdf_name, "EU_AI_Act_sys-42_2026-03-09.pdf");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "generated");
        assert_eq!(json["generated_at"], "2026-03-09T17:45:00Z");
    }

    #[test]
    fn test_generated_package_from_record() {
        let record = NewCompliancePackage::new("sys-42", artifacts(), at());
        let generated = GeneratedPackage::from(&record);
        assert!(generated.ok);
        assert_eq!(generated.pdf_name, record.pdf_name);
        assert_eq!(generated.generated_at, at());
    }

    #[test]
    fn test_archived_package_parses_with_offset_timestamp() {
        let pkg: CompliancePackage = serde_json::from_str(
            r#"{"id": 7, "pdf_url": null, "json_url": "https://a/j.json",
                "pdf_name": "EU_AI_Act_sys_2026-01-01.pdf",
                "generated_at": "2026-01-01T08:00:00+00:00"}"#,
        )
        .unwrap();
        assert!(pkg.pdf_url.is_none());
        assert_eq!(pkg.id, "7");
        assert_eq!(
            pkg.generated_at,
            Some(Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_archived_package_without_timestamp() {
        let pkg: CompliancePackage = serde_json::from_str(
            r#"{"id": "a1", "pdf_url": "https://a/p.pdf", "json_url": null,
                "pdf_name": null, "generated_at": null}"#,
        )
        .unwrap();
        assert!(pkg.generated_at.is_none());

        let pkg: CompliancePackage = serde_json::from_str(r#"{"id": "a2"}"#).unwrap();
        assert!(pkg.generated_at.is_none());
        assert!(pkg.pdf_url.is_none());
    }

    #[test]
    fn test_archive_entry_flattens_embedded_system() {
        let entry: ArchiveEntry = serde_json::from_str(
            r#"{"id": 11, "ai_system_id": "sys-5", "generated_at": "2026-02-02T09:00:00Z",
                "status": "generated", "package_version": 1,
                "pdf_url": "https://a/p.pdf", "json_url": "https://a/j.json",
                "pdf_name": "EU_AI_Act_sys-5_2026-02-02.pdf",
                "ai_systems": {"name": "Claims triage"}}"#,
        )
        .unwrap();
        assert_eq!(entry.id, "11");
        assert_eq!(entry.ai_system_name.as_deref(), Some("Claims triage"));
        assert_eq!(entry.package_version, Some(1));

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["ai_system_name"], "Claims triage");
        assert!(json.get("ai_systems").is_none());
        assert_eq!(serde_json::from_value::<ArchiveEntry>(json).unwrap(), entry);
    }

    #[test]
    fn test_archive_entry_without_system() {
        let entry: ArchiveEntry =
            serde_json::from_str(r#"{"id": "p-1", "ai_systems": null, "generated_at": null}"#)
                .unwrap();
        assert!(entry.ai_system_name.is_none());
        assert!(entry.generated_at.is_none());
    }
}
