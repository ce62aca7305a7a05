//! Report generation service
//!
//! Orchestrates one generation: call the report function, require both
//! artifact URLs, write the archive record, hand back the package. Nothing
//! is archived unless the function reply is complete.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use crate::error::{ReportsError, Result};
use crate::package::{
    ArchiveEntry, CompliancePackage, GenerateRequest, GeneratedPackage, NewCompliancePackage,
};
use crate::transport::ReportBackend;

/// Service generating and listing compliance packages.
#[derive(Clone)]
pub struct ReportService {
    backend: Arc<dyn ReportBackend>,
}

impl ReportService {
    pub fn new(backend: Arc<dyn ReportBackend>) -> Self {
        Self { backend }
    }

    /// Generate a package for an AI system, stamped with the current time.
    pub async fn generate(&self, ai_system_id: &str) -> Result<GeneratedPackage> {
        self.generate_at(ai_system_id, Utc::now()).await
    }

    /// Generate a package stamped with `generated_at`.
    #[instrument(skip(self, generated_at))]
    pub async fn generate_at(
        &self,
        ai_system_id: &str,
        generated_at: DateTime<Utc>,
    ) -> Result<GeneratedPackage> {
        let ai_system_id = require_id(ai_system_id)?;

        let request = GenerateRequest {
            ai_system_id: ai_system_id.to_string(),
        };
        let reply = self.backend.invoke_function(&request).await?;
        let artifacts = reply.into_artifacts().map_err(|e| {
            warn!(error = %e, "report function reply rejected");
            e
        })?;

        let record = NewCompliancePackage::new(ai_system_id, artifacts, generated_at);
        self.backend.insert_package(&record).await?;

        info!(pdf_name = %record.pdf_name, "compliance package archived");
        Ok(GeneratedPackage::from(&record))
    }

    /// Archived packages of an AI system, newest first.
    pub async fn list(&self, ai_system_id: &str) -> Result<Vec<CompliancePackage>> {
        let ai_system_id = require_id(ai_system_id)?;
        let mut packages = self.backend.list_packages(ai_system_id).await?;
        // Undated records sort last.
        packages.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
        Ok(packages)
    }

    /// Every archived package across AI systems, newest first.
    pub async fn archive(&self) -> Result<Vec<ArchiveEntry>> {
        let mut entries = self.backend.list_archive().await?;
        entries.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
        Ok(entries)
    }
}

pub(crate) fn require_id(ai_system_id: &str) -> Result<&str> {
    let trimmed = ai_system_id.trim();
    if trimmed.is_empty() {
        Err(ReportsError::MissingAiSystemId)
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::FunctionReply;
    use crate::registry::{AiSystem, NewAiSystem};
    use aiact_intake::AnswerRow;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeBackend {
        reply: Mutex<Option<Result<FunctionReply>>>,
        fail_insert: bool,
        inserted: Mutex<Vec<NewCompliancePackage>>,
        requests: Mutex<Vec<GenerateRequest>>,
        archive: Vec<CompliancePackage>,
        entries: Vec<ArchiveEntry>,
    }

    impl FakeBackend {
        fn replying(pdf_url: Option<&str>, json_url: Option<&str>) -> Self {
            Self {
                reply: Mutex::new(Some(Ok(FunctionReply {
                    pdf_url: pdf_url.map(str::to_owned),
                    json_url: json_url.map(str::to_owned),
                }))),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl ReportBackend for FakeBackend {
        async fn invoke_function(&self, request: &GenerateRequest) -> Result<FunctionReply> {
            self.requests.lock().unwrap().push(request.clone());
            self.reply
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Ok(FunctionReply::default()))
        }

        async fn insert_package(&self, package: &NewCompliancePackage) -> Result<()> {
            if self.fail_insert {
                return Err(ReportsError::Archive("permission denied".into()));
            }
            self.inserted.lock().unwrap().push(package.clone());
            Ok(())
        }

        async fn list_packages(&self, ai_system_id: &str) -> Result<Vec<CompliancePackage>> {
            Ok(self
                .archive
                .iter()
                .filter(|p| p.pdf_name.as_deref().unwrap_or("").contains(ai_system_id))
                .cloned()
                .collect())
        }

        async fn list_archive(&self) -> Result<Vec<ArchiveEntry>> {
            Ok(self.entries.clone())
        }

        async fn create_system(&self, _system: &NewAiSystem) -> Result<AiSystem> {
            Err(ReportsError::Write("not supported".into()))
        }

        async fn list_systems(&self) -> Result<Vec<AiSystem>> {
            Ok(Vec::new())
        }

        async fn insert_answers(&self, _rows: &[AnswerRow]) -> Result<()> {
            Ok(())
        }

        async fn tier_rows(&self, _ai_system_id: &str) -> Result<Vec<AnswerRow>> {
            Ok(Vec::new())
        }
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap()
    }

    fn archived(id: &str, system: &str, day: u32) -> CompliancePackage {
        let generated_at = Utc.with_ymd_and_hms(2026, 5, day, 12, 0, 0).unwrap();
        CompliancePackage {
            id: id.into(),
            pdf_url: Some(format!("https://files.example/{}.pdf", id)),
            json_url: Some(format!("https://files.example/{}.json", id)),
            pdf_name: Some(crate::package::pdf_name(system, generated_at)),
            generated_at: Some(generated_at),
        }
    }

    fn entry(id: &str, day: Option<u32>) -> ArchiveEntry {
        ArchiveEntry {
            id: id.into(),
            ai_system_id: Some("sys-1".into()),
            ai_system_name: Some("Claims triage".into()),
            generated_at: day.map(|d| Utc.with_ymd_and_hms(2026, 8, d, 9, 0, 0).unwrap()),
            status: Some("generated".into()),
            package_version: Some(1),
            pdf_url: None,
            json_url: None,
            pdf_name: None,
        }
    }

    #[tokio::test]
    async fn test_generate_archives_package() {
        let backend = Arc::new(FakeBackend::replying(
            Some("https://files.example/p.pdf"),
            Some("https://files.example/p.json"),
        ));
        let service = ReportService::new(backend.clone());

        let package = service.generate_at("sys-1", at()).await.unwrap();
        assert!(package.ok);
        assert_eq!(package.pdf_name, "EU_AI_Act_sys-1_2026-10-19.pdf");
        assert_eq!(package.generated_at, at());

        let inserted = backend.inserted.lock().unwrap();
        assert_eq!(inserted.len(), 1);
        assert_eq!(inserted[0].ai_system_id, "sys-1");
        assert_eq!(inserted[0].package_version, 1);
        assert_eq!(inserted[0].pdf_url, "https://files.example/p.pdf");
        assert_eq!(
            backend.requests.lock().unwrap()[0],
            GenerateRequest {
                ai_system_id: "sys-1".into()
            }
        );
    }

    #[tokio::test]
    async fn test_generate_rejects_blank_id() {
        let backend = Arc::new(FakeBackend::default());
        let service = ReportService::new(backend.clone());

        let err = service.generate("  ").await.unwrap_err();
        assert!(matches!(err, ReportsError::MissingAiSystemId));
        assert_eq!(err.status_code(), 400);
        assert!(backend.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_incomplete_reply_archives_nothing() {
        let backend = Arc::new(FakeBackend::replying(Some("https://files.example/p.pdf"), None));
        let service = ReportService::new(backend.clone());

        let err = service.generate_at("sys-1", at()).await.unwrap_err();
        assert!(matches!(err, ReportsError::InvalidResponse(_)));
        assert!(backend.inserted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_function_error_passes_status_through() {
        let backend = Arc::new(FakeBackend {
            reply: Mutex::new(Some(Err(ReportsError::Function {
                status: 503,
                message: "cold start".into(),
            }))),
            ..Default::default()
        });
        let service = ReportService::new(backend.clone());

        let err = service.generate_at("sys-1", at()).await.unwrap_err();
        assert_eq!(err.status_code(), 503);
        assert!(backend.inserted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_archive_failure_is_reported() {
        let mut backend = FakeBackend::replying(
            Some("https://files.example/p.pdf"),
            Some("https://files.example/p.json"),
        );
        backend.fail_insert = true;
        let service = ReportService::new(Arc::new(backend));

        let err = service.generate_at("sys-1", at()).await.unwrap_err();
        assert_eq!(err.to_string(), "Archive insert failed: permission denied");
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn test_list_returns_newest_first() {
        let backend = FakeBackend {
            archive: vec![
                archived("a", "sys-7", 1),
                archived("b", "sys-7", 20),
                archived("c", "sys-8", 25),
                archived("d", "sys-7", 11),
            ],
            ..Default::default()
        };
        let service = ReportService::new(Arc::new(backend));

        let packages = service.list("sys-7").await.unwrap();
        let ids: Vec<_> = packages.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d", "a"]);

        assert!(matches!(
            service.list("").await.unwrap_err(),
            ReportsError::MissingAiSystemId
        ));
    }

    #[tokio::test]
    async fn test_list_keeps_undated_packages_last() {
        let mut undated = archived("u", "sys-7", 1);
        undated.generated_at = None;
        let backend = FakeBackend {
            archive: vec![undated, archived("a", "sys-7", 3), archived("b", "sys-7", 9)],
            ..Default::default()
        };
        let service = ReportService::new(Arc::new(backend));

        let ids: Vec<_> = service
            .list("sys-7")
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["b", "a", "u"]);
    }

    #[tokio::test]
    async fn test_archive_spans_systems_newest_first() {
        let backend = FakeBackend {
            entries: vec![entry("x", None), entry("y", Some(2)), entry("z", Some(30))],
            ..Default::default()
        };
        let service = ReportService::new(Arc::new(backend));

        let ids: Vec<_> = service
            .archive()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["z", "y", "x"]);
    }
}
