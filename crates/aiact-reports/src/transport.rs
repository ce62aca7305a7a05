//! Transport to the hosted backend

use std::time::Duration;

use aiact_intake::{AnswerRow, TIER_QUESTION_KEY, TIER_SECTION};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::BackendConfig;
use crate::error::{ReportsError, Result};
use crate::package::{
    ArchiveEntry, CompliancePackage, FunctionReply, GenerateRequest, NewCompliancePackage,
    ARCHIVE_COLUMNS, PACKAGE_COLUMNS, PACKAGE_TABLE,
};
use crate::registry::{
    AiSystem, NewAiSystem, ANSWERS_TABLE, ANSWER_COLUMNS, SYSTEM_COLUMNS, SYSTEM_TABLE,
};

/// Backend abstraction for report generation, the package archive and the
/// AI system registry.
#[async_trait]
pub trait ReportBackend: Send + Sync {
    /// Invoke the report function.
    async fn invoke_function(&self, request: &GenerateRequest) -> Result<FunctionReply>;

    /// Record a generated package in the archive.
    async fn insert_package(&self, package: &NewCompliancePackage) -> Result<()>;

    /// Archived packages of one AI system, newest first.
    async fn list_packages(&self, ai_system_id: &str) -> Result<Vec<CompliancePackage>>;

    /// Every archived package with its system's name, newest first.
    async fn list_archive(&self) -> Result<Vec<ArchiveEntry>>;

    /// Insert a system and return the stored record.
    async fn create_system(&self, system: &NewAiSystem) -> Result<AiSystem>;

    /// Registered systems, newest first.
    async fn list_systems(&self) -> Result<Vec<AiSystem>>;

    /// Append rows to the intake answers table.
    async fn insert_answers(&self, rows: &[AnswerRow]) -> Result<()>;

    /// Saved tier records of one AI system, newest first.
    async fn tier_rows(&self, ai_system_id: &str) -> Result<Vec<AnswerRow>>;
}

/// HTTP backend talking to the function endpoint and the REST table API.
pub struct HttpBackend {
    client: Client,
    config: BackendConfig,
}

impl std::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackend")
            .field("config", &self.config)
            .finish()
    }
}

impl HttpBackend {
    /// Create a backend; fails when the URL or key is missing.
    pub fn new(config: BackendConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .bearer_auth(&self.config.service_role_key)
            .header("apikey", &self.config.service_role_key)
    }

    async fn insert<B>(
        &self,
        table: &str,
        body: &B,
        prefer: &str,
        query: &[(&str, &str)],
    ) -> Result<Response>
    where
        B: Serialize + Sync + ?Sized,
    {
        debug!(table, "inserting rows");
        Ok(self
            .authorized(self.client.post(self.config.table_url(table)))
            .header("Prefer", prefer)
            .query(query)
            .json(body)
            .send()
            .await?)
    }

    async fn select<T>(&self, table: &str, query: &[(&str, &str)]) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        debug!(table, "querying rows");
        let response = self
            .authorized(self.client.get(self.config.table_url(table)))
            .query(query)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(ReportsError::Query(failure_message(response).await))
        }
    }
}

#[async_trait]
impl ReportBackend for HttpBackend {
    async fn invoke_function(&self, request: &GenerateRequest) -> Result<FunctionReply> {
        let url = self.config.function_url();
        debug!(url = %url, ai_system_id = %request.ai_system_id, "invoking report function");

        let response = self
            .authorized(self.client.post(&url))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "report function failed");
            return Err(ReportsError::Function {
                status: status.as_u16(),
                message: body,
            });
        }

        FunctionReply::parse(&body)
    }

    async fn insert_package(&self, package: &NewCompliancePackage) -> Result<()> {
        let response = self
            .insert(PACKAGE_TABLE, package, "return=minimal", &[])
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ReportsError::Archive(failure_message(response).await))
        }
    }

    async fn list_packages(&self, ai_system_id: &str) -> Result<Vec<CompliancePackage>> {
        let filter = format!("eq.{}", ai_system_id);
        self.select(
            PACKAGE_TABLE,
            &[
                ("select", PACKAGE_COLUMNS),
                ("ai_system_id", filter.as_str()),
                ("order", "generated_at.desc"),
            ],
        )
        .await
    }

    async fn list_archive(&self) -> Result<Vec<ArchiveEntry>> {
        self.select(
            PACKAGE_TABLE,
            &[("select", ARCHIVE_COLUMNS), ("order", "generated_at.desc")],
        )
        .await
    }

    async fn create_system(&self, system: &NewAiSystem) -> Result<AiSystem> {
        let response = self
            .insert(
                SYSTEM_TABLE,
                system,
                "return=representation",
                &[("select", SYSTEM_COLUMNS)],
            )
            .await?;

        if !response.status().is_success() {
            return Err(ReportsError::Write(failure_message(response).await));
        }

        let created: Vec<AiSystem> = response.json().await?;
        created
            .into_iter()
            .next()
            .ok_or_else(|| ReportsError::InvalidResponse("Failed to create AI system".into()))
    }

    async fn list_systems(&self) -> Result<Vec<AiSystem>> {
        self.select(
            SYSTEM_TABLE,
            &[("select", SYSTEM_COLUMNS), ("order", "created_at.desc")],
        )
        .await
    }

    async fn insert_answers(&self, rows: &[AnswerRow]) -> Result<()> {
        let response = self
            .insert(ANSWERS_TABLE, rows, "return=minimal", &[])
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ReportsError::Write(failure_message(response).await))
        }
    }

    async fn tier_rows(&self, ai_system_id: &str) -> Result<Vec<AnswerRow>> {
        let system = format!("eq.{}", ai_system_id);
        let section = format!("eq.{}", TIER_SECTION);
        let key = format!("eq.{}", TIER_QUESTION_KEY);
        self.select(
            ANSWERS_TABLE,
            &[
                ("select", ANSWER_COLUMNS),
                ("ai_system_id", system.as_str()),
                ("section", section.as_str()),
                ("question_key", key.as_str()),
                ("order", "created_at.desc"),
                ("limit", "1"),
            ],
        )
        .await
    }
}

async fn failure_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    warn!(status = status.as_u16(), "backend request failed");
    api_message(&body)
}

/// Pull `message` out of a REST error body, falling back to the raw text.
fn api_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned))
        .unwrap_or_else(|| body.to_string())
}
