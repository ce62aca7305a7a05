//! AI system registry
//!
//! Registration creates a draft `ai_systems` record and writes the AI
//! software answer into the intake table. The registry also stores the
//! computed risk tier of a system and reads the latest one back.

use std::sync::Arc;

use aiact_intake::{latest_tier, software_row, tier_row, Classification, RiskTier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::{ReportsError, Result};
use crate::package::string_or_number;
use crate::service::require_id;
use crate::transport::ReportBackend;

/// Table holding registered AI systems.
pub const SYSTEM_TABLE: &str = "ai_systems";

/// Columns returned when listing systems.
pub const SYSTEM_COLUMNS: &str = "id,name,created_at,status";

/// Table holding intake answers and tier records.
pub const ANSWERS_TABLE: &str = "ai_intake_answers";

/// Columns returned when reading tier records.
pub const ANSWER_COLUMNS: &str = "ai_system_id,section,question_key,answer_json,created_at";

/// Software recorded when registration does not name one.
pub const DEFAULT_AI_SOFTWARE: &str = "OpenAI (ChatGPT / GPT-4 / GPT-4o)";

/// Lifecycle status of a registered system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemStatus {
    #[default]
    Draft,
}

/// Insert payload for a new AI system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAiSystem {
    pub name: String,
    pub status: SystemStatus,
    pub owner_email: String,
}

/// Registered AI system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiSystem {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Service over the AI system registry and saved tiers.
#[derive(Clone)]
pub struct RegistryService {
    backend: Arc<dyn ReportBackend>,
}

impl RegistryService {
    pub fn new(backend: Arc<dyn ReportBackend>) -> Self {
        Self { backend }
    }

    /// Register a draft system owned by `owner_email` and record the AI
    /// software it uses.
    #[instrument(skip(self, owner_email))]
    pub async fn create_system(
        &self,
        name: &str,
        owner_email: &str,
        ai_software: Option<&str>,
    ) -> Result<AiSystem> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ReportsError::MissingName);
        }
        let owner_email = owner_email.trim();
        if owner_email.is_empty() {
            return Err(ReportsError::MissingOwnerEmail);
        }

        let record = NewAiSystem {
            name: name.to_string(),
            status: SystemStatus::Draft,
            owner_email: owner_email.to_string(),
        };
        let system = self.backend.create_system(&record).await?;
        if system.id.trim().is_empty() {
            return Err(ReportsError::InvalidResponse("Failed to create AI system".into()));
        }

        let software = ai_software
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_AI_SOFTWARE);
        self.backend
            .insert_answers(&[software_row(&system.id, software)])
            .await?;

        info!(ai_system_id = %system.id, "AI system registered");
        Ok(system)
    }

    /// Registered systems, newest first.
    pub async fn list_systems(&self) -> Result<Vec<AiSystem>> {
        let mut systems = self.backend.list_systems().await?;
        systems.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(systems)
    }

    /// Append a tier record for a computed classification.
    #[instrument(skip(self, classification), fields(risk_tier = %classification.risk_tier))]
    pub async fn save_tier(
        &self,
        ai_system_id: &str,
        classification: &Classification,
    ) -> Result<()> {
        let ai_system_id = require_id(ai_system_id)?;
        self.backend
            .insert_answers(&[tier_row(ai_system_id, classification)])
            .await?;
        info!("risk tier saved");
        Ok(())
    }

    /// Latest saved tier, `Unknown` when nothing usable was saved.
    pub async fn latest_tier(&self, ai_system_id: &str) -> Result<RiskTier> {
        let ai_system_id = require_id(ai_system_id)?;
        let rows = self.backend.tier_rows(ai_system_id).await?;
        Ok(latest_tier(&rows))
    }
}
