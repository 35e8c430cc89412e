//! Memory Correction Gateway
//!
//! The three operations an agent's tool-calling layer may invoke to fix what the
//! system remembers. Requests that target nothing come back as `success: false`
//! outcomes. Only store outages are errors.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{MemoryError, Result};
use crate::memory::{ConflictType, ExtractedFact, FactConflict, Resolution, objects_match};
use crate::storage::FactStore;

/// Confidence of a fact set by an explicit correction
pub const CORRECTION_CONFIDENCE: f64 = 0.95;

/// Parameters of `update_fact`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateFactRequest {
    pub subject: String,
    pub predicate: String,
    pub new_value: String,
    /// The value being replaced; when present it is deleted explicitly
    #[serde(default)]
    pub old_value: Option<String>,
    #[serde(default)]
    pub reason: String,
}

/// Result of `update_fact`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    pub success: bool,
    pub message: String,
    /// The object stored before the update, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_value: Option<String>,
    /// The conflict the correction resolved, always `prefer_new` at full confidence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict: Option<FactConflict>,
}

impl UpdateOutcome {
    fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            previous_value: None,
            conflict: None,
        }
    }
}

/// Parameters of `delete_fact`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteFactRequest {
    pub subject: String,
    #[serde(default)]
    pub predicate: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub reason: String,
}

/// Granularity chosen from the optional parameters present
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeleteScope {
    /// Only facts carrying the given value
    Value,
    /// Every fact for the subject and predicate
    Predicate,
    /// Every fact about the subject
    Subject,
}

impl DeleteScope {
    fn of(request: &DeleteFactRequest) -> Self {
        match (&request.predicate, &request.value) {
            (_, Some(_)) => DeleteScope::Value,
            (Some(_), None) => DeleteScope::Predicate,
            (None, None) => DeleteScope::Subject,
        }
    }
}

impl std::fmt::Display for DeleteScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeleteScope::Value => write!(f, "value"),
            DeleteScope::Predicate => write!(f, "predicate"),
            DeleteScope::Subject => write!(f, "subject"),
        }
    }
}

/// Result of `delete_fact`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub success: bool,
    pub deleted_count: usize,
    pub scope: DeleteScope,
    pub message: String,
}

/// Result of `search_facts`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactSearchOutcome {
    pub facts: Vec<ExtractedFact>,
    pub count: usize,
}

/// Explicit update / delete / search over a [`FactStore`]
pub struct MemoryCorrectionGateway {
    store: Arc<dyn FactStore>,
}

impl MemoryCorrectionGateway {
    pub fn new(store: Arc<dyn FactStore>) -> Self {
        Self { store }
    }

    /// Store `new_value` for `(subject, predicate)` at [`CORRECTION_CONFIDENCE`].
    ///
    /// Retrying the same request leaves the same stored state.
    pub fn update_fact(&self, owner_id: &str, request: &UpdateFactRequest) -> Result<UpdateOutcome> {
        require_owner(owner_id)?;
        let subject = request.subject.trim();
        let predicate = request.predicate.trim();
        let new_value = request.new_value.trim();
        if subject.is_empty() || predicate.is_empty() || new_value.is_empty() {
            return Ok(UpdateOutcome::rejected(
                "subject, predicate and new_value are required",
            ));
        }

        let mut fact = ExtractedFact::new(
            owner_id,
            subject,
            predicate,
            new_value,
            CORRECTION_CONFIDENCE,
        );
        if !request.reason.trim().is_empty() {
            fact = fact.with_source(format!("correction: {}", request.reason.trim()));
        }

        let previous = self
            .store
            .query(owner_id, Some(&fact.subject))?
            .into_iter()
            .find(|stored| stored.describes_same(&fact));

        if let Some(old_value) = request
            .old_value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
        {
            let removed =
                self.store
                    .delete_where(owner_id, &fact.subject, Some(&fact.predicate), Some(old_value))?;
            tracing::debug!(owner_id = %owner_id, removed, "Removed superseded value");
        }

        self.store.upsert(&fact)?;

        let conflict = previous
            .as_ref()
            .filter(|old| !old.same_object(&fact))
            .map(|old| FactConflict {
                old_fact: old.clone(),
                new_fact: fact.clone(),
                conflict_type: ConflictType::Contradiction,
                resolution: Resolution::PreferNew,
                confidence: 1.0,
            });

        tracing::info!(
            owner_id = %owner_id,
            key = %fact.key(),
            replaced = conflict.is_some(),
            "Fact corrected"
        );

        let message = match &previous {
            Some(old) if !objects_match(&old.object, new_value) => format!(
                "Updated {} {} from '{}' to '{}'",
                fact.subject, fact.predicate, old.object, fact.object
            ),
            _ => format!("Remembered {} {} is '{}'", fact.subject, fact.predicate, fact.object),
        };

        Ok(UpdateOutcome {
            success: true,
            message,
            previous_value: previous.map(|old| old.object),
            conflict,
        })
    }

    /// Delete facts about `subject`, narrowed by the optional predicate and value.
    ///
    /// A value without a predicate matches that value across every predicate of
    /// the subject.
    pub fn delete_fact(&self, owner_id: &str, request: &DeleteFactRequest) -> Result<DeleteOutcome> {
        require_owner(owner_id)?;
        let subject = request.subject.trim();
        let predicate = non_empty(request.predicate.as_deref());
        let value = non_empty(request.value.as_deref());
        let normalized = DeleteFactRequest {
            subject: subject.to_string(),
            predicate: predicate.map(str::to_string),
            value: value.map(str::to_string),
            reason: request.reason.clone(),
        };
        let scope = DeleteScope::of(&normalized);

        if subject.is_empty() {
            return Ok(DeleteOutcome {
                success: false,
                deleted_count: 0,
                scope,
                message: "subject is required".to_string(),
            });
        }

        let deleted_count = self.store.delete_where(owner_id, subject, predicate, value)?;

        if deleted_count == 0 {
            return Ok(DeleteOutcome {
                success: false,
                deleted_count,
                scope,
                message: format!("No matching facts found about '{}'", subject),
            });
        }

        tracing::info!(
            owner_id = %owner_id,
            subject = %subject,
            scope = %scope,
            deleted_count,
            "Facts deleted"
        );

        Ok(DeleteOutcome {
            success: true,
            deleted_count,
            scope,
            message: format!(
                "Forgot {} fact{} about '{}'",
                deleted_count,
                if deleted_count == 1 { "" } else { "s" },
                subject
            ),
        })
    }

    /// Read-only lookup of what is stored about `subject`
    pub fn search_facts(
        &self,
        owner_id: &str,
        subject: &str,
        predicate: Option<&str>,
    ) -> Result<FactSearchOutcome> {
        require_owner(owner_id)?;
        let subject = subject.trim();
        if subject.is_empty() {
            return Ok(FactSearchOutcome {
                facts: Vec::new(),
                count: 0,
            });
        }

        let predicate = non_empty(predicate).map(str::to_lowercase);
        let facts: Vec<ExtractedFact> = self
            .store
            .query(owner_id, Some(subject))?
            .into_iter()
            .filter(|f| predicate.as_ref().is_none_or(|p| &f.predicate == p))
            .collect();

        Ok(FactSearchOutcome {
            count: facts.len(),
            facts,
        })
    }
}

fn require_owner(owner_id: &str) -> Result<()> {
    if owner_id.trim().is_empty() {
        return Err(MemoryError::InvalidArgument("owner_id is required".to_string()));
    }
    Ok(())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
