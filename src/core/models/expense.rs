use crate::core::errors::LedgerError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantShare {
    pub participant_id: String,
    pub amount: f64,
}

impl ParticipantShare {
    pub fn new(participant_id: impl Into<String>, amount: f64) -> Self {
        ParticipantShare {
            participant_id: participant_id.into(),
            amount,
        }
    }
}

/// Payload of the gateway's "create expense" call.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDraft {
    pub group_id: String,
    pub amount: f64,
    pub paid_by: String,
    pub participants: Vec<ParticipantShare>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
}

impl ExpenseDraft {
    /// Shape checks only. Shares are not required to sum to `amount`.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.group_id.trim().is_empty() {
            return Err(LedgerError::invalid("groupId", "groupId cannot be empty"));
        }
        if self.paid_by.trim().is_empty() {
            return Err(LedgerError::invalid("paidBy", "paidBy cannot be empty"));
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(LedgerError::invalid(
                "amount",
                "Amount must be a finite number greater than 0",
            ));
        }
        if self.participants.is_empty() {
            return Err(LedgerError::invalid(
                "participants",
                "At least one participant is required",
            ));
        }
        if let Some(share) = self
            .participants
            .iter()
            .find(|s| !s.amount.is_finite() || s.amount < 0.0)
        {
            return Err(LedgerError::invalid(
                "participants",
                format!("Share for {} must be a non-negative number", share.participant_id),
            ));
        }
        Ok(())
    }
}

/// An expense written while offline, waiting for the next sync pass.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueuedExpense {
    pub id: String,
    pub group_id: String,
    pub amount: f64,
    pub paid_by: String,
    pub participants: Vec<ParticipantShare>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl QueuedExpense {
    pub fn new(draft: ExpenseDraft) -> Self {
        QueuedExpense {
            id: Uuid::new_v4().to_string(),
            group_id: draft.group_id,
            amount: draft.amount,
            paid_by: draft.paid_by,
            participants: draft.participants,
            note: draft.note,
            place: draft.place,
            created_at: Utc::now(),
        }
    }

    pub fn draft(&self) -> ExpenseDraft {
        ExpenseDraft {
            group_id: self.group_id.clone(),
            amount: self.amount,
            paid_by: self.paid_by.clone(),
            participants: self.participants.clone(),
            note: self.note.clone(),
            place: self.place.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense_id: Option<String>,
}

impl CreateExpenseResponse {
    pub fn created(expense_id: impl Into<String>) -> Self {
        CreateExpenseResponse {
            success: true,
            error: None,
            expense_id: Some(expense_id.into()),
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        CreateExpenseResponse {
            success: false,
            error: Some(error.into()),
            expense_id: None,
        }
    }

    /// Collapses a `success: false` reply into `LedgerError::Remote`.
    pub fn into_result(self) -> Result<Option<String>, LedgerError> {
        if self.success {
            Ok(self.expense_id)
        } else {
            Err(LedgerError::Remote(
                self.error
                    .unwrap_or_else(|| "expense rejected by remote".to_string()),
            ))
        }
    }
}
