//! Request and response bodies that exist only at the HTTP boundary.
//!
//! Create/update payloads that map one-to-one onto core inputs are
//! deserialized straight into the core structs instead.

use crate::core::quantity::{Adjustment, ChangeContext};
use crate::models::{ApprovalStatus, CollectionKey, RequisitionType};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

/// Wrapper for list responses.
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncStatus {
    pub revision: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserQuery {
    pub q: Option<String>,
    pub role: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<u64>,
}

/// Body of a strict stock update.
#[derive(Debug, Clone, Deserialize)]
pub struct StockChangeRequest {
    /// Signed change; negative removes stock
    pub change: i64,
    #[serde(default)]
    pub requisition_type: Option<RequisitionType>,
    pub reason: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl StockChangeRequest {
    /// Ledger context with `user_id` as the actor.
    #[must_use]
    pub fn context(&self, user_id: String) -> ChangeContext {
        ChangeContext {
            user_id,
            reason: self.reason.clone(),
            location: self.location.clone(),
            department: self.department.clone(),
            notes: self.notes.clone(),
        }
    }
}

/// Body of a name-based quantity adjustment.
#[derive(Debug, Clone, Deserialize)]
pub struct AdjustQuantityRequest {
    pub category: String,
    pub item_name: String,
    /// Unrecognised types adjust by 0
    pub requisition_type: String,
    pub quantity: f64,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdjustQuantityResponse {
    /// `false` when no item had that name
    pub adjusted: bool,
    pub adjustment: Option<Adjustment>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectionResponse {
    pub key: CollectionKey,
    pub items: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReplaceCollectionRequest {
    pub items: Vec<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppendResponse {
    pub index: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApproveRequest {
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RejectRequest {
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatePassDecisionRequest {
    pub decision: ApprovalStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationCreateRequest {
    pub kind: String,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}
