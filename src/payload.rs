use crate::argument::ErrorValue;
use crate::context::{ContextSnapshot, IdentityType};
use serde::Serialize;
use serde_json::Value;

/// Structured side of one console log call.
///
/// Built fresh for every call and handed to the sink together with the
/// message string. Absent fields are omitted when serialized; `objects` in
/// particular is never an empty list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergingPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objects: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err: Option<ErrorValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_type: Option<IdentityType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

impl MergingPayload {
    /// Copy ambient context fields into the payload.
    pub fn merge_context(&mut self, ctx: &ContextSnapshot) {
        self.tenant_id = ctx.tenant_id.clone();
        self.app_id = ctx.app_id.clone();
        self.identity_id = ctx.identity_id.clone();
        self.identity_type = ctx.identity_type;
        self.correlation_id = ctx.correlation_id.clone();
    }

    pub fn is_empty(&self) -> bool {
        *self == MergingPayload::default()
    }
}
