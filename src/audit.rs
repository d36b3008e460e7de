use serde_json::Value;
use uuid::Uuid;

/// Records a state-changing action as a structured event on the `audit` target.
pub fn log_audit(user_id: Option<Uuid>, action: &str, resource: Option<&str>, metadata: Option<Value>) {
    let metadata = metadata.unwrap_or(Value::Null);
    match user_id {
        Some(user_id) => tracing::info!(
            target: "audit",
            user_id = %user_id,
            action,
            resource = resource.unwrap_or("-"),
            metadata = %metadata,
            "audit"
        ),
        None => tracing::info!(
            target: "audit",
            action,
            resource = resource.unwrap_or("-"),
            metadata = %metadata,
            "audit"
        ),
    }
}
