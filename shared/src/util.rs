/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a textual document identifier.
///
/// 32 lowercase hex chars (UUID v4, simple form). This is the identifier
/// clients see; it is independent of the store's internal record id.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
