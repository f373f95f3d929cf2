// Common types shared between the domain and HTTP layers

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Success envelope used by every JSON endpoint: `{ "success": true, "data": ... }`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Current time, truncated to microseconds so values survive a Postgres
/// `timestamptz` round trip unchanged.
pub fn now() -> DateTime<Utc> {
    use chrono::SubsecRound;
    Utc::now().trunc_subsecs(6)
}
