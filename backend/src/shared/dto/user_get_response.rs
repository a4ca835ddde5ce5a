use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGetResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub time_zone: String,
    pub created_at: DateTime<Utc>,
}
