use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEditRequest {
    pub name: Option<String>,
    pub time_zone: Option<String>,
}
