use serde::{Deserialize, Serialize};

use crate::user_get_response::UserGetResponse;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: UserGetResponse,
}
