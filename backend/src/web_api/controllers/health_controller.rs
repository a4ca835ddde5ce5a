use axum::Json;

use crate::message_response::MessageResponse;

pub struct HealthController {}

impl HealthController {
    pub async fn get() -> Json<MessageResponse> {
        Json(MessageResponse { message: "ok".to_string() })
    }
}
