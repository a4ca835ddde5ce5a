use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Extension, Json,
};

use crate::{
    api_error::ApiError,
    app_state::SharedState,
    authentication::auth,
    message_response::MessageResponse,
    user::{User, UserEdit},
    user_edit_request::UserEditRequest,
    user_get_response::UserGetResponse,
};

pub struct UserController {}

impl UserController {
    pub async fn get(Extension(user): Extension<User>) -> Json<UserGetResponse> {
        Json(user.to_get_dto())
    }

    pub async fn edit(
        State(state): State<SharedState>,
        Extension(user): Extension<User>,
        Json(body): Json<UserEditRequest>,
    ) -> Result<Json<UserGetResponse>, ApiError> {
        let edit = UserEdit::from_request(body)?;
        let edited = state
            .data_context
            .edit_user(user.id, edit)?
            .ok_or(ApiError::NotFound)?;
        Ok(Json(edited.to_get_dto()))
    }

    /// Removes the account and every task it owns, then ends the session.
    pub async fn delete_account(
        State(state): State<SharedState>,
        Extension(user): Extension<User>,
    ) -> Result<impl IntoResponse, ApiError> {
        let removed = state
            .data_context
            .delete_user(user.id)?
            .ok_or(ApiError::NotFound)?;
        tracing::info!(user = %user.id, tasks = removed, "account deleted");

        Ok((
            [(header::SET_COOKIE, auth::expired_session_cookie())],
            Json(MessageResponse { message: "Account deleted".to_string() }),
        ))
    }
}
