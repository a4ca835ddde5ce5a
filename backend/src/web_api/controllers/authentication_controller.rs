use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::{
    api_error::ApiError,
    app_state::SharedState,
    authentication::auth,
    login_request::LoginRequest,
    login_response::LoginResponse,
    message_response::MessageResponse,
    register_request::RegisterRequest,
    user::{normalize_email, User},
};

pub struct AuthenticationController {}

impl AuthenticationController {
    pub async fn register(
        State(state): State<SharedState>,
        Json(payload): Json<RegisterRequest>,
    ) -> Result<impl IntoResponse, ApiError> {
        let default_zone = state
            .settings
            .default_zone()
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        let user = User::new(payload, default_zone)?;

        if !state.data_context.create_user(&user)? {
            return Err(ApiError::Conflict("Email is already registered".to_string()));
        }
        tracing::info!(user = %user.id, "user registered");

        let (cookie, body) = Self::session(&state, &user, "Registered")?;
        Ok((StatusCode::CREATED, [(header::SET_COOKIE, cookie)], Json(body)))
    }

    pub async fn login(
        State(state): State<SharedState>,
        Json(payload): Json<LoginRequest>,
    ) -> Result<impl IntoResponse, ApiError> {
        let invalid = || ApiError::Unauthorized("Invalid credentials");

        let email = normalize_email(&payload.email).map_err(|_| invalid())?;
        let user = state
            .data_context
            .get_user_by_email(&email)?
            .ok_or_else(invalid)?;

        if !auth::verify_password(&payload.password, &user.password_hash) {
            tracing::info!(user = %user.id, "rejected login");
            return Err(invalid());
        }

        tracing::info!(user = %user.id, "user logged in");
        let (cookie, body) = Self::session(&state, &user, "Logged in")?;
        Ok(([(header::SET_COOKIE, cookie)], Json(body)))
    }

    pub async fn logout() -> impl IntoResponse {
        (
            [(header::SET_COOKIE, auth::expired_session_cookie())],
            Json(MessageResponse { message: "Logged out".to_string() }),
        )
    }

    fn session(state: &SharedState, user: &User, message: &str) -> Result<(String, LoginResponse), ApiError> {
        let token = auth::create_token(user, &state.settings)
            .map_err(|e| ApiError::Internal(format!("token creation failed: {e}")))?;
        let cookie = auth::session_cookie(&token, &state.settings);
        Ok((
            cookie,
            LoginResponse {
                message: message.to_string(),
                token,
                user: user.to_get_dto(),
            },
        ))
    }
}
