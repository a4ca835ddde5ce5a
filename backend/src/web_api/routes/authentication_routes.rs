use axum::{Router, middleware, routing::{delete, get, post, put}};
use crate::{app_state::SharedState, authentication::auth::auth_middleware, authentication_controller::AuthenticationController, user_controller::UserController};

pub const ROUTER_PATH: &str = "/api/auth";

pub fn get_router(app_state: SharedState) -> Router {
    let public = Router::new()
        .route(format!("{}/register", ROUTER_PATH).as_str(), post(AuthenticationController::register))
        .route(format!("{}/login", ROUTER_PATH).as_str(), post(AuthenticationController::login))
        .route(format!("{}/logout", ROUTER_PATH).as_str(), post(AuthenticationController::logout));

    let protected = Router::new()
        .route(format!("{}/get-user", ROUTER_PATH).as_str(), get(UserController::get))
        .route(format!("{}/edit-user", ROUTER_PATH).as_str(), put(UserController::edit))
        .route(format!("{}/delete-account", ROUTER_PATH).as_str(), delete(UserController::delete_account))
        .layer(middleware::from_fn_with_state(app_state.clone(), auth_middleware));

    public.merge(protected).with_state(app_state)
}
