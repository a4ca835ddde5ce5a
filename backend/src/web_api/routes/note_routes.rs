use axum::{Router, middleware, routing::get};
use crate::{app_state::SharedState, authentication::auth::auth_middleware, note_controller::NoteController};

pub const ROUTER_PATH: &str = "/api/note";

pub fn get_router(app_state: SharedState) -> Router {
    Router::new()
        .route(ROUTER_PATH, get(NoteController::get_all).post(NoteController::create))
        .route(format!("{}/search-notes", ROUTER_PATH).as_str(), get(NoteController::search))
        .route(format!("{}/category/:category", ROUTER_PATH).as_str(), get(NoteController::category))
        .route(format!("{}/planned-buckets", ROUTER_PATH).as_str(), get(NoteController::planned_buckets))
        .route(format!("{}/calendar", ROUTER_PATH).as_str(), get(NoteController::calendar))
        .route(
            format!("{}/:id", ROUTER_PATH).as_str(),
            get(NoteController::get_by_id).put(NoteController::update).delete(NoteController::delete),
        )
        .layer(middleware::from_fn_with_state(app_state.clone(), auth_middleware))
        .with_state(app_state)
}
