pub mod health_routes;
pub mod authentication_routes;
pub mod note_routes;

use axum::Router;

use crate::app_state::SharedState;

pub fn map_routes(app_state: SharedState) -> Router {
    Router::new()
        .merge(health_routes::get_router())
        .merge(authentication_routes::get_router(app_state.clone()))
        .merge(note_routes::get_router(app_state))
}
