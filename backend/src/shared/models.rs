pub mod app_state;
pub mod settings;
pub mod api_error;
pub mod user;
pub mod task;
