pub mod health_controller;
pub mod authentication_controller;
pub mod user_controller;
pub mod note_controller;
