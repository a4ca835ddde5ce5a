// Requests
pub mod register_request;
pub mod login_request;
pub mod user_edit_request;
pub mod create_task_request;
pub mod update_task_request;
pub mod view_query;


// Responses
pub mod message_response;
pub mod login_response;
pub mod user_get_response;
pub mod task_response;
pub mod task_action_response;
pub mod planned_buckets_response;
pub mod calendar_response;
