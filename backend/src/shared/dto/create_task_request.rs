use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub note: Option<String>,
    /// RFC 3339, or a local date/date-time in the owner's zone.
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub important: Option<bool>,
}
