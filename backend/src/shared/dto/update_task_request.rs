use serde::{Deserialize, Deserializer};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub note: Option<String>,
    /// Absent keeps the due date, `null` clears it.
    #[serde(default, deserialize_with = "present")]
    pub due_date: Option<Option<String>>,
    pub important: Option<bool>,
    pub completed: Option<bool>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}
