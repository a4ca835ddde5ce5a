use serde::Deserialize;

/// Query string of the list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    pub hide_completed: Option<bool>,
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CalendarQuery {
    /// `YYYY-MM`; the current month when absent.
    pub month: Option<String>,
}
