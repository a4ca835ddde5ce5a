use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    api_error::ApiError, create_task_request::CreateTaskRequest, task_response::TaskResponse,
    update_task_request::UpdateTaskRequest,
};

/// Stored shape of a task. Encoded with postcard, so no serde attributes
/// that skip fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub owner: Uuid,
    pub title: String,
    pub note: String,
    pub due_date: Option<DateTime<Utc>>,
    pub important: bool,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Position in the store's insertion order.
    pub sequence: u64,
}

/// A validated creation request.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub note: String,
    pub due_date: Option<DateTime<Utc>>,
    pub important: bool,
}

/// A validated partial update. `due_date: Some(None)` clears the due date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub note: Option<String>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub important: Option<bool>,
    pub completed: Option<bool>,
}

impl Task {
    pub fn new(owner: Uuid, new: NewTask, sequence: u64, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            title: new.title,
            note: new.note,
            due_date: new.due_date,
            important: new.important,
            completed: false,
            created_at: now,
            updated_at: now,
            sequence,
        }
    }

    pub fn apply(&mut self, patch: TaskPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(note) = patch.note {
            self.note = note;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(important) = patch.important {
            self.important = important;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        self.updated_at = now;
    }

    pub fn to_response(&self) -> TaskResponse {
        TaskResponse {
            id: self.id,
            title: self.title.clone(),
            note: self.note.clone(),
            due_date: self.due_date,
            important: self.important,
            completed: self.completed,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl NewTask {
    pub fn from_request(request: CreateTaskRequest, zone: Tz) -> Result<Self, ApiError> {
        Ok(Self {
            title: validate_title(&request.title)?,
            note: request.note.unwrap_or_default(),
            due_date: request
                .due_date
                .as_deref()
                .map(|raw| parse_due_date(raw, zone))
                .transpose()?,
            important: request.important.unwrap_or(false),
        })
    }
}

impl TaskPatch {
    pub fn from_request(request: UpdateTaskRequest, zone: Tz) -> Result<Self, ApiError> {
        let due_date = match request.due_date {
            None => None,
            Some(None) => Some(None),
            Some(Some(raw)) if raw.trim().is_empty() => Some(None),
            Some(Some(raw)) => Some(Some(parse_due_date(&raw, zone)?)),
        };
        Ok(Self {
            title: request.title.as_deref().map(validate_title).transpose()?,
            note: request.note,
            due_date,
            important: request.important,
            completed: request.completed,
        })
    }
}

fn validate_title(raw: &str) -> Result<String, ApiError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(ApiError::Validation("title cannot be empty".to_string()));
    }
    Ok(title.to_string())
}

const LOCAL_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a due date sent by a client.
///
/// RFC 3339 instants are taken as-is. Offset-less date-times and bare
/// dates are wall-clock times in the owner's zone; a bare date means local
/// midnight.
pub fn parse_due_date(raw: &str, zone: Tz) -> Result<DateTime<Utc>, ApiError> {
    let raw = raw.trim();
    let invalid = || ApiError::Validation(format!("invalid due date '{raw}'"));

    let instant = if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        dt.with_timezone(&Utc)
    } else {
        let naive = LOCAL_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .map(|d| d.and_time(chrono::NaiveTime::MIN))
            })
            .ok_or_else(invalid)?;
        zone.from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| ApiError::Validation(format!("'{raw}' does not exist in {}", zone.name())))?
            .with_timezone(&Utc)
    };

    if !(1900..=9999).contains(&instant.year()) {
        return Err(invalid());
    }
    Ok(instant)
}
