use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    api_error::ApiError, authentication::auth, register_request::RegisterRequest,
    user_edit_request::UserEditRequest, user_get_response::UserGetResponse,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// Lower-cased; the login identifier.
    pub email: String,
    pub password_hash: String,
    /// IANA zone name. Day boundaries for this user's views are computed here.
    pub time_zone: String,
    pub created_at: DateTime<Utc>,
}

/// A validated profile edit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserEdit {
    pub name: Option<String>,
    pub time_zone: Option<Tz>,
}

impl User {
    pub fn new(request: RegisterRequest, default_zone: Tz) -> Result<Self, ApiError> {
        let name = validate_name(&request.name)?;
        let email = normalize_email(&request.email)?;
        if request.password.trim().is_empty() {
            return Err(ApiError::Validation("password cannot be empty".to_string()));
        }
        if request.password != request.repeat_password {
            return Err(ApiError::Validation("Passwords do not match".to_string()));
        }
        let time_zone = match request.time_zone.as_deref() {
            Some(raw) => parse_zone(raw)?,
            None => default_zone,
        };
        let password_hash = auth::hash_password(&request.password)
            .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))?;

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            time_zone: time_zone.name().to_string(),
            created_at: Utc::now(),
        })
    }

    pub fn edit(self, edit: UserEdit) -> Self {
        Self {
            name: edit.name.unwrap_or(self.name),
            time_zone: edit
                .time_zone
                .map(|z| z.name().to_string())
                .unwrap_or(self.time_zone),
            ..self
        }
    }

    /// The user's zone. Stored names are validated on the way in, so the
    /// UTC fallback only covers a zone dropped from the tz database.
    pub fn zone(&self) -> Tz {
        self.time_zone.parse::<Tz>().unwrap_or_else(|_| {
            tracing::warn!(user = %self.id, zone = %self.time_zone, "unknown stored time zone, using UTC");
            chrono_tz::UTC
        })
    }

    pub fn to_get_dto(&self) -> UserGetResponse {
        UserGetResponse {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            time_zone: self.time_zone.clone(),
            created_at: self.created_at,
        }
    }
}

impl UserEdit {
    pub fn from_request(request: UserEditRequest) -> Result<Self, ApiError> {
        Ok(Self {
            name: request.name.as_deref().map(validate_name).transpose()?,
            time_zone: request.time_zone.as_deref().map(parse_zone).transpose()?,
        })
    }
}

pub fn normalize_email(raw: &str) -> Result<String, ApiError> {
    let email = raw.trim().to_lowercase();
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if !well_formed {
        return Err(ApiError::Validation(format!("invalid email '{}'", raw.trim())));
    }
    Ok(email)
}

fn validate_name(raw: &str) -> Result<String, ApiError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("name cannot be empty".to_string()));
    }
    Ok(name.to_string())
}

fn parse_zone(raw: &str) -> Result<Tz, ApiError> {
    raw.trim()
        .parse::<Tz>()
        .map_err(|_| ApiError::Validation(format!("unknown time zone '{}'", raw.trim())))
}
