//! Student record types: stored row, read projection, create payload, patch payload.
//! JSON keys are camelCase for clients; columns are snake_case.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Full stored record, returned by create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub class_enrolled: String,
    pub created_at: DateTime<Utc>,
}

/// Read projection: the four descriptive fields, no identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StudentProjection {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub class_enrolled: String,
}

impl From<&Student> for StudentProjection {
    fn from(s: &Student) -> Self {
        Self {
            first_name: s.first_name.clone(),
            last_name: s.last_name.clone(),
            email: s.email.clone(),
            class_enrolled: s.class_enrolled.clone(),
        }
    }
}

/// The writable field set passed to the store on create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub class_enrolled: String,
}

/// POST /students body. Fields are optional here so presence is checked by the service.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub class_enrolled: Option<String>,
}

/// Changes for PATCH /students/:id. `None` means the field was absent or null.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub class_enrolled: Option<String>,
}

impl StudentPatch {
    /// Merge onto an existing record. Empty strings are ignored like absent fields,
    /// so a field cannot be cleared through a patch.
    pub fn apply_to(self, existing: &Student) -> StudentFields {
        fn pick(new: Option<String>, old: &str) -> String {
            new.filter(|v| !v.is_empty()).unwrap_or_else(|| old.to_string())
        }
        StudentFields {
            first_name: pick(self.first_name, &existing.first_name),
            last_name: pick(self.last_name, &existing.last_name),
            email: pick(self.email, &existing.email),
            class_enrolled: pick(self.class_enrolled, &existing.class_enrolled),
        }
    }
}

/// PATCH /students/:id body: `{ "input": { ... } }`.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub input: Option<StudentPatch>,
}
