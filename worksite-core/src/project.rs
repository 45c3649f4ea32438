//! The project entity and its create/update payloads.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::status::{ProjectStatus, Stages};
use crate::wire::{de_flag, de_id, de_members, de_opt_date, de_opt_timestamp, de_status, de_text};

/// One installation job.
///
/// Deserializes from either snake_case or camelCase field names; always
/// serializes snake_case.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Project {
    #[serde(deserialize_with = "de_id")]
    pub id: i64,
    #[serde(default, alias = "projectCode", alias = "code", deserialize_with = "de_text")]
    pub project_code: String,
    #[serde(default, deserialize_with = "de_text")]
    pub name: String,
    #[serde(default, deserialize_with = "de_text")]
    pub address: String,
    #[serde(default, alias = "clientName", deserialize_with = "de_text")]
    pub client_name: String,
    #[serde(default, alias = "clientPhone", deserialize_with = "de_text")]
    pub client_phone: String,
    #[serde(default, alias = "salesPerson", deserialize_with = "de_text")]
    pub sales_person: String,
    #[serde(default, deserialize_with = "de_text")]
    pub installer: String,
    #[serde(default, alias = "teamMembers", deserialize_with = "de_members")]
    pub team_members: String,
    #[serde(default, alias = "startDate", deserialize_with = "de_opt_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, alias = "endDate", deserialize_with = "de_opt_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de_status")]
    pub status: ProjectStatus,
    #[serde(default, alias = "isArchived", deserialize_with = "de_flag")]
    pub archived: bool,
    #[serde(default, alias = "todayTask", deserialize_with = "de_text")]
    pub today_task: String,
    #[serde(default, alias = "progressNote", deserialize_with = "de_text")]
    pub progress_note: String,
    #[serde(default, alias = "changeNote", deserialize_with = "de_text")]
    pub change_note: String,
    #[serde(default, alias = "photoUrl", deserialize_with = "de_text")]
    pub photo_url: String,
    #[serde(default)]
    pub stages: Stages,
    #[serde(default, alias = "createdAt", deserialize_with = "de_opt_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "updatedAt", deserialize_with = "de_opt_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Project {
    /// Merge a patch into this project. Fields absent from the patch are kept.
    ///
    /// The merged date range is validated before anything is changed.
    pub fn apply(&mut self, patch: &ProjectPatch) -> Result<(), ValidationError> {
        let start = patch.start_date.or(self.start_date);
        let end = patch.end_date.or(self.end_date);
        check_range(start, end)?;

        fn merge(target: &mut String, value: &Option<String>) {
            if let Some(v) = value {
                target.clone_from(v);
            }
        }

        merge(&mut self.name, &patch.name);
        merge(&mut self.address, &patch.address);
        merge(&mut self.client_name, &patch.client_name);
        merge(&mut self.client_phone, &patch.client_phone);
        merge(&mut self.sales_person, &patch.sales_person);
        merge(&mut self.installer, &patch.installer);
        merge(&mut self.team_members, &patch.team_members);
        merge(&mut self.today_task, &patch.today_task);
        merge(&mut self.progress_note, &patch.progress_note);
        merge(&mut self.change_note, &patch.change_note);
        merge(&mut self.photo_url, &patch.photo_url);
        self.start_date = start;
        self.end_date = end;
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(archived) = patch.archived {
            self.archived = archived;
        }
        if let Some(stages) = &patch.stages {
            self.stages = stages.clone();
        }
        Ok(())
    }

    /// Number of days covered by the date range, inclusive.
    pub fn duration_days(&self) -> Option<i64> {
        match (self.start_date, self.end_date) {
            (Some(s), Some(e)) => Some((e - s).num_days() + 1),
            _ => None,
        }
    }
}

fn check_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<(), ValidationError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => {
            Err(ValidationError::InvertedRange { start, end })
        }
        _ => Ok(()),
    }
}

/// Values for a new project. Identity and code are assigned by the store.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectDraft {
    pub name: String,
    pub address: String,
    pub client_name: String,
    #[serde(default)]
    pub client_phone: String,
    pub sales_person: String,
    pub installer: String,
    #[serde(default)]
    pub team_members: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub today_task: String,
    #[serde(default)]
    pub progress_note: String,
    #[serde(default)]
    pub stages: Stages,
}

impl ProjectDraft {
    /// Check required fields and the date range.
    ///
    /// Every missing field is reported at once.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let text_fields = [
            ("name", &self.name),
            ("address", &self.address),
            ("client_name", &self.client_name),
            ("sales_person", &self.sales_person),
            ("installer", &self.installer),
        ];
        let mut missing: Vec<&'static str> = text_fields
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| *field)
            .collect();
        if self.start_date.is_none() {
            missing.push("start_date");
        }
        if self.end_date.is_none() {
            missing.push("end_date");
        }
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }
        check_range(self.start_date, self.end_date)
    }

    /// Build the project this draft describes under the given identity.
    pub fn into_project(self, id: i64, project_code: String, now: DateTime<Utc>) -> Project {
        Project {
            id,
            project_code,
            name: self.name,
            address: self.address,
            client_name: self.client_name,
            client_phone: self.client_phone,
            sales_person: self.sales_person,
            installer: self.installer,
            team_members: self.team_members,
            start_date: self.start_date,
            end_date: self.end_date,
            status: self.status,
            archived: false,
            today_task: self.today_task,
            progress_note: self.progress_note,
            change_note: String::new(),
            photo_url: String::new(),
            stages: self.stages,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}

/// A partial update. Only fields that are set are sent or applied.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_person: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_members: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub today_task: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stages: Option<Stages>,
}

impl ProjectPatch {
    /// A patch that only toggles the archival flag.
    pub fn archive(archived: bool) -> Self {
        Self {
            archived: Some(archived),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
#[path = "tests/project_tests.rs"]
mod tests;
