//! Diesel models for the migrated tables.
//!
//! One struct per table, shared by the SQLite reader and both writers. Field
//! order matches the column order in `crate::schema`, so plain `Queryable`
//! loads work on either backend.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::migration::TableRecord;
use crate::schema;

#[derive(Queryable, Insertable, AsChangeset, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = schema::users)]
#[diesel(treat_none_as_null = true)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub role: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Queryable, Insertable, AsChangeset, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = schema::user_profiles)]
#[diesel(treat_none_as_null = true)]
pub struct UserProfileRecord {
    pub id: String,
    pub user_id: String,
    pub birth_date: Option<String>,
    pub weight_kg: Option<f64>,
    pub is_pregnant: bool,
    pub allergies: Option<String>,
    pub conditions: Option<String>,
    pub updated_at: String,
}

#[derive(Queryable, Insertable, AsChangeset, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = schema::drugs)]
#[diesel(treat_none_as_null = true)]
pub struct DrugRecord {
    pub id: String,
    pub name: String,
    pub generic_name: String,
    pub category: String,
    pub dosage_form: String,
    pub strength_mg: Option<f64>,
    pub max_daily_dose_mg: Option<f64>,
    pub min_age_years: Option<i32>,
    pub warnings: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Queryable, Insertable, AsChangeset, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = schema::symptom_histories)]
#[diesel(treat_none_as_null = true)]
pub struct SymptomHistoryRecord {
    pub id: String,
    pub user_id: String,
    /// JSON array of symptom codes as stored by the app.
    pub symptoms: String,
    pub severity: String,
    pub recommendation: Option<String>,
    pub created_at: String,
}

#[derive(Queryable, Insertable, AsChangeset, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = schema::dose_calculations)]
#[diesel(treat_none_as_null = true)]
pub struct DoseCalculationRecord {
    pub id: String,
    pub user_id: String,
    pub drug_id: String,
    pub age_years: i32,
    pub weight_kg: Option<f64>,
    pub dose_mg: f64,
    pub frequency: String,
    pub created_at: String,
}

#[derive(Queryable, Insertable, AsChangeset, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = schema::reminders)]
#[diesel(treat_none_as_null = true)]
pub struct ReminderRecord {
    pub id: String,
    pub user_id: String,
    pub drug_id: String,
    pub dose_label: String,
    /// Cron-like schedule string.
    pub schedule: String,
    pub is_active: bool,
    pub next_fire_at: Option<String>,
    pub created_at: String,
}

#[derive(Queryable, Insertable, AsChangeset, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = schema::educational_contents)]
pub struct EducationalContentRecord {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub category: String,
    pub body: String,
    pub published: bool,
    pub created_at: String,
}

#[derive(Queryable, Insertable, AsChangeset, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = schema::faqs)]
pub struct FaqRecord {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub category: String,
    pub sort_order: i32,
    pub created_at: String,
}

fn require(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is empty", field));
    }
    Ok(())
}

/// Accepts RFC 3339 text or Prisma's epoch-millisecond integers.
///
/// SQLite hands integer cells back as their decimal text, so both forms reach
/// here as strings and are copied verbatim.
fn require_timestamp(field: &str, value: &str) -> Result<(), String> {
    if let Ok(millis) = value.parse::<i64>() {
        return DateTime::<Utc>::from_timestamp_millis(millis)
            .map(|_| ())
            .ok_or_else(|| format!("{} '{}' is out of range for epoch milliseconds", field, value));
    }
    DateTime::parse_from_rfc3339(value)
        .map(|_| ())
        .map_err(|e| format!("{} '{}' is not an RFC 3339 timestamp ({})", field, value, e))
}

fn optional_timestamp(field: &str, value: Option<&str>) -> Result<(), String> {
    match value {
        Some(v) => require_timestamp(field, v),
        None => Ok(()),
    }
}

fn non_negative(field: &str, value: Option<f64>) -> Result<(), String> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(format!("{} must be >= 0, got {}", field, v)),
        _ => Ok(()),
    }
}

impl TableRecord for UserRecord {
    const TABLE: &'static str = "users";

    fn key(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), String> {
        require("id", &self.id)?;
        // Loose shape check; the app enforces the real rules at sign-up.
        match self.email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
            _ => return Err(format!("email '{}' is malformed", self.email)),
        }
        require("role", &self.role)?;
        require_timestamp("created_at", &self.created_at)?;
        require_timestamp("updated_at", &self.updated_at)
    }
}

impl TableRecord for UserProfileRecord {
    const TABLE: &'static str = "user_profiles";

    fn key(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), String> {
        require("id", &self.id)?;
        require("user_id", &self.user_id)?;
        non_negative("weight_kg", self.weight_kg)?;
        require_timestamp("updated_at", &self.updated_at)
    }
}

impl TableRecord for DrugRecord {
    const TABLE: &'static str = "drugs";

    fn key(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), String> {
        require("id", &self.id)?;
        require("name", &self.name)?;
        require("generic_name", &self.generic_name)?;
        non_negative("strength_mg", self.strength_mg)?;
        non_negative("max_daily_dose_mg", self.max_daily_dose_mg)?;
        if let Some(age) = self.min_age_years {
            if age < 0 {
                return Err(format!("min_age_years must be >= 0, got {}", age));
            }
        }
        require_timestamp("created_at", &self.created_at)?;
        require_timestamp("updated_at", &self.updated_at)
    }
}

impl TableRecord for SymptomHistoryRecord {
    const TABLE: &'static str = "symptom_histories";

    fn key(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), String> {
        require("id", &self.id)?;
        require("user_id", &self.user_id)?;
        serde_json::from_str::<serde_json::Value>(&self.symptoms)
            .map_err(|e| format!("symptoms is not valid JSON ({})", e))?;
        require_timestamp("created_at", &self.created_at)
    }
}

impl TableRecord for DoseCalculationRecord {
    const TABLE: &'static str = "dose_calculations";

    fn key(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), String> {
        require("id", &self.id)?;
        require("user_id", &self.user_id)?;
        require("drug_id", &self.drug_id)?;
        if self.age_years < 0 {
            return Err(format!("age_years must be >= 0, got {}", self.age_years));
        }
        non_negative("weight_kg", self.weight_kg)?;
        non_negative("dose_mg", Some(self.dose_mg))?;
        require_timestamp("created_at", &self.created_at)
    }
}

impl TableRecord for ReminderRecord {
    const TABLE: &'static str = "reminders";

    fn key(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), String> {
        require("id", &self.id)?;
        require("user_id", &self.user_id)?;
        require("drug_id", &self.drug_id)?;
        require("schedule", &self.schedule)?;
        optional_timestamp("next_fire_at", self.next_fire_at.as_deref())?;
        require_timestamp("created_at", &self.created_at)
    }
}

impl TableRecord for EducationalContentRecord {
    const TABLE: &'static str = "educational_contents";

    fn key(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), String> {
        require("id", &self.id)?;
        require("slug", &self.slug)?;
        require("title", &self.title)?;
        require_timestamp("created_at", &self.created_at)
    }
}

impl TableRecord for FaqRecord {
    const TABLE: &'static str = "faqs";

    fn key(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), String> {
        require("id", &self.id)?;
        require("question", &self.question)?;
        require("answer", &self.answer)?;
        require_timestamp("created_at", &self.created_at)
    }
}
