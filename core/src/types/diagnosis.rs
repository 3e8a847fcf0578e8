use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{empty_as_none, null_as_default};

/// Style-preference category produced by the diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    Classic,
    Modern,
    Elegant,
    Sporty,
    Casual,
}

impl Archetype {
    pub fn as_str(&self) -> &'static str {
        match self {
            Archetype::Classic => "Classic",
            Archetype::Modern => "Modern",
            Archetype::Elegant => "Elegant",
            Archetype::Sporty => "Sporty",
            Archetype::Casual => "Casual",
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanType {
    #[serde(rename = "Best Value")]
    BestValue,
    Authentic,
}

impl PlanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::BestValue => "Best Value",
            PlanType::Authentic => "Authentic",
        }
    }
}

/// Per-archetype scores. The backend omits archetypes it did not score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeScores {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classic: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modern: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elegant: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sporty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub casual: Option<f64>,
}

impl ArchetypeScores {
    pub fn get(&self, archetype: Archetype) -> Option<f64> {
        match archetype {
            Archetype::Classic => self.classic,
            Archetype::Modern => self.modern,
            Archetype::Elegant => self.elegant,
            Archetype::Sporty => self.sporty,
            Archetype::Casual => self.casual,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    #[serde(default)]
    pub scores: ArchetypeScores,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub id: String,
    pub user_id: String,
    pub tenant_id: String,
    pub archetype: Archetype,
    /// Sent as `""` when no plan was chosen.
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub plan_type: Option<PlanType>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub diagnosis_result: DiagnosisResult,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateDiagnosis {
    pub user_id: String,
    pub archetype: Archetype,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_type: Option<PlanType>,
    pub diagnosis_result: DiagnosisResult,
}

/// Optional filters of `GET /api/diagnoses`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosisFilter {
    pub user_id: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub archetype: Option<Archetype>,
    pub plan_type: Option<PlanType>,
}
