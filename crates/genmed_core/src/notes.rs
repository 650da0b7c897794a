//! Clinical notes, patient history records and user preferences.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Patient name sent when the form was left blank.
pub const DEFAULT_PATIENT_NAME: &str = "Patient";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "te")]
    Telugu,
    #[serde(rename = "ta")]
    Tamil,
    #[serde(rename = "bn")]
    Bengali,
    #[serde(rename = "mr")]
    Marathi,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::English,
        Language::Hindi,
        Language::Telugu,
        Language::Tamil,
        Language::Bengali,
        Language::Marathi,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Telugu => "te",
            Language::Tamil => "ta",
            Language::Bengali => "bn",
            Language::Marathi => "mr",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Telugu => "Telugu",
            Language::Tamil => "Tamil",
            Language::Bengali => "Bengali",
            Language::Marathi => "Marathi",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported language '{0}'")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();
        Language::ALL
            .into_iter()
            .find(|lang| {
                lang.code().eq_ignore_ascii_case(wanted) || lang.label().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| UnknownLanguage(raw.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub language: Language,
    pub notifications: bool,
    pub voice_enabled: bool,
    pub auto_save: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            language: Language::English,
            notifications: true,
            voice_enabled: true,
            auto_save: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsultationMode {
    /// Describe a patient and receive a structured note.
    #[default]
    Consultation,
    /// Free-form medical question.
    Question,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Observations {
    #[serde(deserialize_with = "loose_text")]
    pub temperature: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub heart_rate: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub blood_pressure: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub general_condition: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct CarePlan {
    #[serde(deserialize_with = "loose_text")]
    pub medications: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub first_aid: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub referral: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub follow_up: Option<String>,
}

/// Structured note body. Every section is optional; `error` is set when the
/// note could not be generated.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ClinicalNote {
    pub chief_complaint: Option<String>,
    pub history: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub symptoms: Vec<String>,
    pub observations: Option<Observations>,
    pub assessment: Option<String>,
    pub plan: Option<CarePlan>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConsultationNote {
    #[serde(default)]
    pub patient_name: String,
    #[serde(default)]
    pub note: ClinicalNote,
    #[serde(default)]
    pub is_critical: bool,
}

// Note bodies are model output relayed verbatim by the backend: vitals may
// arrive as numbers and empty lists as null.
fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Integer(i64),
        Float(f64),
        Flag(bool),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|value| match value {
        Scalar::Text(text) => text,
        Scalar::Integer(number) => number.to_string(),
        Scalar::Float(number) => number.to_string(),
        Scalar::Flag(flag) => flag.to_string(),
    }))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A previously saved consultation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientRecord {
    pub id: String,
    pub patient_name: String,
    pub date: String,
    pub chief_complaint: String,
    pub diagnosis: String,
    pub is_critical: bool,
}

impl PatientRecord {
    /// Case-insensitive match on patient name or chief complaint.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.patient_name.to_lowercase().contains(&term)
            || self.chief_complaint.to_lowercase().contains(&term)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRequest {
    pub transcription: String,
    pub patient_name: String,
    pub language: Language,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRequest {
    pub question: String,
    pub language: Language,
}
