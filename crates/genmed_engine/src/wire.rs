//! JSON bodies exchanged with the backend, and the helpers that read them.

use genmed_core::{Language, PatientRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
pub(crate) struct LoginBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub role: &'static str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenBody {
    pub access_token: Option<String>,
    pub token_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GenerateBody<'a> {
    pub transcription: &'a str,
    pub language: Language,
    pub patient_name: &'a str,
}

/// `/notes/ask` reuses the transcription field for the question text.
#[derive(Debug, Serialize)]
pub(crate) struct AskBody<'a> {
    pub transcription: &'a str,
    pub language: Language,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnswerBody {
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryBody {
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct HistoryEntry {
    #[serde(rename = "_id")]
    pub id: Option<Value>,
    pub patient_name: Option<String>,
    pub timestamp: Option<String>,
    pub note: Option<Value>,
    pub is_critical: Option<bool>,
}

impl HistoryEntry {
    /// `index` stands in for the id when the backend sent none.
    pub(crate) fn into_record(self, index: usize) -> PatientRecord {
        let id = match &self.id {
            Some(Value::String(id)) => id.clone(),
            Some(Value::Object(map)) => match map.get("$oid") {
                Some(Value::String(oid)) => oid.clone(),
                _ => index.to_string(),
            },
            _ => index.to_string(),
        };
        let note_field = |name: &str| {
            self.note
                .as_ref()
                .and_then(|note| note.get(name))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        PatientRecord {
            id,
            patient_name: self.patient_name.clone().unwrap_or_default(),
            date: self
                .timestamp
                .as_deref()
                .map(|ts| ts.chars().take(10).collect())
                .unwrap_or_default(),
            chief_complaint: note_field("chief_complaint"),
            diagnosis: note_field("assessment"),
            is_critical: self.is_critical.unwrap_or(false),
        }
    }
}

/// Server-supplied error text: `message` if present, else a string `detail`.
/// Non-JSON bodies carry no message.
pub(crate) fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    // The backend reports its errors under `detail` (e.g. "Email already
    // registered"), which then wins over the generic client fallbacks.
    ["message", "detail"].into_iter().find_map(|key| {
        value
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(ToOwned::to_owned)
    })
}

pub(crate) fn describe_transport_error(err: &reqwest::Error, fallback: &str) -> String {
    if err.is_timeout() {
        return "Request timed out".to_string();
    }
    if err.is_connect() {
        return "Could not reach the server".to_string();
    }
    let text = err.to_string();
    if text.trim().is_empty() {
        fallback.to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_wins_over_detail() {
        assert_eq!(
            error_message(r#"{"message":"Locked out","detail":"x"}"#).as_deref(),
            Some("Locked out")
        );
        assert_eq!(
            error_message(r#"{"detail":"Email already registered"}"#).as_deref(),
            Some("Email already registered")
        );
    }

    #[test]
    fn structured_or_missing_detail_yields_none() {
        assert_eq!(error_message(r#"{"detail":[{"loc":["body"]}]}"#), None);
        assert_eq!(error_message("<html>Bad Gateway</html>"), None);
        assert_eq!(error_message(""), None);
        assert_eq!(error_message(r#"{"message":"  "}"#), None);
    }

    #[test]
    fn history_entry_maps_to_record() {
        let entry: HistoryEntry = serde_json::from_str(
            r#"{
                "_id": {"$oid": "65f0c1"},
                "patient_name": "Ravi",
                "timestamp": "2024-03-02T10:15:00.123456",
                "note": {"chief_complaint": "Cough", "assessment": "Bronchitis"},
                "is_critical": true
            }"#,
        )
        .unwrap();
        let record = entry.into_record(4);
        assert_eq!(record.id, "65f0c1");
        assert_eq!(record.date, "2024-03-02");
        assert_eq!(record.chief_complaint, "Cough");
        assert_eq!(record.diagnosis, "Bronchitis");
        assert!(record.is_critical);
    }

    #[test]
    fn sparse_history_entry_falls_back_to_index() {
        let entry: HistoryEntry = serde_json::from_str(r#"{"note": "free text"}"#).unwrap();
        let record = entry.into_record(2);
        assert_eq!(record.id, "2");
        assert_eq!(record.patient_name, "");
        assert_eq!(record.chief_complaint, "");
        assert!(!record.is_critical);
    }
}
