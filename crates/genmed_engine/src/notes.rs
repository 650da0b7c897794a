use genmed_core::{ConsultationNote, NoteRequest, PatientRecord, QuestionRequest, SessionToken};
use genmed_logging::{genmed_debug, genmed_warn};
use reqwest::header::AUTHORIZATION;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::auth::DEFAULT_TRANSPORT_FAILURE;
use crate::settings::{ClientSettings, ConfigError};
use crate::wire::{
    describe_transport_error, error_message, AnswerBody, AskBody, GenerateBody, HistoryBody,
};

pub const GENERATE_PATH: &str = "notes/generate";
pub const ASK_PATH: &str = "notes/ask";
pub const HISTORY_PATH: &str = "notes/history";

/// Display text is what the dashboard shows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("Sign in to view patient history")]
    NotSignedIn,
    #[error("{0}")]
    Rejected(String),
    #[error("{0}")]
    Transport(String),
}

/// `session` is the token of the committed session, if any. Requests never
/// fall back to a token found in storage.
#[async_trait::async_trait]
pub trait NotesService: Send + Sync {
    async fn generate_note(
        &self,
        request: NoteRequest,
        session: Option<SessionToken>,
    ) -> Result<ConsultationNote, ServiceError>;
    async fn ask_question(&self, request: QuestionRequest) -> Result<String, ServiceError>;
    async fn load_history(
        &self,
        session: Option<SessionToken>,
    ) -> Result<Vec<PatientRecord>, ServiceError>;
}

pub struct HttpNotesClient {
    client: reqwest::Client,
    generate_url: Url,
    ask_url: Url,
    history_url: Url,
}

impl HttpNotesClient {
    pub fn new(settings: &ClientSettings) -> Result<Self, ConfigError> {
        Ok(Self {
            client: settings.build_client()?,
            generate_url: settings.endpoint(GENERATE_PATH)?,
            ask_url: settings.endpoint(ASK_PATH)?,
            history_url: settings.endpoint(HISTORY_PATH)?,
        })
    }
}

#[async_trait::async_trait]
impl NotesService for HttpNotesClient {
    async fn generate_note(
        &self,
        request: NoteRequest,
        session: Option<SessionToken>,
    ) -> Result<ConsultationNote, ServiceError> {
        let body = GenerateBody {
            transcription: &request.transcription,
            language: request.language,
            patient_name: &request.patient_name,
        };
        let mut builder = self.client.post(self.generate_url.clone()).json(&body);
        // Signed-in users get the note saved to their history.
        if let Some(token) = &session {
            builder = builder.header(AUTHORIZATION, token.authorization_header());
        }
        let note: ConsultationNote = send_json(builder).await?;
        genmed_debug!("Note generated (critical: {})", note.is_critical);
        Ok(note)
    }

    async fn ask_question(&self, request: QuestionRequest) -> Result<String, ServiceError> {
        let body = AskBody {
            transcription: &request.question,
            language: request.language,
        };
        let answer: AnswerBody = send_json(self.client.post(self.ask_url.clone()).json(&body)).await?;
        Ok(answer.answer)
    }

    async fn load_history(
        &self,
        session: Option<SessionToken>,
    ) -> Result<Vec<PatientRecord>, ServiceError> {
        let token = session.ok_or(ServiceError::NotSignedIn)?;
        let builder = self
            .client
            .get(self.history_url.clone())
            .header(AUTHORIZATION, token.authorization_header());
        let body: HistoryBody = send_json(builder).await?;
        let records: Vec<PatientRecord> = body
            .history
            .into_iter()
            .enumerate()
            .map(|(index, entry)| entry.into_record(index))
            .collect();
        genmed_debug!("Loaded {} history records", records.len());
        Ok(records)
    }
}

async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ServiceError> {
    let response = builder.send().await.map_err(transport_failure)?;
    let status = response.status();
    let text = response.text().await.map_err(transport_failure)?;
    if !status.is_success() {
        let message =
            error_message(&text).unwrap_or_else(|| DEFAULT_TRANSPORT_FAILURE.to_string());
        genmed_warn!("Backend returned {}: {}", status, message);
        return Err(ServiceError::Rejected(message));
    }
    serde_json::from_str(&text).map_err(|err| {
        genmed_warn!("Unreadable backend response: {}", err);
        ServiceError::Transport(DEFAULT_TRANSPORT_FAILURE.to_string())
    })
}

fn transport_failure(err: reqwest::Error) -> ServiceError {
    ServiceError::Transport(describe_transport_error(&err, DEFAULT_TRANSPORT_FAILURE))
}
