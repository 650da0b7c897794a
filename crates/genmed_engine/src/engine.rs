use std::io;
use std::sync::{mpsc, Arc};
use std::thread;

use genmed_core::{
    AuthRequest, AuthResult, ConsultationNote, NoteRequest, PatientRecord, QuestionRequest,
    RequestId, SessionToken,
};
use genmed_logging::{genmed_debug, genmed_warn};
use thiserror::Error;

use crate::auth::{Authenticator, HttpAuthClient};
use crate::notes::{HttpNotesClient, NotesService, ServiceError};
use crate::settings::{ClientSettings, ConfigError};
use crate::store::DurableStore;

/// Completion of one request. Each command yields exactly one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    AuthCompleted {
        request_id: RequestId,
        result: AuthResult,
    },
    NoteGenerated {
        request_id: RequestId,
        result: Result<ConsultationNote, ServiceError>,
    },
    QuestionAnswered {
        request_id: RequestId,
        result: Result<String, ServiceError>,
    },
    HistoryLoaded {
        request_id: RequestId,
        result: Result<Vec<PatientRecord>, ServiceError>,
    },
}

impl EngineEvent {
    pub fn request_id(&self) -> RequestId {
        match self {
            EngineEvent::AuthCompleted { request_id, .. }
            | EngineEvent::NoteGenerated { request_id, .. }
            | EngineEvent::QuestionAnswered { request_id, .. }
            | EngineEvent::HistoryLoaded { request_id, .. } => *request_id,
        }
    }
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to start engine: {0}")]
    Startup(#[from] io::Error),
}

enum EngineCommand {
    Authenticate {
        request_id: RequestId,
        request: AuthRequest,
    },
    GenerateNote {
        request_id: RequestId,
        request: NoteRequest,
        session: Option<SessionToken>,
    },
    AskQuestion {
        request_id: RequestId,
        request: QuestionRequest,
    },
    LoadHistory {
        request_id: RequestId,
        session: Option<SessionToken>,
    },
}

/// Runs requests on a background tokio runtime. Commands are queued over a
/// channel and never block the caller; completions go to the [`EventSink`].
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    store: Arc<dyn DurableStore>,
}

impl EngineHandle {
    pub fn new(
        settings: &ClientSettings,
        store: Arc<dyn DurableStore>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let auth = Arc::new(HttpAuthClient::new(settings)?);
        let notes = Arc::new(HttpNotesClient::new(settings)?);
        Self::with_services(auth, notes, store, sink)
    }

    pub fn with_services(
        auth: Arc<dyn Authenticator>,
        notes: Arc<dyn NotesService>,
        store: Arc<dyn DurableStore>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("genmed-worker")
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel::<EngineCommand>();

        thread::Builder::new()
            .name("genmed-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let auth = auth.clone();
                    let notes = notes.clone();
                    let sink = sink.clone();
                    runtime.spawn(async move {
                        let event = handle_command(auth.as_ref(), notes.as_ref(), command).await;
                        genmed_debug!("Request {} completed", event.request_id());
                        sink.emit(event);
                    });
                }
                genmed_debug!("Engine command channel closed");
            })?;

        Ok(Self { cmd_tx, store })
    }

    pub fn store(&self) -> &Arc<dyn DurableStore> {
        &self.store
    }

    pub fn authenticate(&self, request_id: RequestId, request: AuthRequest) {
        self.send(EngineCommand::Authenticate {
            request_id,
            request,
        });
    }

    pub fn generate_note(
        &self,
        request_id: RequestId,
        request: NoteRequest,
        session: Option<SessionToken>,
    ) {
        self.send(EngineCommand::GenerateNote {
            request_id,
            request,
            session,
        });
    }

    pub fn ask_question(&self, request_id: RequestId, request: QuestionRequest) {
        self.send(EngineCommand::AskQuestion {
            request_id,
            request,
        });
    }

    pub fn load_history(&self, request_id: RequestId, session: Option<SessionToken>) {
        self.send(EngineCommand::LoadHistory {
            request_id,
            session,
        });
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            genmed_warn!("Engine is not running; request dropped");
        }
    }
}

async fn handle_command(
    auth: &dyn Authenticator,
    notes: &dyn NotesService,
    command: EngineCommand,
) -> EngineEvent {
    match command {
        EngineCommand::Authenticate {
            request_id,
            request,
        } => EngineEvent::AuthCompleted {
            request_id,
            result: auth.authenticate(request).await,
        },
        EngineCommand::GenerateNote {
            request_id,
            request,
            session,
        } => EngineEvent::NoteGenerated {
            request_id,
            result: notes.generate_note(request, session).await,
        },
        EngineCommand::AskQuestion {
            request_id,
            request,
        } => EngineEvent::QuestionAnswered {
            request_id,
            result: notes.ask_question(request).await,
        },
        EngineCommand::LoadHistory {
            request_id,
            session,
        } => EngineEvent::HistoryLoaded {
            request_id,
            result: notes.load_history(session).await,
        },
    }
}
