use crate::{AuthRequest, NoteRequest, Preferences, QuestionRequest, RequestId, SessionToken};

/// Work the shell must perform on behalf of [`crate::update`]. Each request
/// effect is answered by exactly one completion message carrying the same id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Authenticate {
        request_id: RequestId,
        request: AuthRequest,
    },
    /// `session` is the signed-in user's token; the note is then saved to
    /// their history.
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
    SavePreferences(Preferences),
    /// Persist the token of a session the navigator has just committed.
    PersistSession(SessionToken),
    /// Drop the persisted bearer token.
    ClearStoredSession,
}
