use std::sync::mpsc;

use genmed_core::{Effect, Msg, Preferences};
use genmed_engine::{
    clear_session_token, load_preferences, save_preferences, save_session_token, EngineEvent,
    EngineHandle, EventSink,
};
use genmed_logging::{genmed_error, genmed_info, genmed_warn};

use super::app::Inbox;

/// Executes effects produced by `update`: network requests go to the engine,
/// storage writes happen inline.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Authenticate {
                    request_id,
                    request,
                } => {
                    genmed_info!(
                        "Authenticate request_id={} mode={:?} role={}",
                        request_id,
                        request.mode,
                        request.role
                    );
                    self.engine.authenticate(request_id, request);
                }
                Effect::GenerateNote {
                    request_id,
                    request,
                    session,
                } => {
                    genmed_info!(
                        "GenerateNote request_id={} text_len={} language={} signed_in={}",
                        request_id,
                        request.transcription.len(),
                        request.language.code(),
                        session.is_some()
                    );
                    self.engine.generate_note(request_id, request, session);
                }
                Effect::AskQuestion {
                    request_id,
                    request,
                } => {
                    genmed_info!("AskQuestion request_id={}", request_id);
                    self.engine.ask_question(request_id, request);
                }
                Effect::LoadHistory {
                    request_id,
                    session,
                } => {
                    genmed_info!("LoadHistory request_id={}", request_id);
                    self.engine.load_history(request_id, session);
                }
                Effect::SavePreferences(preferences) => {
                    if let Err(err) = save_preferences(self.engine.store().as_ref(), &preferences)
                    {
                        genmed_error!("Failed to save preferences: {}", err);
                    }
                }
                Effect::PersistSession(token) => {
                    if let Err(err) = save_session_token(self.engine.store().as_ref(), &token) {
                        genmed_error!("Failed to persist session token: {}", err);
                    }
                }
                Effect::ClearStoredSession => {
                    if let Err(err) = clear_session_token(self.engine.store().as_ref()) {
                        genmed_error!("Failed to clear stored session: {}", err);
                    }
                }
            }
        }
    }

    pub fn restore_preferences(&self) -> Option<Preferences> {
        match load_preferences(self.engine.store().as_ref()) {
            Ok(preferences) => preferences,
            Err(err) => {
                genmed_warn!("Ignoring stored preferences: {}", err);
                None
            }
        }
    }
}

/// Forwards engine completions into the console loop as core messages.
pub struct InboxSink {
    tx: mpsc::Sender<Inbox>,
}

impl InboxSink {
    pub fn new(tx: mpsc::Sender<Inbox>) -> Self {
        Self { tx }
    }
}

impl EventSink for InboxSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(Inbox::Msg(event_to_msg(event)));
    }
}

pub fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::AuthCompleted { request_id, result } => {
            Msg::AuthCompleted { request_id, result }
        }
        EngineEvent::NoteGenerated { request_id, result } => Msg::NoteGenerated {
            request_id,
            result: result.map_err(|err| err.to_string()),
        },
        EngineEvent::QuestionAnswered { request_id, result } => Msg::AnswerReceived {
            request_id,
            result: result.map_err(|err| err.to_string()),
        },
        EngineEvent::HistoryLoaded { request_id, result } => Msg::HistoryLoaded {
            request_id,
            result: result.map_err(|err| err.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use genmed_core::{update, AppState, AuthSuccess, Role, SessionToken};
    use genmed_engine::{
        load_session_token, ClientSettings, DurableStore, MemoryStore, ServiceError,
    };
    use pretty_assertions::assert_eq;

    use super::*;

    fn runner(store: Arc<MemoryStore>) -> EffectRunner {
        let (tx, _rx) = mpsc::channel();
        let engine = EngineHandle::new(
            &ClientSettings::default(),
            store,
            Arc::new(InboxSink::new(tx)),
        )
        .expect("engine");
        EffectRunner::new(engine)
    }

    fn signing_in() -> (AppState, u64) {
        let mut state = AppState::new();
        let mut effects = Vec::new();
        for msg in [
            Msg::GetStartedClicked,
            Msg::RoleSelected(Role::Doctor),
            Msg::AuthSubmitted,
        ] {
            let (next, produced) = update(state, msg);
            state = next;
            effects = produced;
        }
        match effects.as_slice() {
            [Effect::Authenticate { request_id, .. }] => (state, *request_id),
            other => panic!("unexpected effects: {other:?}"),
        }
    }

    fn completion(request_id: u64, token: &str) -> Msg {
        Msg::AuthCompleted {
            request_id,
            result: Ok(AuthSuccess {
                role: Role::Doctor,
                email: "rao@example.com".to_string(),
                session_token: Some(SessionToken::new(token, "bearer")),
                display_name: "Dr. Rao".to_string(),
            }),
        }
    }

    #[test]
    fn committed_login_persists_its_token() {
        genmed_logging::initialize_for_tests();
        let store = Arc::new(MemoryStore::new());
        let runner = runner(store.clone());

        let (state, request_id) = signing_in();
        let (_state, effects) = update(state, completion(request_id, "abc"));
        runner.run(effects);

        assert_eq!(
            load_session_token(&*store).unwrap(),
            Some(SessionToken::new("abc", "bearer"))
        );
    }

    #[test]
    fn abandoned_login_leaves_store_empty() {
        genmed_logging::initialize_for_tests();
        let store = Arc::new(MemoryStore::new());
        let runner = runner(store.clone());

        let (state, request_id) = signing_in();
        let (state, effects) = update(state, Msg::BackClicked);
        runner.run(effects);
        let (_state, effects) = update(state, completion(request_id, "abandoned"));
        runner.run(effects);

        assert_eq!(load_session_token(&*store).unwrap(), None);
        assert_eq!(store.get("access_token").unwrap(), None);
    }

    #[test]
    fn logout_removes_persisted_token() {
        let store = Arc::new(MemoryStore::new());
        let runner = runner(store.clone());

        let (state, request_id) = signing_in();
        let (state, effects) = update(state, completion(request_id, "abc"));
        runner.run(effects);
        let (_state, effects) = update(state, Msg::LogoutClicked);
        runner.run(effects);

        assert_eq!(load_session_token(&*store).unwrap(), None);
    }

    #[test]
    fn service_errors_become_display_text() {
        let msg = event_to_msg(EngineEvent::HistoryLoaded {
            request_id: 4,
            result: Err(ServiceError::NotSignedIn),
        });
        assert_eq!(
            msg,
            Msg::HistoryLoaded {
                request_id: 4,
                result: Err("Sign in to view patient history".to_string()),
            }
        );
    }

    #[test]
    fn answers_keep_their_request_id() {
        let msg = event_to_msg(EngineEvent::QuestionAnswered {
            request_id: 7,
            result: Ok("Rest and fluids".to_string()),
        });
        assert_eq!(
            msg,
            Msg::AnswerReceived {
                request_id: 7,
                result: Ok("Rest and fluids".to_string()),
            }
        );
    }
}
