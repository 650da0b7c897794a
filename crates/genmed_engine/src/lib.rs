//! GenMed engine: HTTP clients, durable client storage and effect execution.
mod auth;
mod engine;
mod notes;
mod persist;
mod settings;
mod store;
mod wire;

pub use auth::{
    Authenticator, HttpAuthClient, DEFAULT_LOGIN_FAILURE, DEFAULT_REGISTER_FAILURE,
    DEFAULT_TRANSPORT_FAILURE,
};
pub use engine::{ChannelEventSink, EngineError, EngineEvent, EngineHandle, EventSink};
pub use notes::{HttpNotesClient, NotesService, ServiceError};
pub use persist::{ensure_state_dir, AtomicFileWriter, PersistError};
pub use settings::{ClientSettings, ConfigError, DEFAULT_BASE_URL};
pub use store::{
    clear_session_token, load_preferences, load_session_token, save_preferences,
    save_session_token, DurableStore, FileStore, MemoryStore, StoreError, ACCESS_TOKEN_KEY,
    PREFERENCES_KEY, STORE_FILENAME, TOKEN_TYPE_KEY,
};
