//! GenMed core: pure navigation/session state machine and view-model helpers.
mod auth;
mod auth_form;
mod dashboard;
mod effect;
mod guest;
mod identity;
mod msg;
mod navigation;
mod notes;
mod state;
mod update;
mod view_model;

pub use auth::{
    validate_registration, AuthError, AuthField, AuthMode, AuthRequest, AuthResult, AuthSuccess,
    Credentials, ValidationError, DEFAULT_DISPLAY_NAME, MIN_PASSWORD_LENGTH,
};
pub use auth_form::AuthForm;
pub use dashboard::{
    ConsultationPanel, Dashboard, DashboardTab, HistoryPanel, SettingChange, SettingsPanel,
};
pub use effect::Effect;
pub use guest::GuestPanel;
pub use identity::{Identity, Role, Session, SessionToken, UnknownRole};
pub use msg::Msg;
pub use navigation::{Navigator, Screen, TransitionError, Trigger};
pub use notes::{
    CarePlan, ClinicalNote, ConsultationMode, ConsultationNote, Language, NoteRequest,
    Observations, PatientRecord, Preferences, QuestionRequest, UnknownLanguage,
    DEFAULT_PATIENT_NAME,
};
pub use state::{AppState, RequestId};
pub use update::update;
pub use view_model::{
    AppViewModel, AuthFormView, ConsultationView, DashboardView, GuestView, HistoryView,
    IdentityView, SettingsView,
};
