use crate::{
    AuthField, AuthResult, ConsultationMode, ConsultationNote, DashboardTab, PatientRecord,
    Preferences, RequestId, Role, SettingChange,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Landing page call to action.
    GetStartedClicked,
    RoleSelected(Role),
    /// Back button on whichever screen offers one.
    BackClicked,
    LogoutClicked,
    /// Switch the auth form between login and registration.
    AuthModeToggled,
    AuthFieldChanged { field: AuthField, value: String },
    AuthSubmitted,
    AuthCompleted {
        request_id: RequestId,
        result: AuthResult,
    },
    TabSelected(DashboardTab),
    ConsultationModeSelected(ConsultationMode),
    PatientNameChanged(String),
    ConsultationInputChanged(String),
    /// Microphone button on the consultation or guest screen.
    RecordingToggled,
    ConsultationSubmitted,
    NewConsultationClicked,
    NoteGenerated {
        request_id: RequestId,
        result: Result<ConsultationNote, String>,
    },
    /// Answer for either the consultation tab (question mode) or the guest screen.
    AnswerReceived {
        request_id: RequestId,
        result: Result<String, String>,
    },
    HistorySearchChanged(String),
    HistoryRecordSelected(String),
    HistoryLoaded {
        request_id: RequestId,
        result: Result<Vec<PatientRecord>, String>,
    },
    SettingChanged(SettingChange),
    SettingsSaved,
    /// Preferences loaded from durable storage at startup.
    PreferencesRestored(Preferences),
    GuestQuestionChanged(String),
    GuestQuestionSubmitted,
    NewQuestionClicked,
    /// Fallback for placeholder wiring.
    NoOp,
}
