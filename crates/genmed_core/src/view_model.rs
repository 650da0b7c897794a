use crate::{
    AppState, AuthMode, ConsultationMode, ConsultationNote, DashboardTab, PatientRecord,
    Preferences, Role, Screen,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub screen: Screen,
    pub identity: Option<IdentityView>,
    pub auth: Option<AuthFormView>,
    pub dashboard: Option<DashboardView>,
    pub guest: Option<GuestView>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityView {
    pub role: Role,
    pub display_name: String,
    pub email: String,
    pub has_session_token: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthFormView {
    pub role: Role,
    pub mode: AuthMode,
    pub email: String,
    pub display_name: String,
    pub organization_name: String,
    /// Submit is disabled while true.
    pub pending: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub tab: DashboardTab,
    pub consultation: ConsultationView,
    pub history: HistoryView,
    pub settings: SettingsView,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsultationView {
    pub mode: ConsultationMode,
    pub patient_name: String,
    pub input: String,
    pub recording: bool,
    pub pending: bool,
    pub note: Option<ConsultationNote>,
    pub answer: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryView {
    pub search: String,
    pub rows: Vec<PatientRecord>,
    pub selected: Option<PatientRecord>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsView {
    pub display_name: String,
    pub email: String,
    pub preferences: Preferences,
    pub saved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestView {
    pub question: String,
    pub recording: bool,
    pub pending: bool,
    pub answer: Option<String>,
    pub error: Option<String>,
}

impl AppViewModel {
    pub(crate) fn build(state: &AppState, dirty: bool) -> Self {
        let identity = state.session().identity().map(|identity| IdentityView {
            role: identity.role,
            display_name: identity.display_name.clone(),
            email: identity.email.clone(),
            has_session_token: identity.session_token.is_some(),
        });

        let auth = state.auth_form().map(|form| AuthFormView {
            role: form.role(),
            mode: form.mode(),
            email: form.credentials().email.clone(),
            display_name: form.credentials().display_name.clone(),
            organization_name: form.credentials().organization_name.clone(),
            pending: form.pending().is_some(),
            error: form.error().map(ToOwned::to_owned),
        });

        let dashboard = state.dashboard().map(|dashboard| {
            let consultation = dashboard.consultation();
            let history = dashboard.history();
            let settings = dashboard.settings();
            DashboardView {
                tab: dashboard.tab(),
                consultation: ConsultationView {
                    mode: consultation.mode(),
                    patient_name: consultation.patient_name().to_string(),
                    input: consultation.input().to_string(),
                    recording: consultation.is_recording(),
                    pending: consultation.pending().is_some(),
                    note: consultation.note().cloned(),
                    answer: consultation.answer().map(ToOwned::to_owned),
                    error: consultation.error().map(ToOwned::to_owned),
                },
                history: HistoryView {
                    search: history.search().to_string(),
                    rows: history.filtered().into_iter().cloned().collect(),
                    selected: history.selected().cloned(),
                    loading: history.pending().is_some(),
                    error: history.error().map(ToOwned::to_owned),
                },
                settings: SettingsView {
                    display_name: settings.display_name().to_string(),
                    email: settings.email().to_string(),
                    preferences: settings.preferences().clone(),
                    saved: settings.is_saved(),
                },
            }
        });

        let guest = state.guest().map(|guest| GuestView {
            question: guest.question().to_string(),
            recording: guest.is_recording(),
            pending: guest.pending().is_some(),
            answer: guest.answer().map(ToOwned::to_owned),
            error: guest.error().map(ToOwned::to_owned),
        });

        Self {
            screen: state.screen(),
            identity,
            auth,
            dashboard,
            guest,
            dirty,
        }
    }
}
