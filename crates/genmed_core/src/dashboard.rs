//! Local state of the signed-in dashboard and its three tabs.

use crate::{
    ConsultationMode, ConsultationNote, Identity, Language, NoteRequest, PatientRecord,
    Preferences, QuestionRequest, RequestId, DEFAULT_PATIENT_NAME,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardTab {
    #[default]
    Consultation,
    History,
    Settings,
}

/// Request produced by the consultation tab, depending on its mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ConsultationSubmission {
    Note(NoteRequest),
    Question(QuestionRequest),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConsultationPanel {
    mode: ConsultationMode,
    patient_name: String,
    input: String,
    recording: bool,
    pending: Option<RequestId>,
    note: Option<ConsultationNote>,
    answer: Option<String>,
    error: Option<String>,
}

impl ConsultationPanel {
    pub fn mode(&self) -> ConsultationMode {
        self.mode
    }

    pub fn patient_name(&self) -> &str {
        &self.patient_name
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn pending(&self) -> Option<RequestId> {
        self.pending
    }

    pub fn note(&self) -> Option<&ConsultationNote> {
        self.note.as_ref()
    }

    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub(crate) fn set_mode(&mut self, mode: ConsultationMode) {
        self.mode = mode;
    }

    pub(crate) fn set_patient_name(&mut self, name: String) {
        self.patient_name = name;
    }

    pub(crate) fn set_input(&mut self, input: String) {
        self.input = input;
    }

    pub(crate) fn toggle_recording(&mut self) {
        self.recording = !self.recording;
    }

    pub(crate) fn submission(&self, language: Language) -> Option<ConsultationSubmission> {
        let text = self.input.trim();
        if self.pending.is_some() || text.is_empty() {
            return None;
        }
        let submission = match self.mode {
            ConsultationMode::Consultation => {
                let name = self.patient_name.trim();
                ConsultationSubmission::Note(NoteRequest {
                    transcription: text.to_string(),
                    patient_name: if name.is_empty() {
                        DEFAULT_PATIENT_NAME.to_string()
                    } else {
                        name.to_string()
                    },
                    language,
                })
            }
            ConsultationMode::Question => ConsultationSubmission::Question(QuestionRequest {
                question: text.to_string(),
                language,
            }),
        };
        Some(submission)
    }

    pub(crate) fn mark_pending(&mut self, request_id: RequestId) {
        self.pending = Some(request_id);
        self.error = None;
    }

    pub(crate) fn is_waiting_for(&self, request_id: RequestId) -> bool {
        self.pending == Some(request_id)
    }

    pub(crate) fn complete_note(&mut self, result: Result<ConsultationNote, String>) {
        self.pending = None;
        match result {
            Ok(note) => {
                self.note = Some(note);
                self.answer = None;
            }
            Err(message) => self.error = Some(message),
        }
    }

    pub(crate) fn complete_answer(&mut self, result: Result<String, String>) {
        self.pending = None;
        match result {
            Ok(answer) => {
                self.answer = Some(answer);
                self.note = None;
            }
            Err(message) => self.error = Some(message),
        }
    }

    /// "New consultation": clears inputs and results, keeps the mode.
    pub(crate) fn reset(&mut self) {
        if self.pending.is_some() {
            return;
        }
        self.patient_name.clear();
        self.input.clear();
        self.note = None;
        self.answer = None;
        self.error = None;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HistoryPanel {
    search: String,
    records: Vec<PatientRecord>,
    selected: Option<String>,
    pending: Option<RequestId>,
    error: Option<String>,
}

impl HistoryPanel {
    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn records(&self) -> &[PatientRecord] {
        &self.records
    }

    pub fn filtered(&self) -> Vec<&PatientRecord> {
        self.records
            .iter()
            .filter(|record| record.matches(&self.search))
            .collect()
    }

    /// The selected record, even if the current search hides it.
    pub fn selected(&self) -> Option<&PatientRecord> {
        let id = self.selected.as_deref()?;
        self.records.iter().find(|record| record.id == id)
    }

    pub fn pending(&self) -> Option<RequestId> {
        self.pending
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub(crate) fn set_search(&mut self, term: String) {
        self.search = term;
    }

    pub(crate) fn select(&mut self, id: &str) -> bool {
        if self.records.iter().any(|record| record.id == id) {
            self.selected = Some(id.to_string());
            true
        } else {
            false
        }
    }

    pub(crate) fn mark_pending(&mut self, request_id: RequestId) {
        self.pending = Some(request_id);
        self.error = None;
    }

    pub(crate) fn is_waiting_for(&self, request_id: RequestId) -> bool {
        self.pending == Some(request_id)
    }

    pub(crate) fn complete(&mut self, result: Result<Vec<PatientRecord>, String>) {
        self.pending = None;
        match result {
            Ok(records) => {
                if let Some(id) = self.selected.as_deref() {
                    if !records.iter().any(|record| record.id == id) {
                        self.selected = None;
                    }
                }
                self.records = records;
            }
            Err(message) => self.error = Some(message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingChange {
    DisplayName(String),
    Email(String),
    Language(Language),
    Notifications(bool),
    VoiceEnabled(bool),
    AutoSave(bool),
}

/// Uncommitted edits on the settings tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsPanel {
    display_name: String,
    email: String,
    preferences: Preferences,
    saved: bool,
}

impl SettingsPanel {
    pub(crate) fn new(identity: Option<&Identity>, preferences: &Preferences) -> Self {
        Self {
            display_name: identity.map(|id| id.display_name.clone()).unwrap_or_default(),
            email: identity.map(|id| id.email.clone()).unwrap_or_default(),
            preferences: preferences.clone(),
            saved: false,
        }
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn is_saved(&self) -> bool {
        self.saved
    }

    pub(crate) fn apply(&mut self, change: SettingChange) {
        match change {
            SettingChange::DisplayName(name) => self.display_name = name,
            SettingChange::Email(email) => self.email = email,
            SettingChange::Language(language) => self.preferences.language = language,
            SettingChange::Notifications(on) => self.preferences.notifications = on,
            SettingChange::VoiceEnabled(on) => self.preferences.voice_enabled = on,
            SettingChange::AutoSave(on) => self.preferences.auto_save = on,
        }
        self.saved = false;
    }

    pub(crate) fn mark_saved(&mut self) {
        self.saved = true;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    tab: DashboardTab,
    consultation: ConsultationPanel,
    history: HistoryPanel,
    settings: SettingsPanel,
}

impl Dashboard {
    pub(crate) fn new(identity: Option<&Identity>, preferences: &Preferences) -> Self {
        Self {
            tab: DashboardTab::Consultation,
            consultation: ConsultationPanel::default(),
            history: HistoryPanel::default(),
            settings: SettingsPanel::new(identity, preferences),
        }
    }

    pub fn tab(&self) -> DashboardTab {
        self.tab
    }

    pub fn consultation(&self) -> &ConsultationPanel {
        &self.consultation
    }

    pub fn history(&self) -> &HistoryPanel {
        &self.history
    }

    pub fn settings(&self) -> &SettingsPanel {
        &self.settings
    }

    pub(crate) fn set_tab(&mut self, tab: DashboardTab) {
        self.tab = tab;
    }

    pub(crate) fn consultation_mut(&mut self) -> &mut ConsultationPanel {
        &mut self.consultation
    }

    pub(crate) fn history_mut(&mut self) -> &mut HistoryPanel {
        &mut self.history
    }

    pub(crate) fn settings_mut(&mut self) -> &mut SettingsPanel {
        &mut self.settings
    }
}
