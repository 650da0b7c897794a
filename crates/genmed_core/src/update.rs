use genmed_logging::{genmed_error, genmed_info, genmed_warn};

use crate::dashboard::ConsultationSubmission;
use crate::state::Panel;
use crate::{AppState, DashboardTab, Effect, Msg, RequestId, SessionToken, Trigger};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::GetStartedClicked => navigate(&mut state, Trigger::GetStarted),
        Msg::RoleSelected(role) => navigate(&mut state, Trigger::SelectRole(role)),
        Msg::BackClicked => navigate(&mut state, Trigger::Back),
        Msg::LogoutClicked => {
            if state.fire(Trigger::Logout).is_ok() {
                vec![Effect::ClearStoredSession]
            } else {
                Vec::new()
            }
        }
        Msg::AuthModeToggled => {
            if let Panel::Auth(form) = &mut state.panel {
                if form.toggle_mode() {
                    state.mark_dirty();
                }
            }
            Vec::new()
        }
        Msg::AuthFieldChanged { field, value } => {
            if let Panel::Auth(form) = &mut state.panel {
                form.edit(field, value);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::AuthSubmitted => submit_auth(&mut state),
        Msg::AuthCompleted { request_id, result } => {
            let settled = match &mut state.panel {
                Panel::Auth(form) => form.settle(request_id),
                _ => false,
            };
            if !settled {
                genmed_warn!("Dropping stale sign-in result for request {}", request_id);
                return (state, Vec::new());
            }
            state.mark_dirty();
            match result {
                Ok(success) => {
                    let role = success.role;
                    let token = success.session_token.clone();
                    match state.fire(Trigger::AuthSucceeded(success.into_identity())) {
                        Ok(_) => {
                            genmed_info!("Signed in as {}", role);
                            // The stored token always mirrors the committed session.
                            match token {
                                Some(token) => vec![Effect::PersistSession(token)],
                                None => vec![Effect::ClearStoredSession],
                            }
                        }
                        Err(err) => {
                            genmed_error!("Sign-in result not applied: {}", err);
                            if let Panel::Auth(form) = &mut state.panel {
                                form.fail(err.to_string());
                            }
                            Vec::new()
                        }
                    }
                }
                Err(err) => {
                    genmed_warn!("Sign-in failed: {}", err);
                    if let Panel::Auth(form) = &mut state.panel {
                        form.fail(err.to_string());
                    }
                    Vec::new()
                }
            }
        }
        Msg::TabSelected(tab) => select_tab(&mut state, tab),
        Msg::ConsultationModeSelected(mode) => {
            if let Panel::Dashboard(dashboard) = &mut state.panel {
                dashboard.consultation_mut().set_mode(mode);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::PatientNameChanged(name) => {
            if let Panel::Dashboard(dashboard) = &mut state.panel {
                dashboard.consultation_mut().set_patient_name(name);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ConsultationInputChanged(text) => {
            if let Panel::Dashboard(dashboard) = &mut state.panel {
                dashboard.consultation_mut().set_input(text);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::RecordingToggled => {
            let toggled = match &mut state.panel {
                Panel::Dashboard(dashboard) => {
                    dashboard.consultation_mut().toggle_recording();
                    true
                }
                Panel::Guest(guest) => {
                    guest.toggle_recording();
                    true
                }
                Panel::Empty | Panel::Auth(_) => false,
            };
            if toggled {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ConsultationSubmitted => submit_consultation(&mut state),
        Msg::NewConsultationClicked => {
            if let Panel::Dashboard(dashboard) = &mut state.panel {
                dashboard.consultation_mut().reset();
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::NoteGenerated { request_id, result } => {
            match &mut state.panel {
                Panel::Dashboard(dashboard)
                    if dashboard.consultation().is_waiting_for(request_id) =>
                {
                    dashboard.consultation_mut().complete_note(result);
                    state.mark_dirty();
                }
                _ => drop_stale("note", request_id),
            }
            Vec::new()
        }
        Msg::AnswerReceived { request_id, result } => {
            match &mut state.panel {
                Panel::Dashboard(dashboard)
                    if dashboard.consultation().is_waiting_for(request_id) =>
                {
                    dashboard.consultation_mut().complete_answer(result);
                    state.mark_dirty();
                }
                Panel::Guest(guest) if guest.is_waiting_for(request_id) => {
                    guest.complete(result);
                    state.mark_dirty();
                }
                _ => drop_stale("answer", request_id),
            }
            Vec::new()
        }
        Msg::HistorySearchChanged(term) => {
            if let Panel::Dashboard(dashboard) = &mut state.panel {
                dashboard.history_mut().set_search(term);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::HistoryRecordSelected(id) => {
            if let Panel::Dashboard(dashboard) = &mut state.panel {
                if dashboard.history_mut().select(&id) {
                    state.mark_dirty();
                }
            }
            Vec::new()
        }
        Msg::HistoryLoaded { request_id, result } => {
            match &mut state.panel {
                Panel::Dashboard(dashboard) if dashboard.history().is_waiting_for(request_id) => {
                    dashboard.history_mut().complete(result);
                    state.mark_dirty();
                }
                _ => drop_stale("history", request_id),
            }
            Vec::new()
        }
        Msg::SettingChanged(change) => {
            if let Panel::Dashboard(dashboard) = &mut state.panel {
                dashboard.settings_mut().apply(change);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SettingsSaved => save_settings(&mut state),
        Msg::PreferencesRestored(preferences) => {
            state.set_preferences(preferences);
            state.mark_dirty();
            Vec::new()
        }
        Msg::GuestQuestionChanged(question) => {
            if let Panel::Guest(guest) = &mut state.panel {
                guest.set_question(question);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::GuestQuestionSubmitted => {
            let language = state.preferences().language;
            let request = match &state.panel {
                Panel::Guest(guest) => guest.submission(language),
                _ => None,
            };
            match request {
                Some(request) => {
                    let request_id = state.next_request_id();
                    if let Panel::Guest(guest) = &mut state.panel {
                        guest.mark_pending(request_id);
                    }
                    state.mark_dirty();
                    vec![Effect::AskQuestion {
                        request_id,
                        request,
                    }]
                }
                None => Vec::new(),
            }
        }
        Msg::NewQuestionClicked => {
            if let Panel::Guest(guest) = &mut state.panel {
                guest.reset();
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn navigate(state: &mut AppState, trigger: Trigger) -> Vec<Effect> {
    // Rejections are logged by the navigator; the state stays as it was.
    let _ = state.fire(trigger);
    Vec::new()
}

fn drop_stale(kind: &str, request_id: RequestId) {
    genmed_warn!("Dropping stale {} result for request {}", kind, request_id);
}

fn submit_auth(state: &mut AppState) -> Vec<Effect> {
    let Panel::Auth(form) = &mut state.panel else {
        return Vec::new();
    };
    if let Some(pending) = form.pending() {
        genmed_warn!("Ignoring submit while request {} is pending", pending);
        return Vec::new();
    }
    let submission = form.submission();
    state.mark_dirty();
    let Some(request) = submission else {
        return Vec::new();
    };

    let request_id = state.next_request_id();
    if let Panel::Auth(form) = &mut state.panel {
        form.mark_pending(request_id);
    }
    vec![Effect::Authenticate {
        request_id,
        request,
    }]
}

fn submit_consultation(state: &mut AppState) -> Vec<Effect> {
    let language = state.preferences().language;
    let submission = match &state.panel {
        Panel::Dashboard(dashboard) => dashboard.consultation().submission(language),
        _ => None,
    };
    let Some(submission) = submission else {
        return Vec::new();
    };

    let request_id = state.next_request_id();
    if let Panel::Dashboard(dashboard) = &mut state.panel {
        dashboard.consultation_mut().mark_pending(request_id);
    }
    state.mark_dirty();
    let effect = match submission {
        ConsultationSubmission::Note(request) => Effect::GenerateNote {
            request_id,
            request,
            session: session_token(state),
        },
        ConsultationSubmission::Question(request) => Effect::AskQuestion {
            request_id,
            request,
        },
    };
    vec![effect]
}

fn select_tab(state: &mut AppState, tab: DashboardTab) -> Vec<Effect> {
    let Panel::Dashboard(dashboard) = &mut state.panel else {
        return Vec::new();
    };
    dashboard.set_tab(tab);
    let wants_history = tab == DashboardTab::History && dashboard.history().pending().is_none();
    state.mark_dirty();
    if !wants_history {
        return Vec::new();
    }

    let request_id = state.next_request_id();
    if let Panel::Dashboard(dashboard) = &mut state.panel {
        dashboard.history_mut().mark_pending(request_id);
    }
    vec![Effect::LoadHistory {
        request_id,
        session: session_token(state),
    }]
}

/// Requests authorize with the committed session only, never with a token
/// left over in storage.
fn session_token(state: &AppState) -> Option<SessionToken> {
    state
        .session()
        .identity()
        .and_then(|identity| identity.session_token.clone())
}

fn save_settings(state: &mut AppState) -> Vec<Effect> {
    let Panel::Dashboard(dashboard) = &mut state.panel else {
        return Vec::new();
    };
    dashboard.settings_mut().mark_saved();
    let settings = dashboard.settings().clone();

    if let Some(identity) = state.identity_mut() {
        identity.display_name = settings.display_name().trim().to_string();
        identity.email = settings.email().trim().to_string();
    }
    let preferences = settings.preferences().clone();
    state.set_preferences(preferences.clone());
    state.mark_dirty();
    vec![Effect::SavePreferences(preferences)]
}
