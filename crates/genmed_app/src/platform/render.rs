//! Plain-text rendering of the view model.

use std::fmt::Write;

use genmed_core::{
    AppViewModel, AuthFormView, AuthMode, ClinicalNote, ConsultationMode, ConsultationView,
    DashboardTab, DashboardView, GuestView, HistoryView, IdentityView, Role, Screen, SettingsView,
};

const RULE: &str = "----------------------------------------";

pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{RULE}");
    match view.screen {
        Screen::Landing => render_landing(&mut out),
        Screen::RoleSelection => render_role_selection(&mut out),
        Screen::Authenticating(_) => {
            if let Some(form) = &view.auth {
                render_auth(&mut out, form);
            }
        }
        Screen::Dashboard => {
            if let Some(identity) = &view.identity {
                render_identity(&mut out, identity);
            }
            if let Some(dashboard) = &view.dashboard {
                render_dashboard(&mut out, dashboard);
            }
        }
        Screen::GuestMode => {
            if let Some(guest) = &view.guest {
                render_guest(&mut out, guest);
            }
        }
    }
    out
}

fn render_landing(out: &mut String) {
    let _ = writeln!(out, "GenMed: AI-assisted clinical notes");
    let _ = writeln!(out, "Type `start` to begin, `help` for all commands.");
}

fn render_role_selection(out: &mut String) {
    let _ = writeln!(out, "Who is using GenMed?");
    for role in Role::ALL {
        let tag = match role {
            Role::Doctor => "doctor",
            Role::CommunityHealthWorker => "asha",
            Role::Guest => "guest",
        };
        let _ = writeln!(out, "  role {tag:<7} {}", role.label());
    }
    let _ = writeln!(out, "`back` returns to the start page.");
}

fn render_auth(out: &mut String, form: &AuthFormView) {
    let action = match form.mode {
        AuthMode::Login => "Sign in",
        AuthMode::Register => "Create account",
    };
    let _ = writeln!(out, "{action} as {}", form.role);
    let _ = writeln!(out, "  email: {}", form.email);
    if form.mode == AuthMode::Register {
        let _ = writeln!(out, "  name:  {}", form.display_name);
        let _ = writeln!(out, "  org:   {}", form.organization_name);
    }
    if form.pending {
        let _ = writeln!(out, "  ... please wait");
    }
    if let Some(error) = &form.error {
        let _ = writeln!(out, "  ! {error}");
    }
    let other = match form.mode {
        AuthMode::Login => "register",
        AuthMode::Register => "sign in",
    };
    let _ = writeln!(out, "`submit` to continue, `mode` to {other}, `back` to change role.");
}

fn render_identity(out: &mut String, identity: &IdentityView) {
    let _ = write!(out, "{} ({})", identity.display_name, identity.role);
    if !identity.email.is_empty() {
        let _ = write!(out, " <{}>", identity.email);
    }
    if !identity.has_session_token {
        let _ = write!(out, " [not signed in]");
    }
    let _ = writeln!(out);
}

fn render_dashboard(out: &mut String, dashboard: &DashboardView) {
    let tabs = [
        (DashboardTab::Consultation, "consultation"),
        (DashboardTab::History, "history"),
        (DashboardTab::Settings, "settings"),
    ]
    .map(|(tab, name)| {
        if tab == dashboard.tab {
            format!("[{name}]")
        } else {
            name.to_string()
        }
    })
    .join(" | ");
    let _ = writeln!(out, "{tabs}");

    match dashboard.tab {
        DashboardTab::Consultation => render_consultation(out, &dashboard.consultation),
        DashboardTab::History => render_history(out, &dashboard.history),
        DashboardTab::Settings => render_settings(out, &dashboard.settings),
    }
}

fn render_consultation(out: &mut String, view: &ConsultationView) {
    match view.mode {
        ConsultationMode::Consultation => {
            let _ = writeln!(out, "New consultation");
            let _ = writeln!(out, "  patient: {}", view.patient_name);
        }
        ConsultationMode::Question => {
            let _ = writeln!(out, "Ask a medical question");
        }
    }
    let _ = writeln!(out, "  text:    {}", view.input);
    if view.recording {
        let _ = writeln!(out, "  (recording)");
    }
    if view.pending {
        let _ = writeln!(out, "  ... working");
    }
    if let Some(error) = &view.error {
        let _ = writeln!(out, "  ! {error}");
    }
    if let Some(note) = &view.note {
        let critical = if note.is_critical { "  ** CRITICAL **" } else { "" };
        let _ = writeln!(out, "Note for {}{critical}", note.patient_name);
        render_note(out, &note.note);
    }
    if let Some(answer) = &view.answer {
        let _ = writeln!(out, "Answer: {answer}");
    }
}

fn render_note(out: &mut String, note: &ClinicalNote) {
    if let Some(error) = &note.error {
        let _ = writeln!(out, "  ! {error}");
    }
    let mut line = |label: &str, value: Option<&str>| {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            let _ = writeln!(out, "  {label:<16} {value}");
        }
    };
    line("Chief complaint:", note.chief_complaint.as_deref());
    line("History:", note.history.as_deref());
    if !note.symptoms.is_empty() {
        line("Symptoms:", Some(note.symptoms.join(", ").as_str()));
    }
    if let Some(obs) = &note.observations {
        line("Temperature:", obs.temperature.as_deref());
        line("Heart rate:", obs.heart_rate.as_deref());
        line("Blood pressure:", obs.blood_pressure.as_deref());
        line("Condition:", obs.general_condition.as_deref());
    }
    line("Assessment:", note.assessment.as_deref());
    if let Some(plan) = &note.plan {
        line("Medications:", plan.medications.as_deref());
        line("First aid:", plan.first_aid.as_deref());
        line("Referral:", plan.referral.as_deref());
        line("Follow-up:", plan.follow_up.as_deref());
    }
}

fn render_history(out: &mut String, view: &HistoryView) {
    if !view.search.is_empty() {
        let _ = writeln!(out, "search: {}", view.search);
    }
    if view.loading {
        let _ = writeln!(out, "  ... loading history");
    }
    if let Some(error) = &view.error {
        let _ = writeln!(out, "  ! {error}");
    }
    if view.rows.is_empty() && !view.loading && view.error.is_none() {
        let _ = writeln!(out, "  no records");
    }
    for record in &view.rows {
        let flag = if record.is_critical { "!" } else { " " };
        let _ = writeln!(
            out,
            " {flag} {:<10} {:<10} {:<20} {}",
            record.id, record.date, record.patient_name, record.chief_complaint
        );
    }
    if let Some(record) = &view.selected {
        let _ = writeln!(out, "Selected: {} ({})", record.patient_name, record.date);
        let _ = writeln!(out, "  Chief complaint: {}", record.chief_complaint);
        let _ = writeln!(out, "  Diagnosis:       {}", record.diagnosis);
    }
}

fn render_settings(out: &mut String, view: &SettingsView) {
    let on_off = |flag: bool| if flag { "on" } else { "off" };
    let _ = writeln!(out, "  name:          {}", view.display_name);
    let _ = writeln!(out, "  email:         {}", view.email);
    let _ = writeln!(
        out,
        "  language:      {} ({})",
        view.preferences.language,
        view.preferences.language.code()
    );
    let _ = writeln!(out, "  notifications: {}", on_off(view.preferences.notifications));
    let _ = writeln!(out, "  voice:         {}", on_off(view.preferences.voice_enabled));
    let _ = writeln!(out, "  autosave:      {}", on_off(view.preferences.auto_save));
    if view.saved {
        let _ = writeln!(out, "  saved");
    }
}

fn render_guest(out: &mut String, view: &GuestView) {
    let _ = writeln!(out, "Guest: ask a health question");
    let _ = writeln!(out, "  question: {}", view.question);
    if view.recording {
        let _ = writeln!(out, "  (recording)");
    }
    if view.pending {
        let _ = writeln!(out, "  ... working");
    }
    if let Some(error) = &view.error {
        let _ = writeln!(out, "  ! {error}");
    }
    if let Some(answer) = &view.answer {
        let _ = writeln!(out, "Answer: {answer}");
        let _ = writeln!(out, "`new` to ask another question.");
    }
}

#[cfg(test)]
mod tests {
    use genmed_core::{update, AppState, AuthField, Msg};

    use super::*;

    fn state_after(msgs: Vec<Msg>) -> AppState {
        msgs.into_iter()
            .fold(AppState::new(), |state, msg| update(state, msg).0)
    }

    #[test]
    fn landing_prompts_to_start() {
        let text = render(&AppState::new().view());
        assert!(text.contains("start"));
    }

    #[test]
    fn auth_form_never_shows_password() {
        let state = state_after(vec![
            Msg::GetStartedClicked,
            Msg::RoleSelected(Role::Doctor),
            Msg::AuthFieldChanged {
                field: AuthField::Email,
                value: "rao@example.com".to_string(),
            },
            Msg::AuthFieldChanged {
                field: AuthField::Password,
                value: "hunter2-secret".to_string(),
            },
        ]);
        let text = render(&state.view());
        assert!(text.contains("Sign in as Doctor"));
        assert!(text.contains("rao@example.com"));
        assert!(!text.contains("hunter2-secret"));
    }

    #[test]
    fn validation_error_is_rendered() {
        let state = state_after(vec![
            Msg::GetStartedClicked,
            Msg::RoleSelected(Role::CommunityHealthWorker),
            Msg::AuthModeToggled,
            Msg::AuthSubmitted,
        ]);
        let text = render(&state.view());
        assert!(text.contains("Create account as ASHA Worker"));
        assert!(text.contains("! Full name is required"));
    }

    #[test]
    fn guest_screen_shows_question() {
        let state = state_after(vec![
            Msg::GetStartedClicked,
            Msg::RoleSelected(Role::Guest),
            Msg::GuestQuestionChanged("What is ORS?".to_string()),
        ]);
        let text = render(&state.view());
        assert!(text.contains("question: What is ORS?"));
    }
}
