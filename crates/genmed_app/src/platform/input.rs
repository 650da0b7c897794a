//! Line commands typed at the console, mapped onto core messages.

use genmed_core::{
    AuthField, ConsultationMode, DashboardTab, Language, Msg, Role, Screen, SettingChange,
};

pub const HELP: &str = "\
Commands:
  start                          open role selection
  role <doctor|asha|chw|guest>   choose a role
  back                           go back one screen
  mode                           switch between sign in and register
  email|password|confirm|name|org <value>
                                 fill in the sign-in form
  submit                         send the form on the current screen
  logout                         sign out
  tab <consultation|history|settings>
  consult-mode <consultation|question>
  patient <name>                 patient name for the next note
  text <words>                   consultation text or guest question
  record                         toggle the recording indicator
  new                            start a new consultation or question
  search <term>                  filter patient history
  select <id>                    show one history record
  pref <name|email|language|notifications|voice|autosave> <value>
  save                           save settings
  help                           show this list
  quit                           exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Msg),
    Help,
    Quit,
}

/// Parses one input line. `Err` carries a message for the user.
pub fn parse_command(line: &str, screen: Screen) -> Result<Command, String> {
    let line = line.trim_end_matches(['\r', '\n']).trim_start();
    // Passwords keep every character after the single separating space.
    let (word, raw) = match line.split_once(char::is_whitespace) {
        Some((word, raw)) => (word.trim_end(), raw),
        None => (line.trim_end(), ""),
    };
    let rest = raw.trim();

    let msg = match word.to_ascii_lowercase().as_str() {
        "" => Msg::NoOp,
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" => return Ok(Command::Quit),
        "start" => Msg::GetStartedClicked,
        "role" => Msg::RoleSelected(rest.parse::<Role>().map_err(|err| err.to_string())?),
        "back" => Msg::BackClicked,
        "logout" => Msg::LogoutClicked,
        "mode" => Msg::AuthModeToggled,
        "email" => field(AuthField::Email, rest),
        "password" => field(AuthField::Password, raw),
        "confirm" => field(AuthField::ConfirmPassword, raw),
        "name" => field(AuthField::DisplayName, rest),
        "org" => field(AuthField::OrganizationName, rest),
        "submit" => submit_for(screen)?,
        "tab" => Msg::TabSelected(parse_tab(rest)?),
        "consult-mode" => Msg::ConsultationModeSelected(parse_consultation_mode(rest)?),
        "patient" => Msg::PatientNameChanged(rest.to_string()),
        "text" => match screen {
            Screen::GuestMode => Msg::GuestQuestionChanged(rest.to_string()),
            _ => Msg::ConsultationInputChanged(rest.to_string()),
        },
        "record" => Msg::RecordingToggled,
        "new" => match screen {
            Screen::GuestMode => Msg::NewQuestionClicked,
            _ => Msg::NewConsultationClicked,
        },
        "search" => Msg::HistorySearchChanged(rest.to_string()),
        "select" => Msg::HistoryRecordSelected(required(rest, "select <id>")?.to_string()),
        "pref" => Msg::SettingChanged(parse_setting(rest)?),
        "save" => Msg::SettingsSaved,
        other => return Err(format!("Unknown command {other:?}; type `help`")),
    };
    Ok(Command::Dispatch(msg))
}

fn field(field: AuthField, value: &str) -> Msg {
    Msg::AuthFieldChanged {
        field,
        value: value.to_string(),
    }
}

fn submit_for(screen: Screen) -> Result<Msg, String> {
    match screen {
        Screen::Authenticating(_) => Ok(Msg::AuthSubmitted),
        Screen::Dashboard => Ok(Msg::ConsultationSubmitted),
        Screen::GuestMode => Ok(Msg::GuestQuestionSubmitted),
        Screen::Landing | Screen::RoleSelection => {
            Err(format!("Nothing to submit on the {screen} screen"))
        }
    }
}

fn required<'a>(value: &'a str, usage: &str) -> Result<&'a str, String> {
    if value.is_empty() {
        Err(format!("Usage: {usage}"))
    } else {
        Ok(value)
    }
}

fn parse_tab(raw: &str) -> Result<DashboardTab, String> {
    match raw.to_ascii_lowercase().as_str() {
        "consultation" | "consult" => Ok(DashboardTab::Consultation),
        "history" => Ok(DashboardTab::History),
        "settings" => Ok(DashboardTab::Settings),
        _ => Err("Usage: tab <consultation|history|settings>".to_string()),
    }
}

fn parse_consultation_mode(raw: &str) -> Result<ConsultationMode, String> {
    match raw.to_ascii_lowercase().as_str() {
        "consultation" | "note" => Ok(ConsultationMode::Consultation),
        "question" | "ask" => Ok(ConsultationMode::Question),
        _ => Err("Usage: consult-mode <consultation|question>".to_string()),
    }
}

fn parse_setting(rest: &str) -> Result<SettingChange, String> {
    let (name, value) = rest
        .split_once(char::is_whitespace)
        .map(|(name, value)| (name, value.trim()))
        .unwrap_or((rest, ""));
    match name.to_ascii_lowercase().as_str() {
        "name" => Ok(SettingChange::DisplayName(value.to_string())),
        "email" => Ok(SettingChange::Email(value.to_string())),
        "language" => value
            .parse::<Language>()
            .map(SettingChange::Language)
            .map_err(|err| err.to_string()),
        "notifications" => parse_switch(value).map(SettingChange::Notifications),
        "voice" => parse_switch(value).map(SettingChange::VoiceEnabled),
        "autosave" => parse_switch(value).map(SettingChange::AutoSave),
        _ => Err("Usage: pref <name|email|language|notifications|voice|autosave> <value>".to_string()),
    }
}

fn parse_switch(raw: &str) -> Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(format!("Expected on or off, got {raw:?}")),
    }
}
