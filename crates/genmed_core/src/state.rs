use crate::view_model::AppViewModel;
use crate::{
    AuthForm, Dashboard, GuestPanel, Identity, Navigator, Preferences, Screen, Session,
    TransitionError, Trigger,
};

pub type RequestId = u64;

/// Local state owned by the active screen. Rebuilt on every screen change,
/// so nothing leaks from an abandoned screen into the next one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) enum Panel {
    #[default]
    Empty,
    Auth(AuthForm),
    Dashboard(Box<Dashboard>),
    Guest(GuestPanel),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    navigator: Navigator,
    pub(crate) panel: Panel,
    preferences: Preferences,
    last_request_id: RequestId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> Screen {
        self.navigator.screen()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn session(&self) -> &Session {
        self.navigator.session()
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn auth_form(&self) -> Option<&AuthForm> {
        match &self.panel {
            Panel::Auth(form) => Some(form),
            _ => None,
        }
    }

    pub fn dashboard(&self) -> Option<&Dashboard> {
        match &self.panel {
            Panel::Dashboard(dashboard) => Some(dashboard.as_ref()),
            _ => None,
        }
    }

    pub fn guest(&self) -> Option<&GuestPanel> {
        match &self.panel {
            Panel::Guest(guest) => Some(guest),
            _ => None,
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel::build(self, self.dirty)
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn next_request_id(&mut self) -> RequestId {
        self.last_request_id += 1;
        self.last_request_id
    }

    pub(crate) fn set_preferences(&mut self, preferences: Preferences) {
        self.preferences = preferences;
    }

    pub(crate) fn identity_mut(&mut self) -> Option<&mut Identity> {
        self.navigator.session_mut().identity_mut()
    }

    /// Fires a navigator trigger and rebuilds the panel for the new screen.
    pub(crate) fn fire(&mut self, trigger: Trigger) -> Result<Screen, TransitionError> {
        let screen = self.navigator.fire(trigger)?;
        self.panel = match screen {
            Screen::Landing | Screen::RoleSelection => Panel::Empty,
            Screen::Authenticating(role) => Panel::Auth(AuthForm::new(role)),
            Screen::Dashboard => Panel::Dashboard(Box::new(Dashboard::new(
                self.navigator.session().identity(),
                &self.preferences,
            ))),
            Screen::GuestMode => Panel::Guest(GuestPanel::default()),
        };
        self.mark_dirty();
        Ok(screen)
    }
}
