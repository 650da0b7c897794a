//! Screen/session state machine.
//!
//! Every screen change goes through [`Navigator::fire`]. A trigger that is not
//! listed for the current screen is rejected and leaves the navigator
//! untouched.

use std::fmt;

use genmed_logging::{genmed_debug, genmed_warn};
use thiserror::Error;

use crate::{Identity, Role, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Landing,
    RoleSelection,
    Authenticating(Role),
    Dashboard,
    GuestMode,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Screen::Landing => f.write_str("landing"),
            Screen::RoleSelection => f.write_str("role selection"),
            Screen::Authenticating(role) => write!(f, "authentication ({role})"),
            Screen::Dashboard => f.write_str("dashboard"),
            Screen::GuestMode => f.write_str("guest"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    GetStarted,
    SelectRole(Role),
    Back,
    AuthSucceeded(Identity),
    Logout,
}

impl Trigger {
    pub fn name(&self) -> &'static str {
        match self {
            Trigger::GetStarted => "get started",
            Trigger::SelectRole(_) => "select role",
            Trigger::Back => "back",
            Trigger::AuthSucceeded(_) => "auth succeeded",
            Trigger::Logout => "logout",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("'{trigger}' is not available on the {from} screen")]
    NotAllowed { from: Screen, trigger: &'static str },
    /// A completed handshake arrived while no authentication was in progress.
    #[error("authentication completed while on the {from} screen")]
    NotAuthenticating { from: Screen },
    #[error("authenticated as {actual} while signing in as {expected}")]
    RoleMismatch { expected: Role, actual: Role },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Navigator {
    screen: Screen,
    selected_role: Option<Role>,
    session: Session,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn selected_role(&self) -> Option<Role> {
        self.selected_role
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Applies `trigger` and returns the screen now active.
    pub fn fire(&mut self, trigger: Trigger) -> Result<Screen, TransitionError> {
        let from = self.screen;
        let name = trigger.name();

        let next = match (from, trigger) {
            (Screen::Landing, Trigger::GetStarted) => Screen::RoleSelection,
            (Screen::RoleSelection, Trigger::SelectRole(Role::Guest)) => {
                self.selected_role = Some(Role::Guest);
                self.session.establish(Identity::guest());
                Screen::GuestMode
            }
            (Screen::RoleSelection, Trigger::SelectRole(role)) => {
                self.selected_role = Some(role);
                Screen::Authenticating(role)
            }
            (Screen::RoleSelection, Trigger::Back) => {
                self.selected_role = None;
                Screen::Landing
            }
            (Screen::Authenticating(_), Trigger::Back) => {
                self.selected_role = None;
                Screen::RoleSelection
            }
            (Screen::Authenticating(expected), Trigger::AuthSucceeded(identity)) => {
                if identity.role != expected {
                    genmed_warn!(
                        "Rejected sign-in result for {} while authenticating as {}",
                        identity.role,
                        expected
                    );
                    return Err(TransitionError::RoleMismatch {
                        expected,
                        actual: identity.role,
                    });
                }
                self.session.establish(identity);
                Screen::Dashboard
            }
            (Screen::Dashboard, Trigger::Logout) => {
                self.session.clear();
                self.selected_role = None;
                Screen::Landing
            }
            (Screen::GuestMode, Trigger::Back) => {
                self.session.clear();
                self.selected_role = None;
                Screen::RoleSelection
            }
            (from, Trigger::AuthSucceeded(_)) => {
                genmed_warn!("Ignoring sign-in result on the {} screen", from);
                return Err(TransitionError::NotAuthenticating { from });
            }
            (from, _) => {
                genmed_warn!("Ignoring '{}' on the {} screen", name, from);
                return Err(TransitionError::NotAllowed {
                    from,
                    trigger: name,
                });
            }
        };

        genmed_debug!("Navigation: {} -> {} ({})", from, next, name);
        self.screen = next;
        Ok(next)
    }
}
