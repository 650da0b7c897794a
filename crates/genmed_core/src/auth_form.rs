use crate::{
    validate_registration, AuthError, AuthField, AuthMode, AuthRequest, Credentials, RequestId,
    Role,
};

/// Local state of the sign-in / registration form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthForm {
    role: Role,
    mode: AuthMode,
    credentials: Credentials,
    pending: Option<RequestId>,
    error: Option<String>,
}

impl AuthForm {
    pub(crate) fn new(role: Role) -> Self {
        Self {
            role,
            mode: AuthMode::Login,
            credentials: Credentials::default(),
            pending: None,
            error: None,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn pending(&self) -> Option<RequestId> {
        self.pending
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Switching between login and registration is locked while a request is out.
    pub(crate) fn toggle_mode(&mut self) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.mode = self.mode.toggled();
        self.error = None;
        true
    }

    pub(crate) fn edit(&mut self, field: AuthField, value: String) {
        self.credentials.set(field, value);
    }

    /// Builds the request for a submit click. Returns `None` when a request is
    /// already pending or when registration input fails validation; in the
    /// latter case the form error is set and the form stays idle.
    pub(crate) fn submission(&mut self) -> Option<AuthRequest> {
        if self.pending.is_some() {
            return None;
        }
        self.error = None;
        if self.mode == AuthMode::Register {
            if let Err(err) = validate_registration(&self.credentials) {
                self.error = Some(AuthError::from(err).to_string());
                return None;
            }
        }
        Some(AuthRequest {
            mode: self.mode,
            role: self.role,
            credentials: self.credentials.clone(),
        })
    }

    pub(crate) fn mark_pending(&mut self, request_id: RequestId) {
        self.pending = Some(request_id);
    }

    /// Clears the pending marker if `request_id` is the outstanding request.
    pub(crate) fn settle(&mut self, request_id: RequestId) -> bool {
        if self.pending == Some(request_id) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Keeps the entered credentials so the user can correct them.
    pub(crate) fn fail(&mut self, message: String) {
        self.error = Some(message);
    }
}
