use genmed_core::{
    validate_registration, AuthError, AuthMode, AuthRequest, AuthResult, AuthSuccess,
    Credentials, Role, SessionToken,
};
use genmed_logging::{genmed_info, genmed_warn};
use reqwest::StatusCode;
use url::Url;

use crate::settings::{ClientSettings, ConfigError};
use crate::wire::{describe_transport_error, error_message, LoginBody, RegisterBody, TokenBody};

pub const LOGIN_PATH: &str = "users/login";
pub const REGISTER_PATH: &str = "users/register";

pub const DEFAULT_LOGIN_FAILURE: &str = "Invalid email or password";
pub const DEFAULT_REGISTER_FAILURE: &str = "User already exists";
pub const DEFAULT_TRANSPORT_FAILURE: &str = "Failed to process request";

/// Performs one login or registration handshake. Every call resolves exactly
/// once with an [`AuthResult`]; errors never escape as panics. Nothing is
/// persisted here: the token is stored only once the session is committed.
#[async_trait::async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, request: AuthRequest) -> AuthResult;
}

pub struct HttpAuthClient {
    client: reqwest::Client,
    login_url: Url,
    register_url: Url,
}

impl HttpAuthClient {
    pub fn new(settings: &ClientSettings) -> Result<Self, ConfigError> {
        Ok(Self {
            client: settings.build_client()?,
            login_url: settings.endpoint(LOGIN_PATH)?,
            register_url: settings.endpoint(REGISTER_PATH)?,
        })
    }

    async fn login(&self, role: Role, credentials: Credentials) -> AuthResult {
        let body = LoginBody {
            email: &credentials.email,
            password: &credentials.password,
        };
        let (status, text) = self.post(self.login_url.clone(), &body).await?;
        if !status.is_success() {
            return Err(rejection(AuthMode::Login, status, &text));
        }

        let token: TokenBody = serde_json::from_str(&text).map_err(|err| {
            genmed_warn!("Unreadable login response: {}", err);
            AuthError::Transport(DEFAULT_TRANSPORT_FAILURE.to_string())
        })?;
        let (Some(access_token), Some(token_type)) = (token.access_token, token.token_type) else {
            genmed_warn!("Login response is missing access_token or token_type");
            return Err(AuthError::Transport(DEFAULT_TRANSPORT_FAILURE.to_string()));
        };

        genmed_info!("Login accepted for role {}", role);
        Ok(AuthSuccess {
            role,
            display_name: credentials.display_name_or_default(),
            email: credentials.email,
            session_token: Some(SessionToken {
                access_token,
                token_type,
            }),
        })
    }

    async fn register(&self, role: Role, credentials: Credentials) -> AuthResult {
        validate_registration(&credentials)?;

        let body = RegisterBody {
            email: &credentials.email,
            password: &credentials.password,
            role: role.api_tag(),
        };
        let (status, text) = self.post(self.register_url.clone(), &body).await?;
        if !status.is_success() {
            return Err(rejection(AuthMode::Register, status, &text));
        }

        genmed_info!("Registration accepted for role {}", role);
        Ok(AuthSuccess {
            role,
            display_name: credentials.display_name_or_default(),
            email: credentials.email,
            session_token: None,
        })
    }

    async fn post<B: serde::Serialize>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<(StatusCode, String), AuthError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(transport_failure)?;
        let status = response.status();
        let text = response.text().await.map_err(transport_failure)?;
        Ok((status, text))
    }
}

#[async_trait::async_trait]
impl Authenticator for HttpAuthClient {
    async fn authenticate(&self, request: AuthRequest) -> AuthResult {
        let AuthRequest {
            mode,
            role,
            credentials,
        } = request;
        let result = match mode {
            AuthMode::Login => self.login(role, credentials).await,
            AuthMode::Register => self.register(role, credentials).await,
        };
        if let Err(err) = &result {
            genmed_warn!("{:?} for role {} failed: {}", mode, role, err);
        }
        result
    }
}

fn rejection(mode: AuthMode, status: StatusCode, body: &str) -> AuthError {
    let message = error_message(body).unwrap_or_else(|| {
        if mode == AuthMode::Login && status == StatusCode::BAD_REQUEST {
            DEFAULT_LOGIN_FAILURE.to_string()
        } else {
            DEFAULT_REGISTER_FAILURE.to_string()
        }
    });
    AuthError::Rejected(message)
}

fn transport_failure(err: reqwest::Error) -> AuthError {
    AuthError::Transport(describe_transport_error(&err, DEFAULT_TRANSPORT_FAILURE))
}
