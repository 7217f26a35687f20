//! Authentication screen state
//!
//! Three user-selectable modes share one form. The visible fields are a pure
//! function of the mode. Submission checks required fields, then calls the
//! matching endpoint and turns the reply into an [`AuthOutcome`].

use tracing::info;

use crate::api::ApiClient;
use crate::models::{LoginRequest, Session, SignupRequest};

pub const GENERIC_ERROR: &str = "Something went wrong";
pub const SOCIAL_ERROR: &str = "Google Login failed";
pub const SIGNUP_SUCCESS: &str = "Signup successful! Please login.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
    Forgot,
}

impl AuthMode {
    pub fn visible_fields(&self) -> &'static [Field] {
        match self {
            AuthMode::Login => &[Field::Username, Field::Password],
            AuthMode::Signup => &[Field::Username, Field::Email, Field::Mobile, Field::Password],
            AuthMode::Forgot => &[Field::Email],
        }
    }

    pub fn heading(&self) -> &'static str {
        match self {
            AuthMode::Login => "Sign In",
            AuthMode::Signup => "Sign Up",
            AuthMode::Forgot => "Reset Password",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self {
            AuthMode::Login => "Sign In",
            AuthMode::Signup => "Sign Up",
            AuthMode::Forgot => "Send Reset Link",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Username,
    Email,
    Mobile,
    Password,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::Username => "Username",
            Field::Email => "Email",
            Field::Mobile => "Mobile Number",
            Field::Password => "Password",
        }
    }

    /// Everything but the mobile number must be filled in
    pub fn is_required(&self) -> bool {
        !matches!(self, Field::Mobile)
    }

    pub fn is_secret(&self) -> bool {
        matches!(self, Field::Password)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthForm {
    pub username: String,
    pub email: String,
    pub mobile: String,
    pub password: String,
}

impl AuthForm {
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Username => &self.username,
            Field::Email => &self.email,
            Field::Mobile => &self.mobile,
            Field::Password => &self.password,
        }
    }

    pub fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Username => &mut self.username,
            Field::Email => &mut self.email,
            Field::Mobile => &mut self.mobile,
            Field::Password => &mut self.password,
        }
    }

    /// First visible required field that is still empty
    pub fn missing_required(&self, mode: AuthMode) -> Option<Field> {
        mode.visible_fields()
            .iter()
            .copied()
            .find(|f| f.is_required() && self.value(*f).is_empty())
    }
}

/// Result of a successful submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    LoggedIn(Session),
    SignedUp,
    ResetInitiated { message: String },
}

/// Validate and dispatch the form for the given mode
pub async fn submit(api: &ApiClient, mode: AuthMode, form: &AuthForm) -> Result<AuthOutcome, String> {
    if let Some(field) = form.missing_required(mode) {
        return Err(format!("{} is required", field.label()));
    }

    match mode {
        AuthMode::Login => {
            let req = LoginRequest {
                username: form.username.clone(),
                password: form.password.clone(),
            };
            let session = api
                .login(&req)
                .await
                .map_err(|e| e.user_message(GENERIC_ERROR))?;
            info!(user = %session.profile.username, "logged in");
            Ok(AuthOutcome::LoggedIn(session))
        }
        AuthMode::Signup => {
            let req = SignupRequest {
                username: form.username.clone(),
                email: form.email.clone(),
                mobile: form.mobile.clone(),
                password: form.password.clone(),
            };
            api.signup(&req)
                .await
                .map_err(|e| e.user_message(GENERIC_ERROR))?;
            info!(user = %form.username, "signed up");
            Ok(AuthOutcome::SignedUp)
        }
        AuthMode::Forgot => {
            let resp = api
                .forgot_password(&form.email)
                .await
                .map_err(|e| e.user_message(GENERIC_ERROR))?;
            if let Some(token) = &resp.debug_token {
                info!(reset_token = %token, "password reset token issued");
            }
            Ok(AuthOutcome::ResetInitiated {
                message: resp.message,
            })
        }
    }
}

/// Exchange a provider ID token for a session
pub async fn social_login(api: &ApiClient, credential: &str) -> Result<AuthOutcome, String> {
    let session = api
        .google_login(credential)
        .await
        .map_err(|e| e.user_message(SOCIAL_ERROR))?;
    info!(user = %session.profile.username, "logged in with social provider");
    Ok(AuthOutcome::LoggedIn(session))
}

/// Everything the auth screen shows
#[derive(Debug, Clone, Default)]
pub struct AuthScreen {
    pub mode: AuthMode,
    pub form: AuthForm,
    /// Index into the mode's visible fields
    pub focus: usize,
    pub error: Option<String>,
    pub message: Option<String>,
    /// A submission is in flight
    pub loading: bool,
    /// Provider token being typed, when the social login prompt is open
    pub social_input: Option<String>,
}

impl AuthScreen {
    /// Switch mode; clears both banners
    pub fn set_mode(&mut self, mode: AuthMode) {
        self.mode = mode;
        self.focus = 0;
        self.error = None;
        self.message = None;
        self.social_input = None;
    }

    pub fn focused_field(&self) -> Field {
        let fields = self.mode.visible_fields();
        fields[self.focus.min(fields.len() - 1)]
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % self.mode.visible_fields().len();
    }

    pub fn prev_field(&mut self) {
        let len = self.mode.visible_fields().len();
        self.focus = (self.focus + len - 1) % len;
    }

    pub fn insert(&mut self, c: char) {
        match &mut self.social_input {
            Some(buf) => buf.push(c),
            None => {
                let field = self.focused_field();
                self.form.value_mut(field).push(c);
            }
        }
    }

    pub fn backspace(&mut self) {
        match &mut self.social_input {
            Some(buf) => {
                buf.pop();
            }
            None => {
                let field = self.focused_field();
                self.form.value_mut(field).pop();
            }
        }
    }

    /// Open the provider token prompt (login mode only)
    pub fn open_social(&mut self) -> bool {
        if self.mode != AuthMode::Login || self.loading {
            return false;
        }
        self.social_input = Some(String::new());
        true
    }

    /// Mark a submission as started. `None` while one is already running.
    pub fn begin_submit(&mut self) -> Option<(AuthMode, AuthForm)> {
        if self.loading {
            return None;
        }
        self.loading = true;
        self.error = None;
        self.message = None;
        Some((self.mode, self.form.clone()))
    }

    /// Same as [`begin_submit`](Self::begin_submit) for the social prompt
    pub fn begin_social(&mut self) -> Option<String> {
        if self.loading {
            return None;
        }
        let credential = self.social_input.take()?;
        self.loading = true;
        self.error = None;
        self.message = None;
        Some(credential)
    }

    /// Apply a finished submission. Returns the session to store on login.
    pub fn finish(&mut self, outcome: Result<AuthOutcome, String>) -> Option<Session> {
        self.loading = false;
        match outcome {
            Ok(AuthOutcome::LoggedIn(session)) => {
                self.form = AuthForm::default();
                Some(session)
            }
            Ok(AuthOutcome::SignedUp) => {
                self.set_mode(AuthMode::Login);
                self.message = Some(SIGNUP_SUCCESS.to_string());
                None
            }
            Ok(AuthOutcome::ResetInitiated { message }) => {
                self.message = Some(message);
                None
            }
            Err(error) => {
                self.error = Some(error);
                None
            }
        }
    }
}
