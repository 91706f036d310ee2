//! Form state and client-side validation.
//!
//! Validation failures are caught before any request is sent and
//! surfaced as local, localized messages; the forms never talk to the
//! network themselves (the TUI event loop submits the validated
//! values).

use parada_common::password::validate_password;

use crate::client::RegisterRequest;

/// Fixed list of reasons offered by the stoppage form.
pub const STOP_REASONS: [&str; 4] = [
    "Setup",
    "Falta de Material",
    "Manutenção",
    "Almoço/Intervalo",
];

/// Which screen the auth form shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

/// Login / registration form.
#[derive(Debug, Clone)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub email: String,
    pub confirm_password: String,
    pub error: Option<String>,
    pub submitting: bool,
}

impl Default for AuthForm {
    fn default() -> Self {
        Self {
            mode: AuthMode::Login,
            username: String::new(),
            password: String::new(),
            full_name: String::new(),
            email: String::new(),
            confirm_password: String::new(),
            error: None,
            submitting: false,
        }
    }
}

impl AuthForm {
    /// Switch between login and registration, clearing any error.
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
        self.error = None;
    }

    /// After a successful registration the form returns to the login
    /// screen with secrets cleared.
    pub fn registration_succeeded(&mut self) {
        self.mode = AuthMode::Login;
        self.password.clear();
        self.confirm_password.clear();
        self.email.clear();
        self.error = None;
    }

    /// Validate the login fields.
    pub fn validate_login(&self) -> Result<(), String> {
        if self.username.trim().is_empty() {
            return Err("Informe um usuário de acesso".to_string());
        }
        if self.password.is_empty() {
            return Err("Informe a senha".to_string());
        }
        Ok(())
    }

    /// Validate the registration fields and build the request body.
    pub fn validate_registration(&self) -> Result<RegisterRequest, String> {
        if self.full_name.trim().is_empty() {
            return Err("Informe o nome completo".to_string());
        }
        if self.username.trim().is_empty() {
            return Err("Informe um usuário de acesso".to_string());
        }
        if self.email.trim().is_empty() {
            return Err("Informe um e-mail".to_string());
        }
        if !validate_password(&self.password) {
            return Err(
                "A senha deve conter pelo menos 8 caracteres, incluindo maiúsculas, \
                 minúsculas, números e símbolos"
                    .to_string(),
            );
        }
        if self.password != self.confirm_password {
            return Err("As senhas não coincidem".to_string());
        }
        Ok(RegisterRequest {
            username: self.username.clone(),
            password: self.password.clone(),
            email: self.email.clone(),
            nome: self.full_name.clone(),
        })
    }
}

/// Manual stoppage registration form.
#[derive(Debug, Clone, PartialEq)]
pub struct StopForm {
    /// Index into [`STOP_REASONS`].
    pub reason_idx: usize,
    /// Raw duration input, minutes, fractional allowed.
    pub duration: String,
    pub error: Option<String>,
    pub submitting: bool,
}

impl Default for StopForm {
    fn default() -> Self {
        Self {
            reason_idx: 0,
            duration: String::new(),
            error: None,
            submitting: false,
        }
    }
}

impl StopForm {
    pub fn reason(&self) -> &'static str {
        STOP_REASONS[self.reason_idx % STOP_REASONS.len()]
    }

    pub fn next_reason(&mut self) {
        self.reason_idx = (self.reason_idx + 1) % STOP_REASONS.len();
    }

    pub fn prev_reason(&mut self) {
        self.reason_idx = (self.reason_idx + STOP_REASONS.len() - 1) % STOP_REASONS.len();
    }

    /// Validate and parse the duration input.
    pub fn validate(&self) -> Result<(&'static str, f64), String> {
        if self.duration.trim().is_empty() {
            return Err("Por favor, informe a duração da parada.".to_string());
        }
        let minutes: f64 = self
            .duration
            .trim()
            .replace(',', ".")
            .parse()
            .map_err(|_| "Duração inválida. Ex: 30.5".to_string())?;
        if minutes < 0.0 {
            return Err("Duração inválida. Ex: 30.5".to_string());
        }
        Ok((self.reason(), minutes))
    }
}

/// Password-recovery steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryStep {
    Email,
    Code,
    NewPassword,
}

/// Three-step password recovery modal.
#[derive(Debug, Clone, PartialEq)]
pub struct RecoveryForm {
    pub step: RecoveryStep,
    pub email: String,
    pub code: String,
    pub new_password: String,
    pub confirm_password: String,
    /// Whether focus is on the confirmation field in the last step.
    pub confirm_focus: bool,
    /// Set after a successful reset; the next confirm closes the
    /// modal.
    pub done: bool,
    pub error: Option<String>,
    pub message: Option<String>,
    pub submitting: bool,
}

impl Default for RecoveryForm {
    fn default() -> Self {
        Self {
            step: RecoveryStep::Email,
            email: String::new(),
            code: String::new(),
            new_password: String::new(),
            confirm_password: String::new(),
            confirm_focus: false,
            done: false,
            error: None,
            message: None,
            submitting: false,
        }
    }
}

impl RecoveryForm {
    /// Step 1 succeeded: code was sent.
    pub fn code_sent(&mut self) {
        self.message = Some("Código de recuperação enviado para seu email".to_string());
        self.error = None;
        self.step = RecoveryStep::Code;
    }

    /// Step 2 succeeded: code verified.
    pub fn code_verified(&mut self) {
        self.error = None;
        self.step = RecoveryStep::NewPassword;
    }

    /// Step 3 local check before submitting.
    pub fn validate_new_password(&self) -> Result<(), String> {
        if self.new_password != self.confirm_password {
            return Err("As senhas não coincidem".to_string());
        }
        Ok(())
    }

    /// Step 3 succeeded.
    pub fn reset_done(&mut self) {
        self.message = Some("Senha redefinida com sucesso!".to_string());
        self.error = None;
    }
}
