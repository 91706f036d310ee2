//! UI state for the dashboard TUI.

use crate::controller::DashboardState;
use crate::forms::{AuthForm, AuthMode, RecoveryForm, RecoveryStep, StopForm};
use crate::session::Session;

/// Which auth-form field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    FullName,
    Username,
    Email,
    Password,
    ConfirmPassword,
}

/// Modal overlay shown on top of the dashboard or login screen.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    StopForm(StopForm),
    Recovery(RecoveryForm),
}

/// Top-level TUI state.
pub struct App {
    pub session: Session,
    pub state: DashboardState,
    pub auth: AuthForm,
    pub auth_focus: AuthField,
    pub overlay: Option<Overlay>,
    /// Selected row of the reason-distribution panel.
    pub selected_slice: usize,
    /// Configured `/api/data` poll interval, shown in the footer.
    pub poll_secs: u64,
    pub should_quit: bool,
}

impl App {
    pub fn new(machine: &str, poll_secs: u64) -> Self {
        Self {
            session: Session::default(),
            state: DashboardState::new(machine),
            auth: AuthForm::default(),
            auth_focus: AuthField::Username,
            overlay: None,
            selected_slice: 0,
            poll_secs,
            should_quit: false,
        }
    }

    /// Fields visible in the current auth mode, in focus order.
    pub fn auth_fields(&self) -> Vec<AuthField> {
        match self.auth.mode {
            AuthMode::Login => vec![AuthField::Username, AuthField::Password],
            AuthMode::Register => vec![
                AuthField::FullName,
                AuthField::Username,
                AuthField::Email,
                AuthField::Password,
                AuthField::ConfirmPassword,
            ],
        }
    }

    pub fn focus_next(&mut self) {
        let fields = self.auth_fields();
        let idx = fields
            .iter()
            .position(|f| *f == self.auth_focus)
            .unwrap_or(0);
        self.auth_focus = fields[(idx + 1) % fields.len()];
    }

    pub fn focus_prev(&mut self) {
        let fields = self.auth_fields();
        let idx = fields
            .iter()
            .position(|f| *f == self.auth_focus)
            .unwrap_or(0);
        self.auth_focus = fields[(idx + fields.len() - 1) % fields.len()];
    }

    /// Mutable access to the focused auth field's buffer.
    pub fn focused_auth_buffer(&mut self) -> &mut String {
        match self.auth_focus {
            AuthField::FullName => &mut self.auth.full_name,
            AuthField::Username => &mut self.auth.username,
            AuthField::Email => &mut self.auth.email,
            AuthField::Password => &mut self.auth.password,
            AuthField::ConfirmPassword => &mut self.auth.confirm_password,
        }
    }

    /// Switch auth mode and reset focus to the first visible field.
    pub fn toggle_auth_mode(&mut self) {
        self.auth.toggle_mode();
        self.auth_focus = match self.auth.mode {
            AuthMode::Login => AuthField::Username,
            AuthMode::Register => AuthField::FullName,
        };
    }

    /// Move the distribution selection, clamped to the slice count.
    pub fn select_slice(&mut self, down: bool) {
        let len = self.state.pie().len();
        if len == 0 {
            self.selected_slice = 0;
            return;
        }
        if down {
            self.selected_slice = (self.selected_slice + 1).min(len - 1);
        } else {
            self.selected_slice = self.selected_slice.saturating_sub(1);
        }
    }

    /// Apply the selected slice's label as the reason filter.
    pub fn filter_from_selection(&mut self) {
        let label = self
            .state
            .pie()
            .get(self.selected_slice)
            .map(|s| s.label.clone());
        if let Some(label) = label {
            self.state.set_filter(&label);
        }
    }

    /// Mutable access to the focused recovery field's buffer, given
    /// whether focus is on the confirmation field in step 3.
    pub fn recovery_buffer(form: &mut RecoveryForm, confirm: bool) -> &mut String {
        match form.step {
            RecoveryStep::Email => &mut form.email,
            RecoveryStep::Code => &mut form.code,
            RecoveryStep::NewPassword => {
                if confirm {
                    &mut form.confirm_password
                } else {
                    &mut form.new_password
                }
            }
        }
    }
}
