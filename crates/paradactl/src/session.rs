//! Operator session state machine.
//!
//! Two states, `Anonymous` and `Authenticated`. The startup probe and
//! logout are fail-open: a probe failure silently stays anonymous, a
//! failed logout call still logs the operator out locally.

use crate::client::{LoginResponse, SessionStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Anonymous,
    Authenticated,
}

#[derive(Debug, Clone)]
pub struct Session {
    phase: SessionPhase,
    username: String,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Anonymous,
            username: String::new(),
        }
    }
}

impl Session {
    pub fn logged_in(&self) -> bool {
        self.phase == SessionPhase::Authenticated
    }

    /// Display name of the logged-in operator, "-" when anonymous or
    /// unknown.
    pub fn display_name(&self) -> &str {
        if self.username.is_empty() {
            "-"
        } else {
            &self.username
        }
    }

    /// Apply the startup `/api/status` probe. `None` means the probe
    /// failed; that is non-fatal and leaves the session untouched.
    pub fn apply_probe(&mut self, status: Option<SessionStatus>) {
        let Some(status) = status else { return };
        if status.logged_in {
            self.phase = SessionPhase::Authenticated;
            if let Some(name) = status.username {
                self.username = name;
            }
        }
    }

    /// Apply a successful login. The display name prefers the
    /// backend's `nome`, then its `username`, then the identifier the
    /// operator typed.
    pub fn login(&mut self, typed_username: &str, response: &LoginResponse) {
        self.phase = SessionPhase::Authenticated;
        self.username = response
            .nome
            .clone()
            .or_else(|| response.username.clone())
            .unwrap_or_else(|| typed_username.to_string());
    }

    /// Log out locally, regardless of whether the backend call
    /// succeeded.
    pub fn logout(&mut self) {
        self.phase = SessionPhase::Anonymous;
        self.username.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_anonymous() {
        let session = Session::default();
        assert!(!session.logged_in());
        assert_eq!(session.display_name(), "-");
    }

    #[test]
    fn test_probe_failure_stays_anonymous() {
        let mut session = Session::default();
        session.apply_probe(None);
        assert!(!session.logged_in());
    }

    #[test]
    fn test_probe_with_active_session() {
        let mut session = Session::default();
        session.apply_probe(Some(SessionStatus {
            logged_in: true,
            username: Some("carla".to_string()),
        }));
        assert!(session.logged_in());
        assert_eq!(session.display_name(), "carla");
    }

    #[test]
    fn test_probe_logged_out_does_not_authenticate() {
        let mut session = Session::default();
        session.apply_probe(Some(SessionStatus {
            logged_in: false,
            username: None,
        }));
        assert!(!session.logged_in());
    }

    #[test]
    fn test_login_name_fallback_order() {
        let mut session = Session::default();
        session.login(
            "typed",
            &LoginResponse {
                ok: true,
                username: Some("carla.m".to_string()),
                nome: Some("Carla Maroni".to_string()),
            },
        );
        assert_eq!(session.display_name(), "Carla Maroni");

        session.login(
            "typed",
            &LoginResponse {
                ok: true,
                username: Some("carla.m".to_string()),
                nome: None,
            },
        );
        assert_eq!(session.display_name(), "carla.m");

        session.login(
            "typed",
            &LoginResponse {
                ok: true,
                username: None,
                nome: None,
            },
        );
        assert_eq!(session.display_name(), "typed");
    }

    #[test]
    fn test_logout_always_clears() {
        let mut session = Session::default();
        session.login(
            "typed",
            &LoginResponse {
                ok: true,
                username: None,
                nome: None,
            },
        );
        assert!(session.logged_in());
        session.logout();
        assert!(!session.logged_in());
        assert_eq!(session.display_name(), "-");
    }
}
