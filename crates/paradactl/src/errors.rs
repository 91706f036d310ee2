//! Exit codes for paradactl one-shot commands.

/// Exit code for success.
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for general errors.
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Exit code when the session expired (backend returned 401).
pub const EXIT_SESSION_EXPIRED: i32 = 64;

/// Exit code when the backend returns invalid JSON.
pub const EXIT_INVALID_RESPONSE: i32 = 65;

/// Exit code when the backend is unreachable.
pub const EXIT_BACKEND_UNREACHABLE: i32 = 70;
