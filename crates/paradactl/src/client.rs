//! HTTP client for the stoppage backend.
//!
//! One method per endpoint, all going through a single reqwest client
//! with a cookie store so the session cookie set by `/api/login` rides
//! along on every later call. Transport failures, backend rejections
//! and expired sessions map to distinct [`ApiError`] variants so the
//! UI can surface each one differently.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use thiserror::Error;

use parada_common::DashboardPayload;

use crate::logging;

/// Failure taxonomy for backend operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Backend process or network unreachable.
    #[error("Erro de rede ao conectar com o backend.")]
    Network(#[source] reqwest::Error),

    /// Backend returned 401 for an authenticated operation.
    #[error("Sessão expirada. Por favor, faça login novamente.")]
    SessionExpired,

    /// Backend rejected the request (4xx or `ok: false`); the message
    /// is backend-provided when present, a localized fallback
    /// otherwise.
    #[error("{message}")]
    Rejected { message: String },

    /// Response body was not the JSON we expect.
    #[error("Resposta inválida do backend: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Stable code for the operation log.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Network(_) => "network",
            ApiError::SessionExpired => "session_expired",
            ApiError::Rejected { .. } => "rejected",
            ApiError::InvalidResponse(_) => "invalid_response",
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::InvalidResponse(e.to_string())
        } else {
            ApiError::Network(e)
        }
    }
}

/// `/api/status` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionStatus {
    #[serde(default)]
    pub logged_in: bool,
    #[serde(default)]
    pub username: Option<String>,
}

/// `/api/login` response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default = "default_ok")]
    pub ok: bool,
    #[serde(default)]
    pub username: Option<String>,
    /// Full display name; preferred over `username` when present.
    #[serde(default)]
    pub nome: Option<String>,
}

/// `/api/register_user` request body.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub nome: String,
}

impl Default for LoginResponse {
    fn default() -> Self {
        Self {
            ok: true,
            username: None,
            nome: None,
        }
    }
}

/// Generic `{ok, error, message}` backend envelope.
///
/// An unparseable or empty body is treated as `ok`, matching HTTP
/// status alone; only an explicit `ok: false` downgrades a 2xx.
#[derive(Debug, Clone, Deserialize)]
struct Envelope {
    #[serde(default = "default_ok")]
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

fn default_ok() -> bool {
    true
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            ok: true,
            error: None,
            message: None,
        }
    }
}

impl Envelope {
    fn rejection(&self, fallback: &str) -> ApiError {
        let message = self
            .error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| fallback.to_string());
        ApiError::Rejected { message }
    }
}

/// Client for the stoppage backend.
pub struct ApiClient {
    base: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Build a client for the given base URL. Does not connect.
    pub fn new(base: &str) -> Result<Self> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            base: base.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn log<T>(&self, op: &'static str, started: Instant, result: &Result<T, ApiError>) {
        let duration_ms = started.elapsed().as_millis() as u64;
        match result {
            Ok(_) => logging::log_operation(op, true, duration_ms, None),
            Err(e) => {
                tracing::warn!(operation = op, error = %e, "backend operation failed");
                logging::log_operation(op, false, duration_ms, Some(e));
            }
        }
    }

    /// GET `/api/data`: the authoritative dashboard snapshot.
    pub async fn fetch_data(&self) -> Result<DashboardPayload, ApiError> {
        let started = Instant::now();
        let result = async {
            let res = self.http.get(self.url("/api/data")).send().await?;
            if !res.status().is_success() {
                return Err(ApiError::Rejected {
                    message: format!("Erro ao buscar dados: HTTP {}", res.status().as_u16()),
                });
            }
            let payload = res.json::<DashboardPayload>().await?;
            tracing::debug!(stops = payload.stops.len(), "dashboard snapshot fetched");
            Ok(payload)
        }
        .await;
        self.log("fetch_data", started, &result);
        result
    }

    /// GET `/api/status`: non-fatal session probe.
    pub async fn status(&self) -> Result<SessionStatus, ApiError> {
        let started = Instant::now();
        let result = async {
            let res = self.http.get(self.url("/api/status")).send().await?;
            if !res.status().is_success() {
                return Ok(SessionStatus::default());
            }
            Ok(res.json::<SessionStatus>().await?)
        }
        .await;
        self.log("status", started, &result);
        result
    }

    /// POST `/api/login`.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let started = Instant::now();
        let result = async {
            let res = self
                .http
                .post(self.url("/api/login"))
                .json(&serde_json::json!({ "username": username, "password": password }))
                .send()
                .await?;
            let ok = res.status().is_success();
            let body: LoginResponse = res.json().await.unwrap_or_default();
            if !ok || !body.ok {
                return Err(ApiError::Rejected {
                    message: "Usuário ou senha inválidos".to_string(),
                });
            }
            Ok(body)
        }
        .await;
        self.log("login", started, &result);
        result
    }

    /// POST `/api/logout`. Callers treat failure as non-fatal.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let started = Instant::now();
        let result = async {
            self.http.post(self.url("/api/logout")).send().await?;
            Ok(())
        }
        .await;
        self.log("logout", started, &result);
        result
    }

    /// POST `/api/register_user`.
    pub async fn register_user(&self, req: &RegisterRequest) -> Result<(), ApiError> {
        let started = Instant::now();
        let result = async {
            let res = self
                .http
                .post(self.url("/api/register_user"))
                .json(req)
                .send()
                .await?;
            let ok = res.status().is_success();
            let envelope: Envelope = res.json().await.unwrap_or_default();
            if !ok || !envelope.ok {
                return Err(
                    envelope.rejection("Erro ao cadastrar usuário. Verifique os dados.")
                );
            }
            Ok(())
        }
        .await;
        self.log("register_user", started, &result);
        result
    }

    /// POST `/api/register_stop`: log a manual stoppage.
    pub async fn register_stop(
        &self,
        reason: &str,
        duration: f64,
        machine: &str,
    ) -> Result<(), ApiError> {
        let started = Instant::now();
        let result = async {
            let res = self
                .http
                .post(self.url("/api/register_stop"))
                .json(&serde_json::json!({
                    "reason": reason,
                    "duration": duration,
                    "machine": machine,
                }))
                .send()
                .await?;
            if res.status() == reqwest::StatusCode::UNAUTHORIZED {
                return Err(ApiError::SessionExpired);
            }
            if !res.status().is_success() {
                return Err(ApiError::Rejected {
                    message: "Erro ao registrar parada".to_string(),
                });
            }
            Ok(())
        }
        .await;
        self.log("register_stop", started, &result);
        result
    }

    /// POST `/api/request-recovery`: start a password reset.
    pub async fn request_recovery(&self, email: &str) -> Result<(), ApiError> {
        let started = Instant::now();
        let result = async {
            let res = self
                .http
                .post(self.url("/api/request-recovery"))
                .json(&serde_json::json!({ "email": email }))
                .send()
                .await?;
            if !res.status().is_success() {
                return Err(ApiError::Rejected {
                    message: "Email não encontrado".to_string(),
                });
            }
            Ok(())
        }
        .await;
        self.log("request_recovery", started, &result);
        result
    }

    /// POST `/api/verify-code`.
    pub async fn verify_code(&self, email: &str, code: &str) -> Result<(), ApiError> {
        let started = Instant::now();
        let result = async {
            let res = self
                .http
                .post(self.url("/api/verify-code"))
                .json(&serde_json::json!({ "email": email, "code": code }))
                .send()
                .await?;
            if !res.status().is_success() {
                return Err(ApiError::Rejected {
                    message: "Código inválido".to_string(),
                });
            }
            Ok(())
        }
        .await;
        self.log("verify_code", started, &result);
        result
    }

    /// POST `/api/reset-password`: finalize a password reset.
    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        let started = Instant::now();
        let result = async {
            let res = self
                .http
                .post(self.url("/api/reset-password"))
                .json(&serde_json::json!({
                    "email": email,
                    "code": code,
                    "newPassword": new_password,
                }))
                .send()
                .await?;
            if !res.status().is_success() {
                return Err(ApiError::Rejected {
                    message: "Erro ao redefinir senha".to_string(),
                });
            }
            Ok(())
        }
        .await;
        self.log("reset_password", started, &result);
        result
    }
}
