//! Route handlers.

use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::access::{Decision, Grant, Resource};
use crate::db::{DatabaseError, TableSource};
use crate::http::request::ClientAddress;
use crate::http::response::{redirect_to_login, redirect_to_root, AuthResponse};
use crate::http::server::AppState;

/// Body of `POST /login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

const LOGIN_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Login</title></head>
<body>
  <form id="loginForm">
    <input id="username" name="username" placeholder="Username" autocomplete="username">
    <input id="password" name="password" type="password" placeholder="Password" autocomplete="current-password">
    <button type="submit">Log in</button>
  </form>
  <script>
    document.getElementById('loginForm').addEventListener('submit', function (e) {
      e.preventDefault();
      fetch('/login', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({
          username: document.getElementById('username').value,
          password: document.getElementById('password').value
        })
      })
        .then(function (response) { return response.json(); })
        .then(function (data) {
          if (data.success) { window.location.href = '/'; }
          else { alert(data.message || 'Login failed. Please try again.'); }
        })
        .catch(function (error) { console.error('Error:', error); });
    });
  </script>
</body>
</html>
"#;

fn admit(decision: Decision) -> Result<Grant, Response> {
    match decision {
        Decision::Allow(grant) => Ok(grant),
        Decision::RedirectToLogin => Err(redirect_to_login()),
        Decision::RedirectToRoot => Err(redirect_to_root()),
    }
}

/// Run a blocking database call on the blocking pool.
async fn with_tables<T, F>(state: &AppState, f: F) -> Result<T, DatabaseError>
where
    F: FnOnce(&dyn TableSource) -> Result<T, DatabaseError> + Send + 'static,
    T: Send + 'static,
{
    let source = state.tables.clone();
    tokio::task::spawn_blocking(move || f(source.as_ref()))
        .await
        .map_err(|e| DatabaseError::Task(e.to_string()))?
}

/// `GET /`: table names visible to the client.
pub async fn list_tables(State(state): State<AppState>, ClientAddress(addr): ClientAddress) -> Response {
    let grant = match admit(state.gate.check(&addr, Resource::Root)) {
        Ok(grant) => grant,
        Err(redirect) => return redirect,
    };

    match with_tables(&state, |source| source.list_tables()).await {
        Ok(tables) => Json(grant.filter_tables(tables)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// `GET /{table}`: every row of one table.
pub async fn show_table(
    State(state): State<AppState>,
    ClientAddress(addr): ClientAddress,
    Path(table): Path<String>,
) -> Response {
    let grant = match admit(state.gate.check(&addr, Resource::Table(&table))) {
        Ok(grant) => grant,
        Err(redirect) => return redirect,
    };

    tracing::debug!(client = %addr, user = ?grant.username(), table = %table, "Reading table");
    let name = table.clone();
    match with_tables(&state, move |source| source.read_table(&name)).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => e.into_response(),
    }
}

/// `GET /login`
pub async fn login_page(State(state): State<AppState>, ClientAddress(addr): ClientAddress) -> Response {
    if state.gate.protection() && state.sessions.is_authenticated(&addr) {
        return redirect_to_root();
    }
    Html(LOGIN_PAGE).into_response()
}

/// `POST /login`
pub async fn login(
    State(state): State<AppState>,
    ClientAddress(addr): ClientAddress,
    Json(body): Json<LoginRequest>,
) -> Response {
    match state.sessions.login(&addr, &body.username, &body.password) {
        Ok(()) => Json(AuthResponse::ok()).into_response(),
        Err(e) => e.into_response(),
    }
}

/// `POST /logout`
pub async fn logout(State(state): State<AppState>, ClientAddress(addr): ClientAddress) -> Response {
    match state.sessions.logout(&addr) {
        Ok(()) => Json(AuthResponse::ok()).into_response(),
        Err(e) => e.into_response(),
    }
}
