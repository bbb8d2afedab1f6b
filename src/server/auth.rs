//! Sign-up, sign-in and registration
//!
//! Sign-up and sign-in only acknowledge the submission; registration writes
//! the credentials to the credential store.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    response::{Html, IntoResponse, Response},
};

use super::{form, redirect, AppState};
use crate::error::{Result, WikiError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignKind {
    Signup,
    Signin,
}

impl SignKind {
    fn template(&self) -> &'static str {
        match self {
            SignKind::Signup => "signup.html",
            SignKind::Signin => "signin.html",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            SignKind::Signup => "signup",
            SignKind::Signin => "signin",
        }
    }
}

/// GET shows the form; POST logs the username and returns to the page list
pub async fn sign(state: &AppState, kind: SignKind, request: Request<Body>) -> Result<Response> {
    let method = request.method().clone();
    if method == Method::GET {
        let html = state.templates.render_static(kind.template())?;
        return Ok(Html(html).into_response());
    }
    if method != Method::POST {
        return Err(WikiError::MethodNotAllowed);
    }

    let form = form::read(request).await?;
    tracing::info!(
        "Received {} request for username: {}",
        kind.label(),
        form.value("username")
    );
    Ok(redirect("/view/"))
}

/// Insert the submitted credentials. Empty usernames are stored as well.
pub async fn register(state: &AppState, request: Request<Body>) -> Result<Response> {
    let form = form::read(request).await?;
    let username = form.value("username").to_string();
    let password = form.value("password").to_string();

    let store = state.credentials.clone();
    let stored = tokio::task::spawn_blocking(move || store.insert(&username, &password)).await?;

    match stored {
        Ok(()) => Ok("User registered successfully!".into_response()),
        Err(e) => {
            tracing::error!("Failed to store user: {}", e);
            Ok((StatusCode::INTERNAL_SERVER_ERROR, "Failed to store user").into_response())
        }
    }
}
