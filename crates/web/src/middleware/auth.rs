use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use domain::Actor;
use uuid::Uuid;

use crate::error::WebError;

/// Resolves the bearer token to an [`Actor`] and stores it in the request
/// extensions for handlers to extract.
pub async fn require_auth(
    State(api_keys): State<ApiKeys>,
    mut request: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or(WebError::Unauthorized)?;

    match api_keys.resolve(token) {
        Some(actor) => {
            request.extensions_mut().insert(actor);
            Ok(next.run(request).await)
        }
        None => {
            tracing::warn!("Invalid API key attempt");
            Err(WebError::Unauthorized)
        }
    }
}

/// Configured tokens, each bound to one user.
#[derive(Clone, Default)]
pub struct ApiKeys {
    keys: Arc<HashMap<String, Actor>>,
}

impl ApiKeys {
    /// Parses `token=user-uuid[:admin]` entries separated by commas.
    pub fn from_comma_separated(keys_str: &str) -> Result<Self> {
        let mut keys = HashMap::new();

        for entry in keys_str.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (token, identity) = entry
                .split_once('=')
                .with_context(|| format!("API key entry '{}' is missing '=user-id'", entry))?;
            let (user, flag) = match identity.split_once(':') {
                Some((user, flag)) => (user, Some(flag)),
                None => (identity, None),
            };
            let user_id = Uuid::parse_str(user.trim())
                .with_context(|| format!("Invalid user id in API key entry for '{}'", token))?;
            let actor = match flag.map(str::trim) {
                None => Actor::user(user_id),
                Some("admin") => Actor::admin(user_id),
                Some(other) => bail!("Unknown API key flag '{}'", other),
            };

            keys.insert(token.trim().to_string(), actor);
        }

        Ok(Self {
            keys: Arc::new(keys),
        })
    }

    pub fn resolve(&self, key: &str) -> Option<Actor> {
        self.keys.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
