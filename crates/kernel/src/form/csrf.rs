//! CSRF token generation and verification.

use anyhow::Result;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tower_sessions::Session;

/// Session key prefix for storing CSRF tokens.
const CSRF_SESSION_KEY: &str = "csrf_tokens";

/// Maximum number of tokens to store per action.
const MAX_TOKENS: usize = 10;

/// Token validity period in seconds (1 hour).
const TOKEN_VALIDITY_SECS: i64 = 3600;

/// Action a token is issued for. Tokens never verify for another action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenAction {
    Submit,
    Delete,
}

impl TokenAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Delete => "delete",
        }
    }

    /// Parse an action name from a route segment.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "submit" => Some(Self::Submit),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }

    fn session_key(&self) -> String {
        format!("{CSRF_SESSION_KEY}:{}", self.as_str())
    }
}

impl std::fmt::Display for TokenAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split stored `token:timestamp` data.
fn parse_token_data(token_data: &str) -> Option<(&str, i64)> {
    let (token, timestamp) = token_data.split_once(':')?;
    Some((token, timestamp.parse().ok()?))
}

fn is_fresh(timestamp: i64, now: i64) -> bool {
    now - timestamp <= TOKEN_VALIDITY_SECS
}

async fn stored_tokens(session: &Session, key: &str) -> Vec<String> {
    session.get(key).await.unwrap_or(None).unwrap_or_default()
}

/// Generate a CSRF token for `action` and store it in the session.
pub async fn generate_csrf_token(session: &Session, action: TokenAction) -> Result<String> {
    let mut random_bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut random_bytes);

    let timestamp = chrono::Utc::now().timestamp();

    let mut hasher = Sha256::new();
    hasher.update(random_bytes);
    hasher.update(timestamp.to_le_bytes());
    let token = hex::encode(hasher.finalize());

    let key = action.session_key();
    let mut tokens = stored_tokens(session, &key).await;
    tokens.push(format!("{token}:{timestamp}"));

    // Keep only the most recent tokens
    if tokens.len() > MAX_TOKENS {
        let skip = tokens.len() - MAX_TOKENS;
        tokens.drain(..skip);
    }

    session
        .insert(&key, tokens)
        .await
        .map_err(|e| anyhow::anyhow!("failed to store CSRF token: {e}"))?;

    Ok(token)
}

/// Verify a CSRF token for `action` against the session.
///
/// Tokens are single-use and time-limited. An empty token never verifies.
pub async fn verify_csrf_token(
    session: &Session,
    action: TokenAction,
    submitted: &str,
) -> Result<bool> {
    if submitted.is_empty() {
        return Ok(false);
    }

    let key = action.session_key();
    let mut tokens = stored_tokens(session, &key).await;
    if tokens.is_empty() {
        return Ok(false);
    }

    let now = chrono::Utc::now().timestamp();
    let found_index = tokens.iter().position(|token_data| {
        parse_token_data(token_data)
            .is_some_and(|(token, timestamp)| token == submitted && is_fresh(timestamp, now))
    });

    let Some(index) = found_index else {
        return Ok(false);
    };

    tokens.remove(index);
    // Drop expired tokens while we're at it
    tokens.retain(|token_data| {
        parse_token_data(token_data).is_some_and(|(_, timestamp)| is_fresh(timestamp, now))
    });

    session
        .insert(&key, tokens)
        .await
        .map_err(|e| anyhow::anyhow!("failed to update CSRF tokens: {e}"))?;

    Ok(true)
}
