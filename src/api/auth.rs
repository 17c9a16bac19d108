//! Session handling: input checks, login/register and the stored token.

use log::{info, warn};

use crate::error::{Error, Result};
use crate::persist::KeyValueStorage;

use super::client::{AuthSession, MusicApi};

/// Storage key of the bearer token.
pub const TOKEN_KEY: &str = "token";

const MIN_PASSWORD_LEN: usize = 6;

pub fn validate_login(email: &str, password: &str) -> Result<()> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(Error::Validation(
            "Email and password are required".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_registration(
    username: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> Result<()> {
    if username.trim().is_empty() || email.trim().is_empty() {
        return Err(Error::Validation(
            "Username and email are required".to_string(),
        ));
    }
    if password != confirm {
        return Err(Error::Validation("Passwords do not match".to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    Ok(())
}

/// Token saved by a previous login, if any.
pub fn stored_token(storage: &dyn KeyValueStorage) -> Option<String> {
    match storage.get(TOKEN_KEY) {
        Ok(Some(raw)) => match serde_json::from_str::<String>(&raw) {
            Ok(token) if !token.is_empty() => Some(token),
            Ok(_) => None,
            Err(e) => {
                warn!("ignoring unreadable token: {e}");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            warn!("reading token failed: {e}");
            None
        }
    }
}

fn remember(api: &mut MusicApi, storage: &dyn KeyValueStorage, session: &AuthSession) -> Result<()> {
    storage.set(TOKEN_KEY, &serde_json::to_string(&session.token)?)?;
    api.set_token(Some(session.token.clone()));
    Ok(())
}

pub fn login(
    api: &mut MusicApi,
    storage: &dyn KeyValueStorage,
    email: &str,
    password: &str,
) -> Result<AuthSession> {
    validate_login(email, password)?;
    let session = api.login(email.trim(), password)?;
    remember(api, storage, &session)?;
    info!("logged in as {}", email.trim());
    Ok(session)
}

pub fn register(
    api: &mut MusicApi,
    storage: &dyn KeyValueStorage,
    username: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> Result<AuthSession> {
    validate_registration(username, email, password, confirm)?;
    let session = api.register(username.trim(), email.trim(), password)?;
    remember(api, storage, &session)?;
    info!("registered {}", username.trim());
    Ok(session)
}

pub fn logout(api: &mut MusicApi, storage: &dyn KeyValueStorage) -> Result<()> {
    api.set_token(None);
    storage.remove(TOKEN_KEY)
}
