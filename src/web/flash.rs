//! One-shot messages carried across a redirect in a signed cookie.

use axum_extra::extract::{cookie::{Cookie, SameSite}, SignedCookieJar};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlashLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub message: String,
}

impl FlashMessage {
    pub fn css_class(&self) -> &'static str {
        match self.level {
            FlashLevel::Success => "flash success",
            FlashLevel::Error => "flash error",
        }
    }
}

fn encode(message: &FlashMessage) -> Option<String> {
    serde_json::to_vec(message).ok().map(hex::encode)
}

fn decode(value: &str) -> Option<FlashMessage> {
    let bytes = hex::decode(value).ok()?;
    serde_json::from_slice(&bytes).ok()
}

pub fn push(jar: SignedCookieJar, level: FlashLevel, message: impl Into<String>) -> SignedCookieJar {
    let message = FlashMessage { level, message: message.into() };
    let Some(value) = encode(&message) else {
        return jar;
    };

    jar.add(
        Cookie::build((FLASH_COOKIE, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}

pub fn success(jar: SignedCookieJar, message: impl Into<String>) -> SignedCookieJar {
    push(jar, FlashLevel::Success, message)
}

pub fn error(jar: SignedCookieJar, message: impl Into<String>) -> SignedCookieJar {
    push(jar, FlashLevel::Error, message)
}

/// Reads and clears the pending message. A tampered cookie reads as none.
pub fn take(jar: SignedCookieJar) -> (SignedCookieJar, Option<FlashMessage>) {
    let message = jar.get(FLASH_COOKIE).and_then(|cookie| decode(cookie.value()));
    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
    (jar, message)
}

/// Turns user-fixable failures into an error flash; anything else
/// (database, internal) is propagated.
pub fn outcome<T>(
    jar: SignedCookieJar,
    result: Result<T>,
    on_success: impl FnOnce(T) -> String,
) -> std::result::Result<SignedCookieJar, AppError> {
    match result {
        Ok(value) => Ok(success(jar, on_success(value))),
        Err(err) => {
            let message = err.user_message().map(str::to_string);
            match message {
                Some(message) => Ok(error(jar, message)),
                None => Err(err),
            }
        }
    }
}
