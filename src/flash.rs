//! One-shot messages carried across a redirect in a signed cookie.

use axum::extract::FromRef;
use axum::response::Redirect;
use axum_extra::extract::cookie::{Cookie, Key, SignedCookieJar};
use sha2::{Digest, Sha512};

use crate::AppState;

const FLASH_COOKIE: &str = "flash";

/// Derives the cookie signing key from the configured secret. `Key` wants
/// 64 bytes and the secret may be as short as the dev default, so it goes
/// through SHA-512 first.
pub fn signing_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

fn flash_cookie(value: String) -> Cookie<'static> {
    Cookie::build((FLASH_COOKIE, value))
        .path("/")
        .http_only(true)
        .build()
}

/// Stores `message` and redirects to the dashboard.
pub fn redirect_with_flash(
    jar: SignedCookieJar,
    message: impl Into<String>,
) -> (SignedCookieJar, Redirect) {
    (jar.add(flash_cookie(message.into())), Redirect::to("/"))
}

/// Removes and returns the pending message, if any.
pub fn take_flash(jar: SignedCookieJar) -> (SignedCookieJar, Option<String>) {
    match jar.get(FLASH_COOKIE) {
        Some(cookie) => {
            let message = cookie.value().to_string();
            (jar.remove(flash_cookie(String::new())), Some(message))
        }
        None => (jar, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_secret_still_yields_key() {
        let a = signing_key("dev");
        let b = signing_key("dev");
        assert_eq!(a.master(), b.master());
        assert_ne!(signing_key("other").master(), a.master());
    }

    #[test]
    fn test_flash_round_trip_through_jar() {
        let jar = SignedCookieJar::new(signing_key("dev"));
        let (jar, _) = redirect_with_flash(jar, "Glucose is required");
        let (jar, message) = take_flash(jar);
        assert_eq!(message.as_deref(), Some("Glucose is required"));
        let (_, again) = take_flash(jar);
        assert_eq!(again, None);
    }
}
