//! Session Resolution
//!
//! A session stands in for the browser origin that owned the cart: it is
//! read from the `x-session-id` header or the `rental_session` cookie, and
//! minted when the request carries neither.

use crate::{
    checkout::{CheckoutError, CheckoutPhase},
    error::ApiError,
    state::SharedState,
};
use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::{
        header::{COOKIE, SET_COOKIE},
        request::Parts,
        HeaderMap, HeaderName, HeaderValue, StatusCode,
    },
    response::{IntoResponseParts, ResponseParts},
    routing::delete,
    Router,
};
use std::convert::Infallible;
use uuid::Uuid;

/// Header carrying the session id in both directions.
pub const SESSION_HEADER: HeaderName = HeaderName::from_static("x-session-id");
/// Cookie carrying the session id for browser clients.
pub const SESSION_COOKIE: &str = "rental_session";

const MAX_SESSION_ID_LEN: usize = 64;

/// Session of the current request.
///
/// Returned as part of a response, it echoes the id in `x-session-id` and
/// sets the cookie when the session was just created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: String,
    is_new: bool,
}

impl Session {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }
}

/// Returns a fresh session id.
pub fn new_session_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn is_valid_session_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_SESSION_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
}

fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v)
}

/// Resolves the session from request headers; the header wins over the cookie.
pub fn resolve_session(headers: &HeaderMap) -> Result<Session, ApiError> {
    let presented = headers
        .get(&SESSION_HEADER)
        .map(|v| v.to_str().map_err(|_| ApiError::InvalidSession))
        .transpose()?
        .or_else(|| cookie_value(headers, SESSION_COOKIE));

    match presented {
        Some(id) if is_valid_session_id(id) => Ok(Session {
            id: id.to_string(),
            is_new: false,
        }),
        Some(_) => Err(ApiError::InvalidSession),
        None => Ok(Session {
            id: new_session_id(),
            is_new: true,
        }),
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        resolve_session(&parts.headers)
    }
}

impl IntoResponseParts for Session {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        // Ids are validated to header-safe characters.
        if let Ok(value) = HeaderValue::from_str(&self.id) {
            res.headers_mut().insert(SESSION_HEADER, value);
        }
        if self.is_new {
            let cookie = format!("{SESSION_COOKIE}={}; Path=/; HttpOnly", self.id);
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                res.headers_mut().insert(SET_COOKIE, value);
            }
        }
        Ok(res)
    }
}

/// Creates the session lifecycle route
pub fn routes() -> Router<SharedState> {
    Router::new().route("/session", delete(end_session))
}

/// Endpoint: DELETE /session
/// Releases the in-memory state of the session. The stored cart and rental
/// history stay and are reloaded on the next request.
async fn end_session(
    State(state): State<SharedState>,
    session: Session,
) -> Result<StatusCode, ApiError> {
    let phase = state.checkout_view(session.id()).phase;
    if phase == CheckoutPhase::PaymentProcessing {
        return Err(CheckoutError::InvalidTransition {
            from: phase,
            action: "end session",
        }
        .into());
    }

    state.end_session(session.id());
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.append(
                HeaderName::from_bytes(k.as_bytes()).unwrap(),
                HeaderValue::from_str(v).unwrap(),
            );
        }
        map
    }

    #[test]
    fn header_takes_precedence_over_cookie() {
        let session = resolve_session(&headers(&[
            ("x-session-id", "from-header"),
            ("cookie", "rental_session=from-cookie"),
        ]))
        .unwrap();
        assert_eq!(session.id(), "from-header");
        assert!(!session.is_new());
    }

    #[test]
    fn cookie_is_found_among_others() {
        let session = resolve_session(&headers(&[(
            "cookie",
            "theme=dark; rental_session=abc_123; lang=th",
        )]))
        .unwrap();
        assert_eq!(session.id(), "abc_123");
    }

    #[test]
    fn missing_session_is_minted() {
        let session = resolve_session(&HeaderMap::new()).unwrap();
        assert!(session.is_new());
        assert_eq!(session.id().len(), 32);
    }

    #[test]
    fn unsafe_ids_are_rejected() {
        let too_long = "a".repeat(65);
        for bad in ["../etc", "a b", too_long.as_str()] {
            assert!(matches!(
                resolve_session(&headers(&[("x-session-id", bad)])),
                Err(ApiError::InvalidSession)
            ));
        }
    }
}
