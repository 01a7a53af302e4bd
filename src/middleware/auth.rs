use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::{error::Error, AppState};

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub role: Option<String>,
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    jar.get(ACCESS_TOKEN_COOKIE)
        .map(|c| c.value().trim_matches('"').to_string())
        .filter(|token| !token.is_empty())
}

/// Pulls the JWT from `Authorization: Bearer` or, for plain browser form
/// posts, from the `access_token` cookie.
fn extract_token(headers: &HeaderMap) -> std::result::Result<String, Error> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| Error::Unauthorized("bad_authorization".into()))?;
        let token = auth_str
            .strip_prefix("Bearer ")
            .ok_or_else(|| Error::Unauthorized("unsupported_scheme".into()))?;
        return Ok(token.to_string());
    }

    cookie_token(headers).ok_or_else(|| Error::Unauthorized("missing_authorization".into()))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> std::result::Result<Claims, Error> {
    let token = extract_token(headers)?;

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    let data = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(state.config.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!(error = %e, "invalid access token");
        Error::Unauthorized("invalid_token".into())
    })?;

    let role = data.claims.role.clone().unwrap_or_default();
    let allowed = &state.config.teacher_roles;
    if !allowed.iter().any(|r| r.eq_ignore_ascii_case(&role)) {
        tracing::warn!(sub = %data.claims.sub, role = %role, "rejected non-teacher access");
        return Err(Error::Forbidden("forbidden".into()));
    }
    Ok(data.claims)
}

pub async fn require_teacher(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    match authorize(&state, req.headers()) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(header::COOKIE, HeaderValue::from_static("access_token=xyz"));
        assert_eq!(extract_token(&headers).unwrap(), "abc");
    }

    #[test]
    fn token_is_read_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; access_token=xyz; other=1"),
        );
        assert_eq!(extract_token(&headers).unwrap(), "xyz");
    }

    #[test]
    fn quoted_cookie_values_are_unwrapped() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("lang=en; access_token=\"xyz\""),
        );
        assert_eq!(extract_token(&headers).unwrap(), "xyz");
    }

    #[test]
    fn empty_or_unrelated_cookies_are_not_tokens() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("access_token=; theme=dark"));
        assert!(matches!(
            extract_token(&headers),
            Err(Error::Unauthorized(_))
        ));

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("my_access_token=abc"));
        assert!(extract_token(&headers).is_err());
    }

    #[test]
    fn other_schemes_and_missing_tokens_are_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(extract_token(&headers).is_err());

        assert!(extract_token(&HeaderMap::new()).is_err());
    }
}
