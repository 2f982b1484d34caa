//! Request locale from the `Tmb-Lang` header.
//!
//! The site's scripts send `Tmb-Lang: nl|en|de` with every request. The
//! header is resolved once per request by [`resolve_locale`], exposed to
//! handlers through the [`Locale`] extractor, and echoed back as
//! `Content-Language`.

use axum::{
    extract::{FromRequestParts, Request},
    http::{HeaderValue, header, request::Parts},
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;
use std::fmt;

/// Request header carrying the language code.
pub const LOCALE_HEADER: &str = "tmb-lang";

/// Languages the site is published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    Dutch,
    English,
    German,
}

impl Locale {
    /// Parse a two-letter language code. Only the exact lowercase codes match.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "nl" => Some(Locale::Dutch),
            "en" => Some(Locale::English),
            "de" => Some(Locale::German),
            _ => None,
        }
    }

    /// Locale for a header value; absent, blank, unknown or non-ASCII values
    /// fall back to the default.
    pub fn from_header(value: Option<&HeaderValue>) -> Self {
        value
            .and_then(|v| v.to_str().ok())
            .and_then(Self::from_code)
            .unwrap_or_default()
    }

    pub fn code(&self) -> &'static str {
        match self {
            Locale::Dutch => "nl",
            Locale::English => "en",
            Locale::German => "de",
        }
    }

    /// Culture name, e.g. `nl-NL`.
    pub fn culture(&self) -> &'static str {
        match self {
            Locale::Dutch => "nl-NL",
            Locale::English => "en-US",
            Locale::German => "de-DE",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.culture())
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<Locale>()
            .copied()
            .unwrap_or_else(|| Locale::from_header(parts.headers.get(LOCALE_HEADER))))
    }
}

/// Store the request locale in extensions and set `Content-Language`.
pub async fn resolve_locale(mut request: Request, next: Next) -> Response {
    let locale = Locale::from_header(request.headers().get(LOCALE_HEADER));
    request.extensions_mut().insert(locale);

    let mut response = next.run(request).await;
    response.headers_mut().insert(
        header::CONTENT_LANGUAGE,
        HeaderValue::from_static(locale.culture()),
    );
    response
}
