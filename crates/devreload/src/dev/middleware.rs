//! Fixed security headers added to every response.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue, header},
    middleware::Next,
    response::Response,
};

/// Browser features the site allows for its own origin only.
pub const PERMISSIONS_POLICY: &str = "accelerometer=(self), autoplay=(self), camera=(self), \
cross-origin-isolated=(self), display-capture=(self), encrypted-media=(self), fullscreen=(self), \
geolocation=(self), gyroscope=(self), keyboard-map=(self), magnetometer=(self), microphone=(self), \
midi=(self), payment=(self), picture-in-picture=(self), publickey-credentials-get=(self), \
screen-wake-lock=(self), sync-xhr=(self), usb=(self), web-share=(self), xr-spatial-tracking=(self), \
clipboard-read=(self), clipboard-write=(self), gamepad=(self), hid=(self), idle-detection=(self), \
serial=(self)";

static PERMISSIONS_POLICY_HEADER: HeaderName = HeaderName::from_static("permissions-policy");

/// Add the security headers after the inner service has responded.
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("same-origin"),
    );
    headers.insert(
        PERMISSIONS_POLICY_HEADER.clone(),
        HeaderValue::from_static(PERMISSIONS_POLICY),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::X_XSS_PROTECTION,
        HeaderValue::from_static("1; mode=block"),
    );

    response
}
