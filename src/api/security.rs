// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Security response headers applied to every route, including fallbacks
//! and panic responses.

use axum::{
    http::header::{HeaderName, HeaderValue},
    Router,
};
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;

/// Default security headers. Handlers may override any of them.
pub const SECURITY_HEADERS: [(&str, &str); 9] = [
    (
        "content-security-policy",
        "default-src 'self'; base-uri 'self'; font-src 'self' https: data:; \
         frame-ancestors 'self'; img-src 'self' data:; object-src 'none'; \
         script-src 'self'; style-src 'self' https: 'unsafe-inline'",
    ),
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-resource-policy", "same-origin"),
    ("referrer-policy", "no-referrer"),
    ("strict-transport-security", "max-age=15552000; includeSubDomains"),
    ("x-content-type-options", "nosniff"),
    ("x-dns-prefetch-control", "off"),
    ("x-frame-options", "SAMEORIGIN"),
    ("x-xss-protection", "0"),
];

fn header_layer(name: &'static str, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::if_not_present(
        HeaderName::from_static(name),
        HeaderValue::from_static(value),
    )
}

/// Apply [`SECURITY_HEADERS`] to the provided router.
pub fn add_security_headers(router: Router) -> Router {
    let [csp, coop, corp, referrer, hsts, nosniff, dns_prefetch, frame, xss] = SECURITY_HEADERS;

    router.layer(
        ServiceBuilder::new()
            .layer(header_layer(csp.0, csp.1))
            .layer(header_layer(coop.0, coop.1))
            .layer(header_layer(corp.0, corp.1))
            .layer(header_layer(referrer.0, referrer.1))
            .layer(header_layer(hsts.0, hsts.1))
            .layer(header_layer(nosniff.0, nosniff.1))
            .layer(header_layer(dns_prefetch.0, dns_prefetch.1))
            .layer(header_layer(frame.0, frame.1))
            .layer(header_layer(xss.0, xss.1)),
    )
}
