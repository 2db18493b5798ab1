//! Token source selection for incoming requests.

/// Extracts the token from an `Authorization: Bearer <t>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Picks the token to verify.
///
/// A Bearer header wins over the session cookie. A header that is not a
/// Bearer header is ignored and the cookie is used instead.
pub fn select_token<'a>(header: Option<&'a str>, cookie: Option<&'a str>) -> Option<&'a str> {
    header
        .and_then(bearer_token)
        .or_else(|| cookie.map(str::trim).filter(|c| !c.is_empty()))
}
