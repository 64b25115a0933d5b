use axum::http::HeaderMap;
use axum_extra::extract::CookieJar;

pub const TOKEN_COOKIE: &str = "token";
pub const TOKEN_HEADER: &str = "x-access-token";
pub const TOKEN_HEADER_ALIAS: &str = "token";

/// Finds a candidate token in the request, trying sources in a fixed order
/// so behavior stays deterministic when several are present:
/// cookie, then `Authorization`, then the custom headers, then the body
/// field. Absent fields are normal; this never fails, only returns `None`.
pub fn fetch_token(
    cookies: &CookieJar,
    headers: &HeaderMap,
    body_token: Option<&str>,
) -> Option<String> {
    cookies
        .get(TOKEN_COOKIE)
        .map(|c| c.value().to_owned())
        .filter(|v| !v.is_empty())
        .or_else(|| bearer_token(headers))
        .or_else(|| header_value(headers, TOKEN_HEADER))
        .or_else(|| header_value(headers, TOKEN_HEADER_ALIAS))
        .or_else(|| {
            body_token
                .filter(|v| !v.is_empty())
                .map(str::to_owned)
        })
}

/// `Authorization: Bearer <t>` yields the part after the first space; a bare
/// header value is taken whole.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    let token = match value.split_once(' ') {
        Some((_, rest)) => rest,
        None => value,
    };
    if token.is_empty() {
        None
    } else {
        Some(token.to_owned())
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_extra::extract::cookie::Cookie;

    fn empty_jar() -> CookieJar {
        CookieJar::from_headers(&HeaderMap::new())
    }

    fn jar_with(token: &str) -> CookieJar {
        empty_jar().add(Cookie::new(TOKEN_COOKIE, token.to_owned()))
    }

    #[test]
    fn cookie_wins_over_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer B".parse().unwrap());
        assert_eq!(
            fetch_token(&jar_with("A"), &headers, None),
            Some("A".to_string())
        );
    }

    #[test]
    fn bearer_header_strips_scheme_prefix() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(
            fetch_token(&empty_jar(), &headers, None),
            Some("abc.def.ghi".to_string())
        );
    }

    #[test]
    fn bare_authorization_value_is_taken_whole() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "abc.def.ghi".parse().unwrap());
        assert_eq!(
            fetch_token(&empty_jar(), &headers, None),
            Some("abc.def.ghi".to_string())
        );
    }

    #[test]
    fn custom_header_beats_alias_and_body() {
        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, "from-x".parse().unwrap());
        headers.insert(TOKEN_HEADER_ALIAS, "from-alias".parse().unwrap());
        assert_eq!(
            fetch_token(&empty_jar(), &headers, Some("from-body")),
            Some("from-x".to_string())
        );
    }

    #[test]
    fn alias_header_then_body_are_last_resorts() {
        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER_ALIAS, "from-alias".parse().unwrap());
        assert_eq!(
            fetch_token(&empty_jar(), &headers, Some("from-body")),
            Some("from-alias".to_string())
        );
        assert_eq!(
            fetch_token(&empty_jar(), &HeaderMap::new(), Some("from-body")),
            Some("from-body".to_string())
        );
    }

    #[test]
    fn no_source_yields_none() {
        assert_eq!(fetch_token(&empty_jar(), &HeaderMap::new(), None), None);
    }

    #[test]
    fn empty_values_are_skipped() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "".parse().unwrap());
        headers.insert(TOKEN_HEADER, "".parse().unwrap());
        assert_eq!(fetch_token(&jar_with(""), &headers, Some("")), None);
    }
}
