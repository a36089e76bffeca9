//! `Accept` and `Content-Type` parsing.
//!
//! Parameters and q-values are ignored: negotiation only asks whether a
//! media type is named at all.

use http::header::{ACCEPT, CONTENT_TYPE};
use http::HeaderMap;
use mime::Mime;

/// Media ranges listed in every `Accept` header, in order.
///
/// Unparseable entries are skipped.
#[must_use]
pub fn accepted(headers: &HeaderMap) -> Vec<Mime> {
    headers
        .get_all(ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|range| range.trim().parse::<Mime>().ok())
        .collect()
}

/// The request `Content-Type`, if present and parseable.
#[must_use]
pub fn content_type(headers: &HeaderMap) -> Option<Mime> {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<Mime>().ok())
}

/// Whether `mime` names exactly `media` (ignoring parameters).
#[must_use]
pub fn names(mime: &Mime, media: &str) -> bool {
    mime.essence_str().eq_ignore_ascii_case(media)
}

/// Whether the range is `*/*`.
#[must_use]
pub fn is_any(range: &Mime) -> bool {
    range.type_() == mime::STAR
}

/// Whether the range (`*/*`, `type/*` or exact) covers `media`.
#[must_use]
pub fn covers(range: &Mime, media: &str) -> bool {
    if is_any(range) {
        return true;
    }
    if range.subtype() == mime::STAR {
        return media
            .split_once('/')
            .is_some_and(|(t, _)| t.eq_ignore_ascii_case(range.type_().as_str()));
    }
    names(range, media)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers(name: http::HeaderName, value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_accepted_ignores_parameters() {
        let headers = headers(ACCEPT, "text/html;q=0.9, application/json; charset=utf-8, bogus");
        let ranges = accepted(&headers);
        assert_eq!(ranges.len(), 2);
        assert!(names(&ranges[1], "application/json"));
    }

    #[test]
    fn test_content_type() {
        let headers = headers(CONTENT_TYPE, "application/json; charset=utf-8");
        let mime = content_type(&headers).unwrap();
        assert!(names(&mime, "application/json"));
        assert!(content_type(&HeaderMap::new()).is_none());
    }

    #[test]
    fn test_covers() {
        let any: Mime = "*/*".parse().unwrap();
        let text: Mime = "text/*".parse().unwrap();
        let json: Mime = "application/json".parse().unwrap();

        assert!(is_any(&any));
        assert!(covers(&any, "application/ld+json"));
        assert!(covers(&text, "text/plain"));
        assert!(!covers(&text, "application/json"));
        assert!(covers(&json, "application/json"));
        assert!(!covers(&json, "application/ld+json"));
    }
}
