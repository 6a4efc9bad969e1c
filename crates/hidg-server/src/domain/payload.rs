//! How a request carries its text, and how that text should be typed.

/// Where the text of a `/write/*` request lives.
///
/// Resolved once from the `Content-Type` header before any typing happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadSource {
    /// `text/plain`: the body itself is the text.
    RawBody,
    /// `application/x-www-form-urlencoded`: the `text` form field.
    FormField,
}

impl PayloadSource {
    /// Name of the form field that holds the text.
    pub const FORM_FIELD: &'static str = "text";

    /// Classifies a `Content-Type` header value.
    ///
    /// Parameters (`; charset=utf-8`) and case are ignored.  Returns `None` for
    /// any other media type.
    pub fn from_content_type(value: &str) -> Option<Self> {
        let media_type = value.split(';').next().unwrap_or_default().trim();
        if media_type.eq_ignore_ascii_case("text/plain") {
            Some(PayloadSource::RawBody)
        } else if media_type.eq_ignore_ascii_case("application/x-www-form-urlencoded") {
            Some(PayloadSource::FormField)
        } else {
            None
        }
    }
}

/// Which writer operation a request uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// Back-to-back reports (`type_text`).
    Unpaced,
    /// Stroke delay after every report (`type_text_delayed`).
    Paced,
}
