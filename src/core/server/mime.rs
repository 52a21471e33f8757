//! Content-type overrides for the site's data, script and style files.
//!
//! Everything else keeps the type guessed by the static file service.

const OVERRIDES: &[(&str, &str)] = &[
    (".json", "application/json"),
    (".js", "application/javascript"),
    (".css", "text/css"),
];

/// Fixed content type for a request path, or `None` to keep the generic guess.
pub fn content_type_override(uri_path: &str) -> Option<&'static str> {
    OVERRIDES
        .iter()
        .find(|(ext, _)| uri_path.ends_with(ext))
        .map(|(_, content_type)| *content_type)
}
