/// Origin of the original hosted deployment; used when neither an override
/// nor a stored value is available.
pub const DEFAULT_BACKEND_URL: &str = "https://screenshot-to-code-api-production.up.railway.app";

/// Strip surrounding whitespace and any trailing slash so endpoint paths can
/// be appended directly.
pub fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

/// Resolve the effective backend origin.
///
/// Priority: explicit override (the `--api` flag) > previously stored value >
/// built-in default. Blank candidates are skipped.
pub fn resolve_base_url(
    override_value: Option<&str>,
    stored: Option<&str>,
    default_value: &str,
) -> String {
    for candidate in [override_value, stored] {
        if let Some(value) = candidate {
            if !value.trim().is_empty() {
                return value.trim().to_string();
            }
        }
    }
    default_value.to_string()
}
