use url::Url;

/// Artifact name for a compiled `.gui` upload: the source stem with a
/// case-insensitive `.gui` suffix replaced by `.html`, `output.html` when the
/// stem is empty.
pub fn compiled_artifact_name(source_name: &str) -> String {
    let stem = sanitize(strip_suffix_ci(source_name, ".gui"));
    if stem.is_empty() {
        "output.html".to_string()
    } else {
        format!("{stem}.html")
    }
}

/// Artifact name for a fetched site: `{hostname}.html`, or `site.html` when
/// the input does not parse as a URL.
pub fn site_artifact_name(site_url: &str) -> String {
    let host = Url::parse(site_url.trim())
        .ok()
        .and_then(|parsed| parsed.host_str().map(ToOwned::to_owned))
        .filter(|host| !host.is_empty());
    match host {
        Some(host) => format!("{}.html", sanitize(&host)),
        None => "site.html".to_string(),
    }
}

/// Artifact names for an image-to-gui generation: the image stem
/// (case-insensitive `.png`/`.jpg`/`.jpeg` stripped) suffixed `.html` and
/// `.gui` respectively.
pub fn image_artifact_names(image_name: &str) -> (String, String) {
    let mut stem = image_name;
    for ext in [".png", ".jpg", ".jpeg"] {
        let stripped = strip_suffix_ci(stem, ext);
        if stripped.len() != stem.len() {
            stem = stripped;
            break;
        }
    }
    let mut stem = sanitize(stem);
    if stem.is_empty() {
        stem = "output".to_string();
    }
    (format!("{stem}.html"), format!("{stem}.gui"))
}

fn strip_suffix_ci<'a>(name: &'a str, suffix: &str) -> &'a str {
    if name.len() >= suffix.len() {
        let idx = name.len() - suffix.len();
        if name.is_char_boundary(idx) {
            let (stem, tail) = name.split_at(idx);
            if tail.eq_ignore_ascii_case(suffix) {
                return stem;
            }
        }
    }
    name
}

/// Windows-safe filename stem: forbidden characters replaced, surrounding
/// junk trimmed, reserved device names patched.
fn sanitize(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let mut cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]).to_string();
    if is_reserved_windows_name(&cleaned) {
        cleaned.push('_');
    }
    cleaned
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}
