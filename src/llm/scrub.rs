use std::borrow::Cow;

const MAX_API_ERROR_CHARS: usize = 200;
const REDACTED: &str = "[REDACTED]";

/// Token prefixes issued by the services we talk to (Google, GitHub).
const TOKEN_PREFIXES: [&str; 8] = [
    "AIza",
    "ya29.",
    "ghp_",
    "gho_",
    "ghu_",
    "ghs_",
    "github_pat_",
    "eyJ",
];

/// Markers whose following value is a credential.
const VALUE_MARKERS: [&str; 8] = [
    "key=",
    "access_token=",
    "Authorization: Bearer ",
    "authorization: bearer ",
    "Bearer ",
    "\"api_key\":\"",
    "\"token\":\"",
    "\"access_token\":\"",
];

fn is_secret_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '+' | '/' | '=')
}

/// Byte index just past the credential that starts at `from`.
fn secret_end(input: &str, from: usize) -> usize {
    input[from..]
        .char_indices()
        .find(|&(_, c)| !is_secret_char(c))
        .map_or(input.len(), |(i, _)| from + i)
}

/// Redact every value following `marker`. With `keep_marker` the marker
/// itself survives (`key=[REDACTED]`); otherwise it is part of the secret.
fn redact_after(text: &mut String, marker: &str, keep_marker: bool) {
    let mut cursor = 0;
    while let Some(rel) = text[cursor..].find(marker) {
        let start = cursor + rel;
        let value_start = start + marker.len();
        let end = secret_end(text, value_start);
        if end == value_start {
            cursor = value_start;
            continue;
        }
        let replace_from = if keep_marker { value_start } else { start };
        text.replace_range(replace_from..end, REDACTED);
        cursor = replace_from + REDACTED.len();
    }
}

/// Remove API keys and tokens from text that may leave the process
/// (error bodies, request URLs, log lines).
pub fn scrub_secret_patterns(input: &str) -> Cow<'_, str> {
    let suspicious = TOKEN_PREFIXES
        .iter()
        .chain(VALUE_MARKERS.iter())
        .any(|p| input.contains(p));
    if !suspicious {
        return Cow::Borrowed(input);
    }

    let mut scrubbed = input.to_string();
    for marker in VALUE_MARKERS {
        redact_after(&mut scrubbed, marker, true);
    }
    for prefix in TOKEN_PREFIXES {
        redact_after(&mut scrubbed, prefix, false);
    }
    Cow::Owned(scrubbed)
}

/// Scrub and truncate an upstream error body for display.
pub fn sanitize_api_error(input: &str) -> String {
    let scrubbed = scrub_secret_patterns(input.trim());
    match scrubbed.char_indices().nth(MAX_API_ERROR_CHARS) {
        Some((cut, _)) => format!("{}...", &scrubbed[..cut]),
        None => scrubbed.into_owned(),
    }
}
