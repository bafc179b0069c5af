//! Non-persisting submission previews
//!
//! Best-effort, synchronous feedback shown before a submission goes out.
//! Has no effect on job state and never fails: malformed input produces a
//! fallback message instead of an error.

use url::Url;

use tf_domain::SearchKind;

use crate::input::JobInput;

/// Maximum keywords shown for a text submission
const MAX_KEYWORDS: usize = 6;

/// Words carrying no search signal
const STOP_WORDS: &[&str] = &[
    "and", "the", "with", "for", "from", "that", "this", "years", "und", "mit", "von", "für",
];

/// Human-readable summary of what a submission will search for
#[must_use]
pub fn preview(kind: SearchKind, input: &JobInput) -> String {
    match input {
        JobInput::Text(text) => text_preview(kind, text),
        JobInput::Website(url) => website_preview(kind, url),
        JobInput::Pdf { filename, bytes } => pdf_preview(kind, filename, bytes.len()),
    }
}

fn text_preview(kind: SearchKind, text: &str) -> String {
    let keywords: Vec<&str> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| word.len() > 2)
        .filter(|word| {
            let lower = word.to_lowercase();
            !STOP_WORDS.contains(&lower.as_str())
        })
        .take(MAX_KEYWORDS)
        .collect();

    if keywords.is_empty() {
        format!("{} search from pasted text", audience(kind))
    } else {
        format!("{} search for: {}", audience(kind), keywords.join(", "))
    }
}

fn website_preview(kind: SearchKind, raw: &str) -> String {
    match website_host(raw) {
        Some(host) => format!("{} search across {host}", audience(kind)),
        None => "unrecognized web address".to_string(),
    }
}

/// Extract the host, tolerating a missing scheme
fn website_host(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.contains(char::is_whitespace) {
        return None;
    }
    let parsed = Url::parse(trimmed)
        .ok()
        .or_else(|| Url::parse(&format!("https://{trimmed}")).ok())?;
    parsed.host_str().map(str::to_string)
}

fn pdf_preview(kind: SearchKind, filename: &str, size: usize) -> String {
    format!(
        "{} search from {filename} ({})",
        audience(kind),
        human_size(size)
    )
}

fn human_size(bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    let size = bytes as f64;
    if size >= KIB * KIB {
        format!("{:.1} MB", size / (KIB * KIB))
    } else if size >= KIB {
        format!("{:.1} KB", size / KIB)
    } else {
        format!("{bytes} B")
    }
}

fn audience(kind: SearchKind) -> &'static str {
    match kind {
        SearchKind::Recruiting => "candidate",
        SearchKind::LeadGeneration => "lead",
    }
}
