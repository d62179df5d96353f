//! Editing of `;`-separated search path values.
//!
//! Segments compare trimmed and case-insensitively. Empty segments are
//! dropped whenever a value is rebuilt, so no `;;` or dangling `;` survives
//! an edit.

pub fn split_path(path: &str) -> Vec<String> {
    path.split(';')
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

pub fn join_path(parts: &[String]) -> String {
    parts.join(";")
}

/// Drops every segment equal to `target`. Removing an absent target only
/// normalizes separators.
pub fn remove(path: &str, target: &str) -> String {
    let target = target.trim().to_lowercase();
    let kept: Vec<String> = split_path(path)
        .into_iter()
        .filter(|part| part.to_lowercase() != target)
        .collect();
    join_path(&kept)
}

/// Puts `segment` in front. Does not deduplicate; `remove` the stale entry first.
pub fn prepend(path: &str, segment: &str) -> String {
    let segment = segment.trim();
    if path.trim().is_empty() {
        segment.to_string()
    } else {
        format!("{segment};{path}")
    }
}

/// `<home>\bin`, or `None` for an empty home.
pub fn bin_dir(home: &str) -> Option<String> {
    let home = home.trim().trim_end_matches(['\\', '/']);
    if home.is_empty() {
        None
    } else {
        Some(format!(r"{home}\bin"))
    }
}

/// True when the value contains a `%NAME%` token and must be stored expandable.
pub fn has_env_token(value: &str) -> bool {
    let chars: Vec<char> = value.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '%' {
            let mut j = i + 1;
            while j < chars.len() && chars[j] != '%' {
                j += 1;
            }
            if j < chars.len() && j > i + 1 {
                return true;
            }
        }
        i += 1;
    }
    false
}
