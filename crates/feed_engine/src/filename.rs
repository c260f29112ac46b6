use sha2::{Digest, Sha256};

const MAX_STEM_LEN: usize = 60;

/// Filesystem-safe, deterministic export name: `{sanitized_query}--{short_hash(query)}.json`.
///
/// The hash keeps queries that sanitize to the same stem apart.
pub fn export_filename(query: &str) -> String {
    let stem = sanitize_query(query);
    let hash = short_hash(query.trim());
    format!("{stem}--{hash}.json")
}

fn sanitize_query(input: &str) -> String {
    let mut stem = String::with_capacity(input.len());
    let mut prev_dash = true;
    for c in input.trim().chars() {
        if c.is_alphanumeric() {
            stem.extend(c.to_lowercase());
            prev_dash = false;
        } else if !prev_dash {
            stem.push('-');
            prev_dash = true;
        }
    }
    while stem.ends_with('-') {
        stem.pop();
    }
    if stem.chars().count() > MAX_STEM_LEN {
        stem = stem.chars().take(MAX_STEM_LEN).collect();
        while stem.ends_with('-') {
            stem.pop();
        }
    }
    if stem.is_empty() {
        stem = "listings".to_string();
    }
    stem
}

fn short_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let mut hex = String::with_capacity(8);
    for byte in digest.iter().take(4) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
