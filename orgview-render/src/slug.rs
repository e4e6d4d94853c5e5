//! Heading anchor slugs.

use std::collections::HashMap;

/// Generate a GitHub-style slug from heading text.
///
/// Lowercases, turns whitespace, `-` and `_` into single hyphens and drops other
/// punctuation. Letters outside ASCII are kept.
pub fn slugify(text: &str) -> String {
    text.chars()
        .filter_map(|c| {
            if c.is_alphanumeric() {
                Some(c.to_lowercase().next().unwrap_or(c))
            } else if c.is_whitespace() || c == '-' || c == '_' {
                Some('-')
            } else {
                None
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Hands out unique ids: repeated slugs get `-2`, `-3`, ... suffixes.
#[derive(Debug, Default)]
pub struct SlugRegistry {
    seen: HashMap<String, usize>,
}

impl SlugRegistry {
    pub fn unique(&mut self, text: &str) -> String {
        let mut base = slugify(text);
        if base.is_empty() {
            base = "section".to_string();
        }
        let count = self.seen.entry(base.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            base
        } else {
            let candidate = format!("{base}-{count}");
            self.seen.insert(candidate.clone(), 1);
            candidate
        }
    }
}
