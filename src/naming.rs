//! Turning titles scraped off the site into URL slugs, directory names and
//! tidy chapter names.

/// Characters Windows refuses in file names.
const FORBIDDEN: &[char] = &['\\', '/', ':', '*', '?', '<', '>', '|'];

/// The search page expects `some_manga_title`: anything that is not
/// alphanumeric separates words.
pub fn url_slug(query: &str) -> String {
    query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Makes a title safe to use as a file or directory name.
pub fn sanitize(name: &str) -> String {
    let kept: String = name.chars().filter(|c| !FORBIDDEN.contains(c)).collect();
    kept.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace("...", "…")
        .trim_end_matches('.')
        .to_string()
}

/// Drops the run of leading words every title shares and capitalizes what is
/// left, so `["Solo Leveling Chapter 1", "Solo Leveling Chapter 2"]` becomes
/// `["1", "2"]`.
///
/// Words are compared whole. At least one word of every title is always
/// kept.
pub fn strip_common_prefix<S: AsRef<str>>(titles: &[S]) -> Vec<String> {
    let words: Vec<Vec<&str>> = titles
        .iter()
        .map(|title| title.as_ref().split_whitespace().collect())
        .collect();

    let Some(first) = words.first() else {
        return Vec::new();
    };
    let shortest = words.iter().map(Vec::len).min().unwrap_or(0);
    let common = (0..shortest)
        .take_while(|&i| words.iter().all(|title| title[i] == first[i]))
        .count();
    let strip = common.min(shortest.saturating_sub(1));

    words
        .iter()
        .map(|title| capitalize(&title[strip..].join(" ")))
        .collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
