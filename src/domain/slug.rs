// Filename derivation from dashboard titles

const FALLBACK_STEM: &str = "dashboard";
const SEPARATOR: char = '-';

/// Lower-cases `text` and collapses every run of non-alphanumeric
/// characters into a single `-`. Returns an empty string for degenerate input.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;

    // Classify after lower-casing: some letters lower-case into a base
    // letter plus a combining mark, e.g. 'İ' -> "i\u{307}".
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push(SEPARATOR);
            }
            pending_separator = false;
            slug.push(c);
        } else {
            pending_separator = true;
        }
    }

    slug
}

/// Target filename for a dashboard title, e.g. "CPU Usage" -> "cpu-usage.json".
pub fn derive_filename(title: &str) -> String {
    let slug = slugify(title);
    if slug.is_empty() {
        format!("{}.json", FALLBACK_STEM)
    } else {
        format!("{}.json", slug)
    }
}

/// Directory name for a folder title.
pub fn derive_dirname(folder_title: &str) -> String {
    let slug = slugify(folder_title);
    if slug.is_empty() {
        slugify(super::dashboard::GENERAL_FOLDER)
    } else {
        slug
    }
}

/// Filename used when the plain slug is already claimed by another dashboard.
pub fn disambiguated_filename(title: &str, uid: &str) -> String {
    let stem = derive_filename(title);
    let stem = stem.trim_end_matches(".json");
    let suffix = slugify(uid);
    if suffix.is_empty() {
        format!("{}.json", stem)
    } else {
        format!("{}-{}.json", stem, suffix)
    }
}
