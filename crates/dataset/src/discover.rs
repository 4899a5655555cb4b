use std::path::{Path, PathBuf};

/// Searched in order; the first pattern that matches anything wins.
pub const DEFAULT_PATTERNS: &[&str] = &[
    "budget-assistant-*.jsonl",
    "personal/personal-*.jsonl",
    "combined.jsonl",
];

pub const FALLBACK_FILE: &str = "budget-assistant-latest.jsonl";

/// Pick the most recent training file under `base_dir`.
///
/// Exports are date-stamped, so the lexicographically greatest match of the
/// first matching pattern is the newest one. Falls back to
/// [`FALLBACK_FILE`], which may not exist.
pub fn find_latest_training_file(base_dir: impl AsRef<Path>) -> PathBuf {
    find_latest_matching(base_dir.as_ref(), DEFAULT_PATTERNS)
        .unwrap_or_else(|| base_dir.as_ref().join(FALLBACK_FILE))
}

/// Same as [`find_latest_training_file`], relative to the working directory.
pub fn default_training_file() -> PathBuf {
    find_latest_training_file(Path::new(""))
}

pub fn find_latest_matching(base_dir: &Path, patterns: &[&str]) -> Option<PathBuf> {
    let escaped_base = PathBuf::from(glob::Pattern::escape(&base_dir.to_string_lossy()));
    for pattern in patterns {
        let glob_pattern = escaped_base.join(pattern);
        let Ok(matched) = glob::glob(&glob_pattern.to_string_lossy()) else {
            continue;
        };

        let mut files: Vec<PathBuf> = matched.flatten().filter(|p| p.is_file()).collect();
        files.sort();
        if let Some(latest) = files.pop() {
            log::debug!("Found training file {:?} for pattern {}", latest, pattern);
            return Some(latest);
        }
    }
    None
}
