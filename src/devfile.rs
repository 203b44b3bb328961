/// File names recognised as a devfile, matched case-sensitively.
pub const DEVFILE_NAMES: [&str; 4] = [
    "devfile.yaml",
    "devfile.yml",
    ".devfile.yaml",
    ".devfile.yml",
];

/// True if the last `/`-separated segment of `path` (a filesystem path or a
/// URL) is one of [`DEVFILE_NAMES`].
pub fn looks_like_devfile_path(path: &str) -> bool {
    let leaf = path.rsplit('/').next().unwrap_or(path);
    DEVFILE_NAMES.contains(&leaf)
}
