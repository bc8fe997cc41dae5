//! Collision-free remote names.
//!
//! The counter goes right after the base name (everything before the first `.`); the remaining
//! dot-separated suffixes are kept verbatim, so `report.tar.gz` becomes `report(1).tar.gz`.

/// Returns the file name to try on attempt `attempt`.
///
/// Only the final path component of `logical_name` is kept. Attempt 0 returns it unchanged.
/// No upper bound is enforced here; the caller owns the attempt ceiling.
pub fn resolve(logical_name: &str, attempt: u32) -> String {
    let file_name = logical_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(logical_name);

    if attempt == 0 {
        return file_name.to_string();
    }

    match file_name.split_once('.') {
        Some((base, suffix)) => format!("{base}({attempt}).{suffix}"),
        None => format!("{file_name}({attempt})"),
    }
}

/// Joins `dir` with [`resolve`]d name: `{dir}/{base}({n}).{ext}`.
pub fn remote_path(dir: &str, logical_name: &str, attempt: u32) -> String {
    let name = resolve(logical_name, attempt);
    let dir = dir.trim_end_matches('/');
    if dir.is_empty() {
        name
    } else {
        format!("{dir}/{name}")
    }
}

/// One candidate target of an upload. Derived per attempt, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget<'a> {
    pub logical_name: &'a str,
    pub collision_index: u32,
}

impl<'a> UploadTarget<'a> {
    pub fn new(logical_name: &'a str, collision_index: u32) -> Self {
        Self {
            logical_name,
            collision_index,
        }
    }

    pub fn path(&self, dir: &str) -> String {
        remote_path(dir, self.logical_name, self.collision_index)
    }
}
