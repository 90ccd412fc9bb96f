/// Sanitizes a client-supplied path: backslashes become '/' and surrounding
/// whitespace is dropped.
pub fn sanitize_input(input: &str) -> String {
    input.trim().replace('\\', "/")
}

/// Collapses a logical path into its canonical absolute form.
///
/// Empty and `.` segments are dropped and `..` pops a segment, never climbing
/// above `/`. The result always starts with `/` and never ends with one
/// (except for the root itself).
pub fn normalize_path(path: &str) -> String {
    let sanitized = sanitize_input(path);
    let mut segments: Vec<&str> = Vec::new();

    for segment in sanitized.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    format!("/{}", segments.join("/"))
}

/// Resolves `arg` relative to `current_dir`. Absolute arguments replace it.
pub fn resolve_path(current_dir: &str, arg: &str) -> String {
    let arg = sanitize_input(arg);
    if arg.starts_with('/') {
        normalize_path(&arg)
    } else {
        normalize_path(&format!("{}/{}", current_dir, arg))
    }
}

/// Logical parent of `path`, or `None` when `path` is already the root.
pub fn parent_path(path: &str) -> Option<String> {
    let normalized = normalize_path(path);
    if normalized == "/" {
        return None;
    }
    match normalized.rfind('/') {
        Some(0) | None => Some(String::from("/")),
        Some(idx) => Some(normalized[..idx].to_string()),
    }
}
