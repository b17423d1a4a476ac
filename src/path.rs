//! Route path composition.
//!
//! Paths are normalized to one leading `/`, no trailing `/` and no empty
//! segments. Template placeholders are copied verbatim, including any `/`
//! that appears inside braces (`{path: .+/.+}`).

/// Composes root and operation path markers into canonical route paths.
pub struct PathResolver;

impl PathResolver {
    /// Normalizes a root path marker. `""` and `"/"` both become `"/"`.
    pub fn resolve_root(root: &str) -> String {
        normalize(root)
    }

    /// Composes an operation path with an already resolved root.
    ///
    /// | operation | root | result |
    /// |---|---|---|
    /// | `Some("/b")` | `Some("/a")` | `Some("/a/b")` |
    /// | `Some("/b")` | `None` | `Some("/b")` |
    /// | `None` | `Some("/a")` | `Some("/a")` (unchanged) |
    /// | `None` | `None` | `None`, bus-only |
    ///
    /// An empty root counts as absent.
    pub fn resolve_method(operation: Option<&str>, root: Option<&str>) -> Option<String> {
        let root = root.filter(|r| !r.trim().is_empty());
        match (operation, root) {
            (Some(path), Some(root)) => Some(normalize(&format!("{root}/{path}"))),
            (Some(path), None) => Some(normalize(path)),
            (None, Some(root)) => Some(root.to_owned()),
            (None, None) => None,
        }
    }
}

fn normalize(raw: &str) -> String {
    let segments = segments(raw.trim());
    if segments.is_empty() {
        return "/".to_owned();
    }
    let mut path = String::with_capacity(raw.len() + 1);
    for segment in segments {
        path.push('/');
        path.push_str(segment);
    }
    path
}

/// Splits on `/` outside of `{...}`, dropping empty segments.
fn segments(raw: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in raw.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '/' if depth == 0 => {
                if i > start {
                    out.push(&raw[start..i]);
                }
                start = i + 1;
            }
            _ => {}
        }
    }
    if start < raw.len() {
        out.push(&raw[start..]);
    }
    out
}
