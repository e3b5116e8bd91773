//! Extension filter normalization.

/// Ordered list of normalized extensions, each starting with `.`.
///
/// Entries are never empty. Duplicates are kept; matching is membership only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionSet(Vec<String>);

impl ExtensionSet {
    /// Normalize a whitespace-separated filter such as `"jpg .png"`.
    ///
    /// Tokens without a leading dot get one; empty tokens are dropped.
    /// No case folding is applied.
    pub fn normalize(raw: &str) -> Self {
        let exts = raw
            .split_whitespace()
            .map(|token| {
                if token.starts_with('.') {
                    token.to_string()
                } else {
                    format!(".{token}")
                }
            })
            .collect();
        Self(exts)
    }

    /// Whether `ext` (including its leading dot) is in the set.
    pub fn matches(&self, ext: &str) -> bool {
        self.0.iter().any(|e| e == ext)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl std::fmt::Display for ExtensionSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}
