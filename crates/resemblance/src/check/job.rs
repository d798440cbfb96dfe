/// One id to check: `current/<id>.png` against `reference/<id>.png`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckJob {
    pub id: String,
}

impl CheckJob {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Device scale encoded in the file name, `@2x` / `@3x` style. Defaults to 1.
    pub fn scale(&self) -> f32 {
        let name = self.id.rsplit('/').next().unwrap_or(&self.id);
        name.rsplit_once('@')
            .and_then(|(_, suffix)| suffix.strip_suffix('x'))
            .and_then(|n| n.parse::<f32>().ok())
            .filter(|s| s.is_finite() && *s > 0.0)
            .unwrap_or(1.0)
    }

    /// Match a glob pattern against the id, with or without the `.png` extension.
    pub fn matches_filter(&self, pattern: &glob::Pattern) -> bool {
        pattern.matches(&self.id) || pattern.matches(&format!("{}.png", self.id))
    }
}
