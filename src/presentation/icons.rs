use indexmap::IndexMap;

/// Key used when a field has no icon or names one the table lacks.
pub const DEFAULT_ICON: &str = "question";

const BUILTIN: &[(&str, &str)] = &[
    ("question", "?"),
    ("text", "¶"),
    ("number", "#"),
    ("percentage", "%"),
    ("calendar", "▦"),
    ("clock", "◷"),
    ("image", "▣"),
    ("link", "↗"),
    ("user", "☺"),
    ("mail", "✉"),
    ("phone", "☎"),
    ("home", "⌂"),
    ("flag", "⚑"),
    ("star", "★"),
    ("heart", "♥"),
    ("check", "✓"),
    ("tag", "⌗"),
    ("info", "ℹ"),
    ("warning", "⚠"),
];

/// Table from `meta.icon` keys to the glyph drawn in field headers.
#[derive(Debug, Clone)]
pub struct IconSet {
    glyphs: IndexMap<String, String>,
}

impl Default for IconSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl IconSet {
    pub fn builtin() -> Self {
        let glyphs = BUILTIN
            .iter()
            .map(|(key, glyph)| (key.to_string(), glyph.to_string()))
            .collect();
        Self { glyphs }
    }

    /// Empty table apart from the default glyph.
    pub fn minimal() -> Self {
        Self::builtin().retain_only(&[DEFAULT_ICON])
    }

    pub fn with_icon(mut self, key: impl Into<String>, glyph: impl Into<String>) -> Self {
        self.glyphs.insert(key.into(), glyph.into());
        self
    }

    fn retain_only(mut self, keys: &[&str]) -> Self {
        self.glyphs.retain(|key, _| keys.contains(&key.as_str()));
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.glyphs.contains_key(key)
    }

    /// Glyph for `key`; missing or unknown keys resolve to the `question`
    /// glyph.
    pub fn resolve(&self, key: Option<&str>) -> &str {
        key.and_then(|key| self.glyphs.get(key))
            .or_else(|| self.glyphs.get(DEFAULT_ICON))
            .map(String::as_str)
            .unwrap_or("?")
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.glyphs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Key `delta` steps away from `current`, wrapping. An unknown current
    /// key starts from the default.
    pub fn cycle(&self, current: Option<&str>, delta: isize) -> Option<&str> {
        if self.glyphs.is_empty() {
            return None;
        }
        let len = self.glyphs.len() as isize;
        let start = current
            .and_then(|key| self.glyphs.get_index_of(key))
            .or_else(|| self.glyphs.get_index_of(DEFAULT_ICON))
            .unwrap_or(0) as isize;
        let next = (start + delta).rem_euclid(len) as usize;
        self.glyphs.get_index(next).map(|(key, _)| key.as_str())
    }
}
