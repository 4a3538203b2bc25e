/// Snapshot of an input at one keystroke. Ephemeral, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionContext {
    text: String,
    cursor: usize,
}

impl SuggestionContext {
    /// `cursor` is a character offset; out-of-bounds values clamp to the end
    /// rather than panic.
    pub fn new(text: impl Into<String>, cursor: usize) -> Self {
        let text = text.into();
        let cursor = cursor.min(text.chars().count());
        Self { text, cursor }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The query a provider matches against: text up to the cursor, trimmed.
    pub fn query(&self) -> String {
        self.text
            .chars()
            .take(self.cursor)
            .collect::<String>()
            .trim()
            .to_string()
    }
}
