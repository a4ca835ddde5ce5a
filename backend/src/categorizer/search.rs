use crate::task::Task;

/// Free-text filter over title and note.
///
/// Matching is a case-insensitive literal substring test. Characters that
/// carry meaning in pattern syntaxes (`.`, `*`, `(`, `\` ...) are plain text
/// here. A blank query matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    needle: Option<String>,
}

impl SearchQuery {
    pub fn new(raw: Option<&str>) -> Self {
        let needle = raw
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);
        Self { needle }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_none()
    }

    pub fn as_str(&self) -> Option<&str> {
        self.needle.as_deref()
    }

    pub fn matches(&self, task: &Task) -> bool {
        match &self.needle {
            None => true,
            Some(needle) => {
                task.title.to_lowercase().contains(needle.as_str())
                    || task.note.to_lowercase().contains(needle.as_str())
            }
        }
    }
}

impl From<&str> for SearchQuery {
    fn from(raw: &str) -> Self {
        SearchQuery::new(Some(raw))
    }
}
