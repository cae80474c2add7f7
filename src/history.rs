/// Syntax metadata captured alongside a clip, used by the host when it
/// renders previews. `preview_lang` is the code-fence tag for popups and is
/// empty when no supported syntax matched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipSyntax {
    pub syntax: String,
    pub color_scheme: String,
    pub preview_lang: String,
}

/// One recorded clipboard value. Entries are immutable once stored;
/// replacing content means removing and reinserting.
#[derive(Debug, Clone)]
pub struct ClipEntry {
    pub text: String,
    pub syntax: ClipSyntax,
}

impl ClipEntry {
    pub fn new(text: String, syntax: ClipSyntax) -> Self {
        Self { text, syntax }
    }
}

pub const DEFAULT_MAX_CLIPS: usize = 256;

/// Ordered clip storage, most recent first, with an explicit cursor.
///
/// Backs both the main history and the yank stack. The cursor always
/// satisfies `index < len()` while the history is non-empty; callers read
/// it through `current_index()`, which is `None` on an empty history.
///
/// Cursor-moving operations return the now-current entry so the caller can
/// mirror it to the live clipboard; this struct itself never touches the
/// clipboard.
pub struct ClipHistory {
    entries: Vec<ClipEntry>,
    index: usize,
    max_clips: usize,
}

impl ClipHistory {
    pub fn new(max_clips: usize) -> Self {
        Self {
            entries: Vec::new(),
            index: 0,
            max_clips: max_clips.max(1),
        }
    }

    /// Record `text` at the front of the history.
    ///
    /// A no-op when `text` equals the entry under the cursor, so that a
    /// clipboard readback of a value we just set never re-inserts it.
    /// When duplicates are disallowed, an equal payload elsewhere in the
    /// history is removed first, keeping only the newest copy. Returns
    /// whether an entry was inserted.
    pub fn append(&mut self, text: &str, syntax: ClipSyntax, allow_duplicates: bool) -> bool {
        if let Some(current) = self.entries.get(self.index) {
            if current.text == text {
                return false;
            }
        }

        if !allow_duplicates {
            if let Some(pos) = self.entries.iter().position(|e| e.text == text) {
                self.entries.remove(pos);
            }
        }

        self.entries.insert(0, ClipEntry::new(text.to_string(), syntax));
        self.index = 0;

        if self.entries.len() > self.max_clips {
            self.entries.truncate(self.max_clips);
        }
        true
    }

    pub fn current(&self) -> Option<&ClipEntry> {
        self.entries.get(self.index)
    }

    pub fn current_index(&self) -> Option<usize> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.index)
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_clips(&self) -> usize {
        self.max_clips
    }

    pub fn set_max_clips(&mut self, max_clips: usize) {
        self.max_clips = max_clips.max(1);
        if self.entries.len() > self.max_clips {
            self.entries.truncate(self.max_clips);
            self.clamp_index();
        }
    }

    /// Move the cursor to `index`, clamping to the newest entry when the
    /// index is past the end.
    pub fn select_at(&mut self, index: usize) -> Option<&ClipEntry> {
        if !self.entries.is_empty() {
            self.index = if index < self.entries.len() { index } else { 0 };
        }
        self.current()
    }

    /// Move the cursor one step toward the newest entry.
    pub fn select_next(&mut self) -> Option<&ClipEntry> {
        if self.index > 0 {
            self.index -= 1;
        }
        self.current()
    }

    /// Move the cursor one step toward the oldest entry.
    pub fn select_previous(&mut self) -> Option<&ClipEntry> {
        if self.index + 1 < self.entries.len() {
            self.index += 1;
        }
        self.current()
    }

    /// Jump to the oldest entry, the one inserted first.
    pub fn select_oldest(&mut self) -> Option<&ClipEntry> {
        if !self.entries.is_empty() {
            self.index = self.entries.len() - 1;
        }
        self.current()
    }

    /// Jump to the newest entry.
    pub fn select_newest(&mut self) -> Option<&ClipEntry> {
        self.index = 0;
        self.current()
    }

    pub fn remove_at(&mut self, index: usize) -> Option<ClipEntry> {
        if index < self.entries.len() {
            let removed = self.entries.remove(index);
            self.clamp_index();
            Some(removed)
        } else {
            None
        }
    }

    /// Remove the first entry whose payload equals `text`. Used by the
    /// pop-consume protocol, which locates the pasted clip by content.
    pub fn remove_payload(&mut self, text: &str) -> bool {
        if let Some(pos) = self.entries.iter().position(|e| e.text == text) {
            self.entries.remove(pos);
            self.clamp_index();
            true
        } else {
            false
        }
    }

    /// Apply `f` to every payload, replacing entries for which it returns a
    /// new value. Returns how many entries were rewritten.
    pub fn rewrite_payloads<F>(&mut self, f: F) -> usize
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut rewritten = 0;
        for i in 0..self.entries.len() {
            if let Some(new_text) = f(&self.entries[i].text) {
                let syntax = self.entries[i].syntax.clone();
                self.entries[i] = ClipEntry::new(new_text, syntax);
                rewritten += 1;
            }
        }
        rewritten
    }

    /// Discard all entries and reset the cursor.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.index = 0;
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ClipEntry> {
        self.entries.iter()
    }

    fn clamp_index(&mut self) {
        if self.entries.is_empty() {
            self.index = 0;
        } else if self.index >= self.entries.len() {
            self.index = self.entries.len() - 1;
        }
    }
}

impl Default for ClipHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CLIPS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn append(history: &mut ClipHistory, text: &str) -> bool {
        history.append(text, ClipSyntax::default(), false)
    }

    fn payloads(history: &ClipHistory) -> Vec<&str> {
        history.iter().map(|e| e.text.as_str()).collect()
    }

    #[test]
    fn test_append_newest_first() {
        let mut history = ClipHistory::default();
        append(&mut history, "a");
        append(&mut history, "b");
        assert_eq!(payloads(&history), vec!["b", "a"]);
        assert_eq!(history.current_index(), Some(0));
        assert_eq!(history.current().unwrap().text, "b");
    }

    #[test]
    fn test_self_repeat_is_noop() {
        let mut history = ClipHistory::default();
        assert!(append(&mut history, "a"));
        assert!(!append(&mut history, "a"));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_self_repeat_checks_cursor_not_head() {
        let mut history = ClipHistory::default();
        append(&mut history, "a");
        append(&mut history, "b");
        history.select_previous(); // cursor on "a"
        // "a" equals the entry under the cursor, so nothing happens
        assert!(!append(&mut history, "a"));
        assert_eq!(payloads(&history), vec!["b", "a"]);
    }

    #[test]
    fn test_duplicate_relocated_to_front() {
        let mut history = ClipHistory::default();
        append(&mut history, "a");
        append(&mut history, "b");
        append(&mut history, "a");
        assert_eq!(payloads(&history), vec!["a", "b"]);
        assert_eq!(history.current_index(), Some(0));
        assert_eq!(history.current().unwrap().text, "a");
    }

    #[test]
    fn test_duplicates_kept_when_allowed() {
        let mut history = ClipHistory::default();
        history.append("a", ClipSyntax::default(), true);
        history.append("b", ClipSyntax::default(), true);
        history.append("a", ClipSyntax::default(), true);
        assert_eq!(payloads(&history), vec!["a", "b", "a"]);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = ClipHistory::new(2);
        append(&mut history, "a");
        append(&mut history, "b");
        append(&mut history, "c");
        assert_eq!(payloads(&history), vec!["c", "b"]);
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut history = ClipHistory::default();
        append(&mut history, "a");
        append(&mut history, "b");
        append(&mut history, "c");

        // next at the newest entry is a no-op
        history.select_newest();
        history.select_next();
        assert_eq!(history.current_index(), Some(0));

        // previous at the oldest entry is a no-op
        history.select_oldest();
        history.select_previous();
        assert_eq!(history.current_index(), Some(2));
    }

    #[test]
    fn test_oldest_and_newest() {
        let mut history = ClipHistory::default();
        append(&mut history, "a");
        append(&mut history, "b");
        assert_eq!(history.select_oldest().unwrap().text, "a");
        assert_eq!(history.current_index(), Some(1));
        assert_eq!(history.select_newest().unwrap().text, "b");
        assert_eq!(history.current_index(), Some(0));
    }

    #[test]
    fn test_empty_history_sentinels() {
        let mut history = ClipHistory::default();
        assert!(history.current().is_none());
        assert!(history.current_index().is_none());
        assert!(history.select_oldest().is_none());
        assert!(history.select_newest().is_none());
        assert!(history.select_at(3).is_none());
    }

    #[test]
    fn test_select_at_clamps_high_index() {
        let mut history = ClipHistory::default();
        append(&mut history, "a");
        append(&mut history, "b");
        assert_eq!(history.select_at(99).unwrap().text, "b");
        assert_eq!(history.current_index(), Some(0));
    }

    #[test]
    fn test_remove_at_clamps_cursor() {
        let mut history = ClipHistory::default();
        append(&mut history, "a");
        append(&mut history, "b");
        append(&mut history, "c");
        history.select_oldest(); // cursor on "a"

        let removed = history.remove_at(2).unwrap();
        assert_eq!(removed.text, "a");
        assert_eq!(history.current_index(), Some(1));
        assert_eq!(history.current().unwrap().text, "b");

        assert!(history.remove_at(5).is_none());
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_remove_payload_clamps_cursor() {
        let mut history = ClipHistory::default();
        append(&mut history, "a");
        append(&mut history, "b");
        history.select_oldest(); // cursor on "a"
        assert!(history.remove_payload("a"));
        assert_eq!(history.current_index(), Some(0));
        assert_eq!(history.current().unwrap().text, "b");
        assert!(!history.remove_payload("a"));
    }

    #[test]
    fn test_reset_discards_everything() {
        let mut history = ClipHistory::default();
        append(&mut history, "a");
        append(&mut history, "b");
        history.reset();
        assert!(history.is_empty());
        assert!(history.current_index().is_none());
    }

    #[test]
    fn test_rewrite_payloads() {
        let mut history = ClipHistory::default();
        append(&mut history, "keep");
        append(&mut history, "edit me");
        let changed = history.rewrite_payloads(|text| {
            text.strip_prefix("edit ").map(str::to_string)
        });
        assert_eq!(changed, 1);
        assert_eq!(payloads(&history), vec!["me", "keep"]);
    }

    #[test]
    fn test_capacity_has_a_floor_of_one() {
        let mut history = ClipHistory::new(0);
        assert_eq!(history.max_clips(), 1);
        append(&mut history, "a");
        append(&mut history, "b");
        assert_eq!(payloads(&history), vec!["b"]);

        history.set_max_clips(0);
        assert_eq!(history.max_clips(), 1);
    }

    #[test]
    fn test_shrinking_capacity_truncates() {
        let mut history = ClipHistory::new(4);
        for text in ["a", "b", "c", "d"] {
            append(&mut history, text);
        }
        history.select_oldest();
        history.set_max_clips(2);
        assert_eq!(payloads(&history), vec!["d", "c"]);
        assert_eq!(history.current_index(), Some(1));
    }
}
