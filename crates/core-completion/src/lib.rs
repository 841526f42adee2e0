//! Completion engine: provider seam, candidates and the selection model.
//!
//! A provider receives the full buffer text and the cursor as a byte offset
//! into that text, and returns candidates. Each candidate names the byte span
//! of the text it replaces, so a provider can complete a word, a path
//! segment or the whole line.
//!
//! Invariants:
//! * Candidates with an out-of-range or non char-boundary span are dropped.
//! * A `CompletionSet` is never empty and its selection is always valid.

use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Byte span of the buffer text to replace.
    pub span: Range<usize>,
    pub replacement: String,
    /// Label shown in the overlay (defaults to the replacement).
    pub display: String,
    pub help: Option<String>,
}

impl Candidate {
    pub fn new(span: Range<usize>, replacement: impl Into<String>) -> Self {
        let replacement = replacement.into();
        Self {
            span,
            display: replacement.clone(),
            replacement,
            help: None,
        }
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = display.into();
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// Caller supplied completion source. Invoked synchronously; must not block
/// indefinitely.
pub trait CompletionProvider {
    fn complete(&mut self, text: &str, cursor: usize) -> Vec<Candidate>;
}

impl<F> CompletionProvider for F
where
    F: FnMut(&str, usize) -> Vec<Candidate>,
{
    fn complete(&mut self, text: &str, cursor: usize) -> Vec<Candidate> {
        self(text, cursor)
    }
}

/// Byte span of the word ending at `cursor`: the run of non-whitespace,
/// non-delimiter characters immediately before it.
pub fn word_before(text: &str, cursor: usize, delimiters: &str) -> Range<usize> {
    let cursor = floor_char_boundary(text, cursor);
    let start = text[..cursor]
        .char_indices()
        .rev()
        .find(|&(_, c)| c.is_whitespace() || delimiters.contains(c))
        .map_or(0, |(i, c)| i + c.len_utf8());
    start..cursor
}

/// Candidates from a fixed word list that extend the word before the cursor.
pub fn complete_words<'a>(
    text: &str,
    cursor: usize,
    words: impl IntoIterator<Item = &'a str>,
) -> Vec<Candidate> {
    let span = word_before(text, cursor, "");
    let prefix = &text[span.clone()];
    words
        .into_iter()
        .filter(|w| w.starts_with(prefix))
        .map(|w| Candidate::new(span.clone(), w))
        .collect()
}

fn floor_char_boundary(text: &str, idx: usize) -> usize {
    let mut idx = idx.min(text.len());
    while !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

/// The active candidate list with a selection cursor.
#[derive(Debug, Clone)]
pub struct CompletionSet {
    candidates: Vec<Candidate>,
    selected: usize,
}

impl CompletionSet {
    /// Build a set from provider output for `text`. Invalid candidates are
    /// dropped; `None` when nothing remains.
    pub fn new(text: &str, candidates: Vec<Candidate>) -> Option<Self> {
        let total = candidates.len();
        let candidates: Vec<Candidate> = candidates
            .into_iter()
            .filter(|c| {
                c.span.start <= c.span.end
                    && c.span.end <= text.len()
                    && text.is_char_boundary(c.span.start)
                    && text.is_char_boundary(c.span.end)
            })
            .collect();
        if candidates.len() != total {
            tracing::debug!(target: "completion", dropped = total - candidates.len(), "invalid_candidates_dropped");
        }
        if candidates.is_empty() {
            return None;
        }
        Some(Self {
            candidates,
            selected: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn is_single(&self) -> bool {
        self.candidates.len() == 1
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> &Candidate {
        &self.candidates[self.selected]
    }

    /// Move the selection, wrapping at both ends.
    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % self.candidates.len();
    }

    pub fn select_prev(&mut self) {
        self.selected = (self.selected + self.candidates.len() - 1) % self.candidates.len();
    }

    /// Move by a page of `page` entries, clamping at the ends.
    pub fn select_page(&mut self, page: usize, forward: bool) {
        let page = page.max(1);
        self.selected = if forward {
            (self.selected + page).min(self.candidates.len() - 1)
        } else {
            self.selected.saturating_sub(page)
        };
    }

    pub fn into_selected(self) -> Candidate {
        let Self {
            mut candidates,
            selected,
        } = self;
        candidates.swap_remove(selected)
    }
}

/// Apply `candidate` to `text`; returns the new text and the byte offset just
/// past the inserted replacement.
pub fn apply(text: &str, candidate: &Candidate) -> (String, usize) {
    let mut out = String::with_capacity(text.len() + candidate.replacement.len());
    out.push_str(&text[..candidate.span.start]);
    out.push_str(&candidate.replacement);
    let cursor = out.len();
    out.push_str(&text[candidate.span.end..]);
    (out, cursor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn closure_provider() {
        let mut p = |text: &str, cursor: usize| complete_words(text, cursor, ["test", "text", "tar"]);
        let got = p.complete("te", 2);
        let names: Vec<&str> = got.iter().map(|c| c.replacement.as_str()).collect();
        assert_eq!(names, vec!["test", "text"]);
        assert_eq!(got[0].span, 0..2);
    }

    #[test]
    fn word_before_respects_delimiters() {
        assert_eq!(word_before("git che", 7, ""), 4..7);
        assert_eq!(word_before("a/b/c", 5, "/"), 4..5);
        assert_eq!(word_before("", 0, ""), 0..0);
        assert_eq!(word_before("x ", 2, ""), 2..2);
        assert_eq!(word_before("日本", 3, ""), 0..3);
    }

    #[test]
    fn invalid_spans_dropped() {
        let set = CompletionSet::new(
            "héllo",
            vec![Candidate::new(0..2, "bad"), Candidate::new(0..9, "bad"), Candidate::new(0..3, "ok")],
        )
        .unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.selected().replacement, "ok");
        assert!(CompletionSet::new("x", vec![Candidate::new(3..4, "no")]).is_none());
        assert!(CompletionSet::new("x", Vec::new()).is_none());
    }

    #[test]
    fn selection_wraps() {
        let mut set = CompletionSet::new(
            "t",
            vec![Candidate::new(0..1, "a"), Candidate::new(0..1, "b"), Candidate::new(0..1, "c")],
        )
        .unwrap();
        set.select_prev();
        assert_eq!(set.selected_index(), 2);
        set.select_next();
        assert_eq!(set.selected_index(), 0);
        set.select_page(10, true);
        assert_eq!(set.selected_index(), 2);
        set.select_page(1, false);
        assert_eq!(set.selected_index(), 1);
        assert_eq!(set.into_selected().replacement, "b");
    }

    #[test]
    fn apply_replaces_span() {
        let c = Candidate::new(4..6, "text");
        assert_eq!(apply("cat te | x", &c), ("cat text | x".to_string(), 8));
    }

    #[test]
    fn candidate_builders() {
        let c = Candidate::new(0..1, "x").with_display("x (cmd)").with_help("runs x");
        assert_eq!(c.display, "x (cmd)");
        assert_eq!(c.help.as_deref(), Some("runs x"));
    }
}
