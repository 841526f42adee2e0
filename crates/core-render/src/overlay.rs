//! Completion overlay lines, rendered below the edit area.
//!
//! The overlay shows one page of candidates. When the candidate count exceeds
//! the rows available, the page containing the selection is shown and a dim
//! `(k/n)` indicator line is appended (k = selected position, n = total).
//! With a single row free the indicator is left out, with none the overlay
//! is not drawn at all.

use core_completion::CompletionSet;

use crate::frame::DisplayLine;
use crate::style::Style;

/// Candidates on one page given `max_rows` available (indicator included).
pub fn page_size(total: usize, max_rows: usize) -> usize {
    if total <= max_rows || max_rows < 2 {
        total.min(max_rows)
    } else {
        max_rows - 1
    }
}

pub fn completion_lines(
    set: &CompletionSet,
    max_rows: usize,
    width: u16,
    color: bool,
) -> Vec<DisplayLine> {
    let width = usize::from(width.max(1));
    let total = set.len();
    let page = page_size(total, max_rows);
    if page == 0 {
        tracing::trace!(target: "render.overlay", total, "overlay_no_room");
        return Vec::new();
    }
    let selected = set.selected_index();
    let start = (selected / page) * page;
    let end = (start + page).min(total);
    let mut lines = Vec::with_capacity(page + 1);
    for (i, cand) in set.candidates()[start..end].iter().enumerate() {
        let mut line = DisplayLine::new();
        let style = if start + i == selected {
            Style::reverse()
        } else {
            Style::PLAIN
        };
        line.push_str_clipped("  ", Style::PLAIN, width);
        let fits = line.push_str_clipped(&cand.display, style, width);
        if let Some(help) = cand.help.as_deref().filter(|_| fits) {
            let dim = Style::dim().for_color(color);
            if line.push_str_clipped("  ", dim, width) {
                line.push_str_clipped(help, dim, width);
            }
        }
        lines.push(line);
    }
    if page < total && page < max_rows {
        let mut line = DisplayLine::new();
        line.push_str_clipped(
            &format!("  ({}/{})", selected + 1, total),
            Style::dim().for_color(color),
            width,
        );
        lines.push(line);
    }
    tracing::trace!(target: "render.overlay", total, page, start, rows = lines.len(), "overlay_lines");
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_completion::Candidate;
    use pretty_assertions::assert_eq;

    fn set(n: usize) -> CompletionSet {
        let cands = (0..n)
            .map(|i| Candidate::new(0..0, format!("c{i}")))
            .collect();
        CompletionSet::new("", cands).unwrap()
    }

    fn texts(lines: &[DisplayLine]) -> Vec<String> {
        lines.iter().map(DisplayLine::text).collect()
    }

    #[test]
    fn all_fit_without_indicator() {
        let s = set(2);
        let lines = completion_lines(&s, 10, 80, true);
        assert_eq!(texts(&lines), vec!["  c0", "  c1"]);
        assert_eq!(lines[0].spans[1].style, Style::reverse());
        assert_eq!(lines[1].spans[0].style, Style::PLAIN);
    }

    #[test]
    fn paged_with_indicator() {
        let mut s = set(7);
        for _ in 0..4 {
            s.select_next();
        }
        // 3 rows available: 2 candidates + indicator
        let lines = completion_lines(&s, 3, 80, true);
        assert_eq!(texts(&lines), vec!["  c4", "  c5", "  (5/7)"]);
    }

    #[test]
    fn cramped_rows_never_exceed_the_limit() {
        let mut s = set(5);
        s.select_next();
        assert!(completion_lines(&s, 0, 80, false).is_empty());
        assert_eq!(texts(&completion_lines(&s, 1, 80, false)), vec!["  c1"]);
        assert_eq!(
            texts(&completion_lines(&s, 2, 80, false)),
            vec!["  c1", "  (2/5)"]
        );
        assert_eq!(page_size(5, 0), 0);
        assert_eq!(page_size(5, 1), 1);
        assert_eq!(page_size(3, 3), 3);
    }

    #[test]
    fn help_text_is_dim_and_clipped() {
        let s = CompletionSet::new(
            "",
            vec![Candidate::new(0..0, "run").with_help("execute the thing")],
        )
        .unwrap();
        let lines = completion_lines(&s, 5, 14, true);
        assert_eq!(texts(&lines), vec!["  run  execute"]);
        assert_eq!(lines[0].spans.last().unwrap().style, Style::dim());
        let plain = completion_lines(&s, 5, 80, false);
        assert!(plain[0].spans.iter().all(|sp| sp.style.fg.is_none() && !sp.style.dim));
    }
}
