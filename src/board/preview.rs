//! Plain-text preview of the board pages

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use uuid::Uuid;

use super::geometry::{PAGE_COLS, PAGE_ROWS, Page};
use super::Board;

/// Inner width of one grid cell, in terminal columns
pub const CELL_WIDTH: usize = 20;

const EMPTY_LABEL: &str = "·";

/// Truncate to `width` display columns (with an ellipsis) and pad
fn fit(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;

    if text.width() <= width {
        out.push_str(text);
        used = text.width();
    } else {
        for ch in text.chars() {
            let w = ch.width().unwrap_or(0);
            if used + w > width.saturating_sub(1) {
                break;
            }
            out.push(ch);
            used += w;
        }
        out.push('…');
        used += 1;
    }

    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

fn owner(board: &Board, page: Page, row: u8, col: u8) -> Option<Uuid> {
    board.widget_at(page, row, col).map(|w| w.instance_id)
}

fn label(board: &Board, page: Page, row: u8, col: u8) -> String {
    let text = match board.widget_at(page, row, col) {
        Some(w) if w.row == row && w.col == col => format!("{} ({})", w.name(), w.size),
        Some(_) => String::new(),
        None => EMPTY_LABEL.to_string(),
    };
    format!(" {}", fit(&text, CELL_WIDTH - 1))
}

fn border(board: &Board, page: Page, above: Option<u8>) -> String {
    let mut line = String::from("+");
    for col in 0..PAGE_COLS {
        let joined = above.is_some_and(|row| {
            let top = owner(board, page, row, col);
            top.is_some() && top == owner(board, page, row + 1, col)
        });
        line.push_str(&if joined { " ".repeat(CELL_WIDTH) } else { "-".repeat(CELL_WIDTH) });
        line.push('+');
    }
    line
}

/// Render one page as a boxed 2x2 grid
pub fn render_page(board: &Board, page: Page) -> String {
    let mut lines = vec![format!("Page {page}"), border(board, page, None)];

    for row in 0..PAGE_ROWS {
        let mut line = String::from("|");
        for col in 0..PAGE_COLS {
            line.push_str(&label(board, page, row, col));
            let last = col + 1 == PAGE_COLS;
            let joined = !last && {
                let left = owner(board, page, row, col);
                left.is_some() && left == owner(board, page, row, col + 1)
            };
            line.push(if joined { ' ' } else { '|' });
        }
        lines.push(line);

        let inner = row + 1 < PAGE_ROWS;
        lines.push(border(board, page, inner.then_some(row)));
    }

    lines.join("\n")
}

/// Render both pages, one after the other
pub fn render(board: &Board) -> String {
    Page::all()
        .iter()
        .map(|page| render_page(board, *page))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::WidgetSize;

    #[test]
    fn test_fit_truncates_by_display_width() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdefgh", 5), "abcd…");
        assert_eq!(fit("日本語です", 5).width(), 5);
    }

    #[test]
    fn test_empty_page() {
        let board = Board::new();
        let page = render_page(&board, Page::One);
        let lines: Vec<_> = page.lines().collect();
        assert_eq!(lines[0], "Page 1");
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[2].matches(EMPTY_LABEL).count(), 2);
        assert!(lines.iter().skip(1).all(|l| l.width() == 2 * CELL_WIDTH + 3));
    }

    #[test]
    fn test_wide_widget_spans_columns() {
        let mut board = Board::new();
        board.add_widget("weather", Some(WidgetSize::Wide)).unwrap();
        let page = render_page(&board, Page::One);
        let lines: Vec<_> = page.lines().collect();

        assert!(lines[2].contains("Weather Forecast"));
        assert_eq!(lines[2].matches('|').count(), 2);
        assert_eq!(lines[4].matches(EMPTY_LABEL).count(), 2);
    }

    #[test]
    fn test_tall_widget_joins_rows() {
        let mut board = Board::new();
        board.add_widget("clockWidget", Some(WidgetSize::Tall)).unwrap();
        let page = render_page(&board, Page::One);
        let lines: Vec<_> = page.lines().collect();

        assert!(lines[3].starts_with(&format!("+{}+", " ".repeat(CELL_WIDTH))));
        assert!(render(&board).contains("Page 2"));
    }
}
