//! Plain-text rendering of a table page.
//!
//! Column widths are measured in terminal cells, so wide (CJK) and
//! combining characters line up. Cells wider than the cap are cut with `…`.

use tabula_view::Page;
use unicode_width::UnicodeWidthStr;

/// Truncates a string to fit within a maximum display width, adding ellipsis if needed.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    // Reserve 1 char for ellipsis
    let limit = max_width.saturating_sub(1);

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

/// Pads `s` with spaces up to `width` display cells.
fn pad(s: &str, width: usize) -> String {
    let mut out = s.to_string();
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(s.width())));
    out
}

fn header_text(label: &str, sort: Option<&str>) -> String {
    match sort {
        Some("asc") => format!("{} ↑", label),
        Some("desc") => format!("{} ↓", label),
        _ => label.to_string(),
    }
}

/// Renders `page` as an aligned grid followed by a status footer.
pub fn render_page(page: &Page, max_col_width: usize) -> String {
    let max_col_width = max_col_width.max(2);
    let headers: Vec<String> = page
        .headers
        .iter()
        .map(|h| truncate_to_width(&header_text(&h.label, h.sort), max_col_width))
        .collect();
    let rows: Vec<Vec<String>> = page
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| truncate_to_width(&cell.replace('\n', " "), max_col_width))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.width())
                .chain(std::iter::once(h.width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: &[String]| -> String {
        let joined = cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| pad(c, *w))
            .collect::<Vec<_>>()
            .join("  ");
        format!("{}\n", joined.trim_end())
    };

    let mut out = String::new();
    out.push_str(&line(&headers));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&line(&rule));
    if rows.is_empty() {
        out.push_str("(no rows)\n");
    }
    for row in &rows {
        out.push_str(&line(row));
    }

    out.push('\n');
    out.push_str(&format!(
        "{}  ·  page {} of {}\n",
        page.showing(),
        page.info.page,
        page.info.total_pages
    ));
    if let Some(summary) = &page.filter_summary {
        out.push_str(&format!("Filtered by: {}\n", summary));
    }
    if !page.query.is_empty() {
        out.push_str(&format!("URL: ?{}\n", page.query));
    }
    for notice in &page.notices {
        out.push_str(&format!("{}\n", notice));
    }
    out
}
