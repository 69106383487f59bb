//! Text formatting for terminal output: greedy word wrap and title boxes.

/// Default column width for everything the game prints.
pub const DISPLAY_WIDTH: usize = 75;

const BORDER: &str = "═";

/// Greedy word wrap at `width` columns.
///
/// Words are added to the current line while the line, including the
/// trailing space left after each word, plus the next word still fits.
/// A word longer than `width` goes alone on its own line, unsplit.
/// Widths are counted in characters.
pub fn wrap(text: &str, width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current_len + word_len > width && !current.is_empty() {
            lines.push(current.trim_end().to_string());
            current.clear();
            current_len = 0;
        }
        current.push_str(word);
        current.push(' ');
        current_len += word_len + 1;
    }

    if !current.is_empty() {
        lines.push(current.trim_end().to_string());
    }

    lines.join("\n")
}

/// Render `title` centered between two borders of `width` characters.
///
/// When the padding is odd the extra space goes on the right. A title
/// wider than the box is printed without padding.
pub fn render_title_box(title: &str, width: usize) -> String {
    let border = BORDER.repeat(width);
    let title_len = title.chars().count();
    let padding = width.saturating_sub(title_len);
    let left = padding / 2;
    let right = padding - left;

    format!(
        "{border}\n{}{title}{}\n{border}",
        " ".repeat(left),
        " ".repeat(right)
    )
}
