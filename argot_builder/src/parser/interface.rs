use crate::parser::base::ParseError;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

// Target 95% of the terminal, so the help never touches the right edge.
const TARGET_TOTAL_FACTOR: f64 = 0.95;

// With an average word length of 5, 17 fits exactly 3 words and their separating spaces.
pub(crate) const MINIMUM_MIDDLE_WIDTH: usize = 17;

/// Lays out rows of `left | middle | right...` columns.
/// Only the middle column wraps; the left and right columns are sized to their widest cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ColumnRenderer {
    indent: usize,
    padding: usize,
    left: usize,
    middle: usize,
    rights: Vec<usize>,
}

impl ColumnRenderer {
    /// Fit the middle column to the terminal, using its natural width when there is room.
    pub(crate) fn guided(
        indent: usize,
        padding: usize,
        left: usize,
        middle: usize,
        rights: Vec<usize>,
        total_width: usize,
    ) -> Self {
        let mut fixed = indent + left + padding;

        if !rights.is_empty() {
            fixed += rights.iter().sum::<usize>() + rights.len() * padding;
        }

        let target = (total_width as f64 * TARGET_TOTAL_FACTOR) as usize;
        let natural = std::cmp::max(middle, MINIMUM_MIDDLE_WIDTH);

        let middle = if natural + fixed <= target {
            natural
        } else if fixed < target {
            std::cmp::max(target - fixed, MINIMUM_MIDDLE_WIDTH)
        } else {
            MINIMUM_MIDDLE_WIDTH
        };

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Fixed columns {fixed} within target {target}; middle column: {middle}.");
        }

        Self::new(indent, padding, left, middle, rights)
    }

    pub(crate) fn new(
        indent: usize,
        padding: usize,
        left: usize,
        middle: usize,
        rights: Vec<usize>,
    ) -> Self {
        Self {
            indent,
            padding,
            left,
            // Hyphenation needs room for at least one character and the hyphen.
            middle: std::cmp::max(middle, 2),
            rights,
        }
    }

    pub(crate) fn render(&self, left: &str, middle: &str, rights: &[String]) -> Vec<String> {
        let padding = " ".repeat(self.padding);
        let indent = " ".repeat(self.indent);
        let left_width = self.left;
        let middle_width = self.middle;

        let mut right = String::default();
        for (i, item) in rights.iter().enumerate() {
            let width = self.rights.get(i).copied().unwrap_or_default();
            right.push_str(&padding);
            right.push_str(&format!("{item:width$}"));
        }

        let mut parts = chunk(middle, middle_width).into_iter();
        let first = parts.next().unwrap_or_default();
        let mut out = vec![format!(
            "{indent}{left:left_width$}{padding}{first:middle_width$}{right}"
        )];
        out.extend(parts.map(|part| format!("{indent}{:left_width$}{padding}{part}", "")));

        out.into_iter()
            .map(|line| line.trim_end().to_string())
            .collect()
    }
}

/// Break a paragraph into lines no wider than `width` characters.
fn chunk(paragraph: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::default();
    let mut current = String::default();

    for word in paragraph.split_whitespace() {
        let word_length = word.chars().count();

        if current.is_empty() {
            hyphenate(width, &mut lines, &mut current, word);
        } else if current.chars().count() + 1 + word_length <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            hyphenate(width, &mut lines, &mut current, word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Split a word too wide for a line into hyphenated pieces; the tail is left in `current`.
fn hyphenate(width: usize, lines: &mut Vec<String>, current: &mut String, word: &str) {
    let characters: Vec<char> = word.chars().collect();
    let step = width - 1;
    let mut start = 0;

    while characters.len() - start > width {
        let piece: String = characters[start..start + step].iter().collect();
        lines.push(format!("{piece}-"));
        start += step;
    }

    current.extend(&characters[start..]);
}

/// Where help and error output goes.
pub(crate) trait UserInterface: Send + Sync {
    fn print(&self, message: String);
    fn print_error(&self, error: ParseError);
}

/// Writes everything to standard output.
#[derive(Default)]
pub(crate) struct ConsoleInterface {}

impl UserInterface for ConsoleInterface {
    fn print(&self, message: String) {
        println!("{message}");
    }

    fn print_error(&self, error: ParseError) {
        println!("{error}");
    }
}
