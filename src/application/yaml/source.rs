//! Line view of YAML text for the parts the event parser drops: comments,
//! blank lines and collection styles.
//!
//! Every comment or blank line is handed out at most once. Lines that belong to
//! block scalar content are marked as used so they are never mistaken for
//! comments.

/// Line and column numbers follow the parser's markers: lines are 1-based,
/// columns are 0-based and counted in chars.
pub(super) struct Source<'a> {
    lines: Vec<&'a str>,
    used: Vec<bool>,
}

impl<'a> Source<'a> {
    pub fn new(text: &'a str) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let lines: Vec<&str> = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect();
        let used = vec![false; lines.len()];
        Self { lines, used }
    }

    fn line(&self, number: usize) -> Option<&'a str> {
        number.checked_sub(1).and_then(|idx| self.lines.get(idx)).copied()
    }

    pub fn char_at(&self, line: usize, col: usize) -> Option<char> {
        self.line(line)?.chars().nth(col)
    }

    /// Whether only indentation precedes `col` on `line`.
    pub fn starts_line(&self, line: usize, col: usize) -> bool {
        self.line(line)
            .is_some_and(|text| text.chars().take(col).all(|c| c == ' ' || c == '\t'))
    }

    fn is_free_trivia(&self, idx: usize) -> bool {
        !self.used[idx] && is_trivia(self.lines[idx])
    }

    /// Comment and blank lines directly above `line`, top to bottom.
    pub fn take_comments_above(&mut self, line: usize) -> Vec<String> {
        let end = line.saturating_sub(1).min(self.lines.len());
        let mut start = end;
        while start > 0 && self.is_free_trivia(start - 1) {
            start -= 1;
        }
        self.take_range(start, end)
    }

    /// Comment and blank lines at the top of the text, before any content.
    pub fn take_leading(&mut self) -> Vec<String> {
        let mut end = 0;
        while end < self.lines.len() && (self.used[end] || is_trivia(self.lines[end])) {
            end += 1;
        }
        let mut lines = self.take_range(0, end);
        while lines.first().is_some_and(String::is_empty) {
            lines.remove(0);
        }
        lines
    }

    /// Comment and blank lines after the last content line.
    pub fn take_trailing(&mut self) -> Vec<String> {
        let end = self.lines.len();
        let mut start = end;
        while start > 0 && self.is_free_trivia(start - 1) {
            start -= 1;
        }
        let mut lines = self.take_range(start, end);
        while lines.last().is_some_and(String::is_empty) {
            lines.pop();
        }
        if lines.iter().all(String::is_empty) {
            lines.clear();
        }
        lines
    }

    /// Unused trivia in `start..end` (0-based), trimmed, with runs of blank
    /// lines collapsed to one `""`.
    fn take_range(&mut self, start: usize, end: usize) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for idx in start..end {
            if self.used[idx] {
                continue;
            }
            self.used[idx] = true;
            let text = self.lines[idx].trim();
            if !text.is_empty() {
                out.push(text.to_string());
            } else if out.last().map_or(true, |last| !last.is_empty()) {
                out.push(String::new());
            }
        }
        out
    }

    /// Comment that ends `line`, scanning from `col`.
    ///
    /// Quotes only open at the start of a token, so apostrophes inside plain
    /// words are not taken for quotes. A quote left open at the end of the
    /// line means the comment, if any, is on a later line.
    pub fn trailing_comment(&self, line: usize, col: usize) -> Option<String> {
        let chars: Vec<char> = self.line(line)?.chars().collect();
        let mut quote: Option<char> = None;
        let mut prev = ' ';
        let mut idx = col;
        while idx < chars.len() {
            let c = chars[idx];
            match quote {
                Some('\'') => {
                    if c == '\'' {
                        if chars.get(idx + 1) == Some(&'\'') {
                            idx += 1;
                        } else {
                            quote = None;
                        }
                    }
                }
                Some(_) => {
                    if c == '\\' {
                        idx += 1;
                    } else if c == '"' {
                        quote = None;
                    }
                }
                None => {
                    if c == '#' && prev.is_whitespace() {
                        let comment: String = chars[idx..].iter().collect();
                        return Some(comment.trim_end().to_string());
                    }
                    if (c == '\'' || c == '"') && (prev.is_whitespace() || "[{,".contains(prev)) {
                        quote = Some(c);
                    }
                }
            }
            prev = c;
            idx += 1;
        }
        None
    }

    /// Mark the content lines of a block scalar whose indicator sits at
    /// (`line`, `col`). `parent_indent` is the column of the owning key or
    /// sequence dash.
    pub fn cover_block_scalar(&mut self, line: usize, col: usize, parent_indent: Option<usize>) {
        let Some(header) = self.line(line) else {
            return;
        };
        let indicators: String = header
            .chars()
            .skip(col + 1)
            .take_while(|c| matches!(c, '+' | '-' | '0'..='9'))
            .collect();
        let keep = indicators.contains('+');
        let explicit = indicators
            .chars()
            .find_map(|c| c.to_digit(10))
            .map(|d| parent_indent.unwrap_or(0) + d as usize);

        let mut content_indent = explicit;
        let mut last_content = None;
        let mut idx = line;
        while idx < self.lines.len() {
            let text = self.lines[idx];
            if !text.trim().is_empty() {
                let indent = text.chars().take_while(|&c| c == ' ').count();
                let required = *content_indent.get_or_insert(indent);
                let deeper = parent_indent.map_or(true, |parent| indent > parent);
                if indent < required || !deeper {
                    break;
                }
                last_content = Some(idx);
            }
            idx += 1;
        }

        let Some(last) = last_content else {
            return;
        };
        let mut end = last + 1;
        if keep {
            while end < self.lines.len() && self.lines[end].trim().is_empty() {
                end += 1;
            }
        }
        for used in &mut self.used[line..end] {
            *used = true;
        }
    }
}

fn is_trivia(line: &str) -> bool {
    let text = line.trim_start();
    text.is_empty() || text.starts_with('#')
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn given_comments_and_blanks_above_line_when_taking_then_collapses_blank_runs() {
        let mut source = Source::new("a: 1\n\n\n  # one\n# two\n\nb: 2\n");

        let comments = source.take_comments_above(7);

        assert_eq!(comments, vec!["", "# one", "# two", ""]);
        assert!(source.take_comments_above(7).is_empty());
    }

    #[test]
    fn given_content_directly_above_when_taking_then_returns_nothing() {
        let mut source = Source::new("a: 1\nb: 2\n");
        assert!(source.take_comments_above(2).is_empty());
    }

    #[rstest]
    #[case("key: value # note", Some("# note"))]
    #[case("key: 'a # b' # note", Some("# note"))]
    #[case("key: \"a \\\" # b\" # note  ", Some("# note"))]
    #[case("key: it's # note", Some("# note"))]
    #[case("key: a#b", None)]
    #[case("key: 'open # quote", None)]
    #[case("key: | # note", Some("# note"))]
    #[case("key: [a, '#'] # note", Some("# note"))]
    fn given_key_line_when_scanning_then_finds_trailing_comment(
        #[case] line: &str,
        #[case] expected: Option<&str>,
    ) {
        let source = Source::new(line);
        assert_eq!(source.trailing_comment(1, 0).as_deref(), expected);
    }

    #[test]
    fn given_block_scalar_with_comment_like_lines_when_covered_then_they_are_not_comments() {
        let mut source = Source::new("a: |\n  text\n\n  # inside\n# after\nb: x\n");

        source.cover_block_scalar(1, 3, Some(0));

        assert_eq!(source.take_comments_above(6), vec!["# after"]);
    }

    #[test]
    fn given_keep_chomping_when_covered_then_trailing_blanks_belong_to_scalar() {
        let mut source = Source::new("a: |+\n  text\n\nb: x\n");

        source.cover_block_scalar(1, 3, Some(0));

        assert!(source.take_comments_above(4).is_empty());
    }

    #[test]
    fn given_leading_and_trailing_trivia_when_taking_then_trims_outer_blanks() {
        let mut source = Source::new("\n# head\n\na: 1\n\n# tail\n\n");

        assert_eq!(source.take_leading(), vec!["# head", ""]);
        assert_eq!(source.take_trailing(), vec!["", "# tail"]);
    }

    #[test]
    fn given_only_blank_lines_when_taking_trailing_then_returns_nothing() {
        let mut source = Source::new("a: 1\n\n\n");
        assert!(source.take_trailing().is_empty());
    }
}
