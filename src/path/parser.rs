//! Path string parser.
//!
//! A path is split on its delimiters (outside of brackets), and each piece
//! may carry bracket groups: `users[$current].name[0]` parses to
//! `users`, indirect `current`, `name`, `0`. Input that does not form
//! balanced bracket groups is kept literally, so parsing never fails.

use super::ast::{PathExpression, Segment};

/// Delimiters and markers used to split a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSyntax {
    /// Separators between segments. Any of them splits; the first is used
    /// to rebuild compound keys.
    pub delimiters: Vec<String>,
    /// Marks a bracket group as an indirect reference.
    pub indirect_marker: char,
}

impl Default for PathSyntax {
    fn default() -> Self {
        Self {
            delimiters: vec![".".to_string()],
            indirect_marker: '$',
        }
    }
}

impl PathSyntax {
    pub fn new(delimiters: Vec<String>, indirect_marker: char) -> Self {
        let delimiters: Vec<String> = delimiters.into_iter().filter(|d| !d.is_empty()).collect();
        if delimiters.is_empty() {
            return Self {
                indirect_marker,
                ..Self::default()
            };
        }
        Self {
            delimiters,
            indirect_marker,
        }
    }

    /// The string used to join segments back into a compound key.
    pub fn joiner(&self) -> &str {
        self.delimiters
            .iter()
            .find(|d| !d.is_empty())
            .map(String::as_str)
            .unwrap_or(".")
    }
}

/// Parser for path strings.
pub struct Parser<'a> {
    input: Vec<char>,
    position: usize,
    syntax: &'a PathSyntax,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given path string.
    pub fn new(raw: &str, syntax: &'a PathSyntax) -> Self {
        Self {
            input: raw.chars().collect(),
            position: 0,
            syntax,
        }
    }

    /// Parses the path string into a PathExpression.
    pub fn parse(raw: &str, syntax: &PathSyntax) -> PathExpression {
        let mut parser = Parser::new(raw, syntax);
        let tokens = parser.split_tokens();

        let mut segments = Vec::new();
        for token in &tokens {
            segments.extend(parser.parse_token(token));
        }
        if segments.is_empty() {
            segments.push(Segment::Key(raw.to_string()));
        }

        PathExpression::new(raw, segments)
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Returns the next character and advances position.
    fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        Some(ch)
    }

    fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Returns the length of the delimiter starting at the current position.
    fn delimiter_at(&self) -> Option<usize> {
        self.syntax
            .delimiters
            .iter()
            .filter(|d| !d.is_empty())
            .map(|d| d.chars().collect::<Vec<_>>())
            .filter(|d| self.input[self.position..].starts_with(d))
            .map(|d| d.len())
            .max()
    }

    /// Splits the input on delimiters that sit outside of brackets.
    fn split_tokens(&mut self) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut current = String::new();
        let mut depth = 0usize;

        while !self.is_eof() {
            if depth == 0 {
                if let Some(len) = self.delimiter_at() {
                    tokens.push(std::mem::take(&mut current));
                    self.position += len;
                    continue;
                }
            }
            match self.next() {
                Some('[') => {
                    depth += 1;
                    current.push('[');
                }
                Some(']') => {
                    depth = depth.saturating_sub(1);
                    current.push(']');
                }
                Some(ch) => current.push(ch),
                None => break,
            }
        }
        tokens.push(current);
        tokens
    }

    /// Parses one delimiter-free token: a base key followed by bracket groups.
    fn parse_token(&self, token: &str) -> Vec<Segment> {
        let Some(open) = token.find('[') else {
            return vec![Segment::Key(token.to_string())];
        };

        let (base, rest) = token.split_at(open);
        let Some(groups) = bracket_groups(rest) else {
            return vec![Segment::Key(token.to_string())];
        };

        let mut segments = Vec::with_capacity(groups.len() + 1);
        if !base.is_empty() {
            segments.push(Segment::Key(base.to_string()));
        }
        for group in groups {
            segments.push(self.group_segment(group));
        }
        segments
    }

    fn group_segment(&self, group: &str) -> Segment {
        if group.is_empty() {
            return Segment::Append;
        }
        match group.strip_prefix(self.syntax.indirect_marker) {
            Some(name) => Segment::Indirect(name.to_string()),
            None => Segment::Key(group.to_string()),
        }
    }
}

/// Splits `[a][b[c]]` into `["a", "b[c]"]`, or `None` when the groups are
/// unbalanced or separated by other characters.
fn bracket_groups(text: &str) -> Option<Vec<&str>> {
    let mut groups = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;

    for (i, ch) in text.char_indices() {
        match ch {
            '[' => {
                if depth == 0 {
                    start = i + 1;
                }
                depth += 1;
            }
            ']' => {
                if depth == 0 {
                    return None;
                }
                depth -= 1;
                if depth == 0 {
                    groups.push(&text[start..i]);
                }
            }
            _ if depth == 0 => return None,
            _ => {}
        }
    }

    if depth != 0 {
        return None;
    }
    Some(groups)
}
