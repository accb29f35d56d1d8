use regex::Regex;

/// Forward-only cursor over a single line of text.
///
/// Positions are byte offsets into the line and always sit on a char boundary.
/// Nothing here fails: a miss is reported as `false`, `None` or an empty slice.
pub(crate) struct LineCursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    pub fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    pub fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn is_at_whitespace(&self) -> bool {
        self.peek_char().is_some_and(char::is_whitespace)
    }

    pub fn matches(&self, pattern: &str) -> bool {
        self.rest().starts_with(pattern)
    }

    /// True if `regex` matches starting exactly at the cursor.
    pub fn matches_regex(&self, regex: &Regex) -> bool {
        regex.find(self.rest()).is_some_and(|m| m.start() == 0)
    }

    pub fn move_next(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    /// Moves past the next occurrence of `c`. Returns false, leaving the cursor untouched, if
    /// there is none.
    pub fn move_to_after(&mut self, c: char) -> bool {
        match self.rest().find(c) {
            Some(offset) => {
                self.pos += offset + c.len_utf8();
                true
            }
            None => false,
        }
    }

    pub fn skip_whitespace(&mut self) {
        self.skip_while(char::is_whitespace);
    }

    pub fn skip_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek_char().is_some_and(&predicate) {
            self.move_next();
        }
    }

    /// Reads up to (not including) `delimiter`, or to the end of the line if it never shows up.
    pub fn read_until(&mut self, delimiter: char) -> &'a str {
        let rest = self.rest();
        let len = rest.find(delimiter).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    pub fn read_until_whitespace(&mut self) -> &'a str {
        let rest = self.rest();
        let len = rest.find(char::is_whitespace).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    pub fn read_to_end(&mut self) -> &'a str {
        let rest = self.rest();
        self.pos = self.input.len();
        rest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_words_and_whitespace() {
        let mut cursor = LineCursor::new("## main...origin/main [ahead 1]");
        assert!(cursor.matches("##"));
        cursor.move_next();
        cursor.move_next();
        assert!(cursor.is_at_whitespace());
        cursor.skip_whitespace();
        assert_eq!(cursor.read_until_whitespace(), "main...origin/main");
        assert!(cursor.move_to_after('['));
        assert_eq!(cursor.read_until(']'), "ahead 1");
        assert_eq!(cursor.peek_char(), Some(']'));
        cursor.move_next();
        assert_eq!(cursor.read_to_end(), "");
    }

    #[test]
    fn misses_leave_cursor_in_place() {
        let mut cursor = LineCursor::new("abc");
        assert!(!cursor.move_to_after('x'));
        assert!(!cursor.matches("abd"));
        assert!(!cursor.is_at_whitespace());
        assert_eq!(cursor.rest(), "abc");
    }

    #[test]
    fn read_until_missing_delimiter_reads_everything() {
        let mut cursor = LineCursor::new("no bracket");
        assert_eq!(cursor.read_until(']'), "no bracket");
        assert_eq!(cursor.rest(), "");
    }

    #[test]
    fn regex_must_match_at_cursor() {
        let digits = Regex::new(r"\d+").unwrap();
        let mut cursor = LineCursor::new("ab12");
        assert!(!cursor.matches_regex(&digits));
        cursor.move_next();
        cursor.move_next();
        assert!(cursor.matches_regex(&digits));
    }

    #[test]
    fn multibyte_chars() {
        let mut cursor = LineCursor::new("åäö x");
        cursor.skip_while(|c| !c.is_whitespace());
        assert!(cursor.is_at_whitespace());
        cursor.skip_whitespace();
        assert_eq!(cursor.read_to_end(), "x");
    }
}
