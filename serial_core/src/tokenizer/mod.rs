//! Quote-aware line tokenizer.
//!
//! Tokens are borrowed slices of the input line; nothing is copied. Character
//! classes come from [`Delimiters`], so a device can swap the separator, the
//! quote character or the line terminators without touching the resolver.

/// Character classification used by the tokenizer and the line reader.
///
/// The three predicates are expected to be mutually exclusive; this is not checked.
#[derive(Clone, Copy)]
pub struct Delimiters {
    /// Separates tokens. Runs of delimiters count as one.
    pub delimiter: fn(char) -> bool,
    /// Opens and closes a quoted token.
    pub quotation: fn(char) -> bool,
    /// Ends a line.
    pub termination: fn(char) -> bool,
}

impl Delimiters {
    pub const DEFAULT: Delimiters = Delimiters {
        delimiter: is_space,
        quotation: is_double_quote,
        termination: is_line_end,
    };

    pub const fn with_delimiter(mut self, delimiter: fn(char) -> bool) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub const fn with_quotation(mut self, quotation: fn(char) -> bool) -> Self {
        self.quotation = quotation;
        self
    }

    pub const fn with_termination(mut self, termination: fn(char) -> bool) -> Self {
        self.termination = termination;
        self
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl core::fmt::Debug for Delimiters {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Delimiters { .. }")
    }
}

/// ASCII space.
pub const fn is_space(c: char) -> bool {
    c == ' '
}

pub const fn is_double_quote(c: char) -> bool {
    c == '"'
}

/// `\n` or `\r`.
pub const fn is_line_end(c: char) -> bool {
    c == '\n' || c == '\r'
}

/// Iterator over the tokens of one line.
///
/// The first termination character ends the line; anything after it is ignored.
pub struct Tokenizer<'a> {
    rest: Option<&'a str>,
    delimiters: Delimiters,
}

impl<'a> Tokenizer<'a> {
    pub fn new(line: &'a str, delimiters: Delimiters) -> Self {
        let line = match line.find(delimiters.termination) {
            Some(end) => &line[..end],
            None => line,
        };
        Self {
            rest: if line.is_empty() { None } else { Some(line) },
            delimiters,
        }
    }

    /// Returns the next token, or `None` once the line is exhausted.
    pub fn next_token(&mut self) -> Option<&'a str> {
        let rest = self.rest?;
        let Delimiters { delimiter, quotation, .. } = self.delimiters;

        let rest = rest.trim_start_matches(delimiter);

        let (token, after) = match rest.chars().next() {
            Some(q) if quotation(q) => {
                let body = &rest[q.len_utf8()..];
                match body.char_indices().find(|&(_, c)| quotation(c)) {
                    Some((end, close)) => (&body[..end], &body[end + close.len_utf8()..]),
                    // Unterminated quote runs to end of line.
                    None => (body, ""),
                }
            }
            Some(_) => match rest.find(delimiter) {
                Some(end) => (&rest[..end], &rest[end..]),
                None => (rest, ""),
            },
            None => {
                self.rest = None;
                return None;
            }
        };

        let after = after.trim_start_matches(delimiter);
        self.rest = if after.is_empty() { None } else { Some(after) };
        Some(token)
    }

    /// `true` once no further token can be produced.
    pub fn is_exhausted(&self) -> bool {
        self.rest.is_none()
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Tokenizes `line` with the default [`Delimiters`].
pub fn tokenize(line: &str) -> Tokenizer<'_> {
    Tokenizer::new(line, Delimiters::DEFAULT)
}

// ==================== TESTS =======================

#[cfg(test)]
mod tokenizer_tests {
    use super::*;
    use heapless::Vec;

    fn collect(line: &str) -> Vec<&str, 16> {
        tokenize(line).collect()
    }

    #[test]
    fn test_simple_split() {
        assert_eq!(collect("led on 3").as_slice(), &["led", "on", "3"]);
    }

    #[test]
    fn test_runs_of_delimiters() {
        assert_eq!(collect("   led    on   ").as_slice(), &["led", "on"]);
    }

    #[test]
    fn test_empty_and_blank_lines() {
        assert!(collect("").is_empty());
        assert!(collect("     ").is_empty());
        assert!(collect("\r\n").is_empty());
    }

    #[test]
    fn test_quoted_token_keeps_delimiters() {
        assert_eq!(collect("say \"hello world\"").as_slice(), &["say", "hello world"]);
    }

    #[test]
    fn test_empty_quoted_token() {
        assert_eq!(collect("name \"\" x").as_slice(), &["name", "", "x"]);
    }

    #[test]
    fn test_unterminated_quote_runs_to_end() {
        assert_eq!(collect("say \"hello  world").as_slice(), &["say", "hello  world"]);
    }

    #[test]
    fn test_quote_directly_followed_by_text() {
        // The closing quote ends the token even without a delimiter after it.
        assert_eq!(collect("\"ab\"cd ef").as_slice(), &["ab", "cd", "ef"]);
    }

    #[test]
    fn test_termination_ends_line() {
        assert_eq!(collect("led on\r\nignored").as_slice(), &["led", "on"]);
    }

    #[test]
    fn test_exhaustion_flag() {
        let mut t = tokenize("a b  ");
        assert!(!t.is_exhausted());
        assert_eq!(t.next_token(), Some("a"));
        assert_eq!(t.next_token(), Some("b"));
        assert!(t.is_exhausted());
        assert_eq!(t.next_token(), None);
        assert_eq!(t.next_token(), None);
    }

    #[test]
    fn test_custom_delimiters() {
        let d = Delimiters::DEFAULT
            .with_delimiter(|c| c == ',')
            .with_quotation(|c| c == '\'')
            .with_termination(|c| c == ';');
        let tokens: Vec<&str, 8> = Tokenizer::new("set,'a,b',,3;rest", d).collect();
        assert_eq!(tokens.as_slice(), &["set", "a,b", "3"]);
    }

    #[test]
    fn test_non_ascii_tokens() {
        assert_eq!(collect("grüß \"café au lait\"").as_slice(), &["grüß", "café au lait"]);
    }

    /// Joins `tokens` with `sep`, quoting those that are empty or contain `sep`.
    fn join(tokens: &[&str], sep: char, quote: char) -> heapless::String<128> {
        let mut line = heapless::String::new();
        for (i, tok) in tokens.iter().enumerate() {
            if i > 0 {
                line.push(sep).unwrap();
            }
            if tok.is_empty() || tok.contains(sep) {
                line.push(quote).unwrap();
                line.push_str(tok).unwrap();
                line.push(quote).unwrap();
            } else {
                line.push_str(tok).unwrap();
            }
        }
        line
    }

    #[test]
    fn test_round_trip_with_quoting() {
        let cases: &[&[&str]] = &[
            &["set", "label", "two words", "x", "3.5"],
            &["say", "lots   of    spaces", "  padded  "],
            &["name", "", "x"],
            &[""],
            &["single"],
            &["grüß", "café au lait", "日本語"],
        ];
        for tokens in cases {
            let line = join(tokens, ' ', '"');
            assert_eq!(collect(&line).as_slice(), *tokens, "line: {}", line);
        }
    }

    #[test]
    fn test_round_trip_with_custom_delimiters() {
        let d = Delimiters::DEFAULT
            .with_delimiter(|c| c == ',')
            .with_quotation(|c| c == '\'');
        let cases: &[&[&str]] = &[
            &["set", "a,b", "with space", "3"],
            &["", "x", ""],
            &["only"],
            &["über,alles", "ü"],
        ];
        for tokens in cases {
            let line = join(tokens, ',', '\'');
            let got: Vec<&str, 16> = Tokenizer::new(&line, d).collect();
            assert_eq!(got.as_slice(), *tokens, "line: {}", line);
        }
    }
}
