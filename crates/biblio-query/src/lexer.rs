//! Query lexer (tokenizer).
//!
//! Converts a query string into a stream of positioned tokens for the parser.
//! Connectives (`and`, `or`, `not`) and range words (`after`, `before`) are left
//! as plain words; their meaning depends on where the parser meets them.

use std::{iter::Peekable, str::Chars};

use crate::error::LexError;

/// A token in the query language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A bare word, with backslash escapes resolved.
    Word(String),

    /// A keyword prefix (e.g., "title:" produces KeywordPrefix("title")).
    KeywordPrefix(String),

    /// A quoted phrase (the quotes are stripped, content preserved).
    Quoted(String),

    /// A regular expression between slashes (slashes stripped).
    Regex(String),

    /// Left parenthesis.
    LParen,

    /// Right parenthesis.
    RParen,

    /// `>`
    Greater,

    /// `>=`
    GreaterEqual,

    /// `<`
    Less,

    /// `<=`
    LessEqual,

    /// Range arrow `->` standing on its own.
    Arrow,
}

impl Token {
    /// Returns the word text if this token is a bare word.
    pub fn as_word(&self) -> Option<&str> {
        match self {
            Self::Word(word) => Some(word),
            _ => None,
        }
    }

    /// Returns true if this token is the given word, ignoring ASCII case.
    pub fn is_word(&self, expected: &str) -> bool {
        self.as_word()
            .is_some_and(|word| word.eq_ignore_ascii_case(expected))
    }

    /// Returns true for the comparison operators `>`, `>=`, `<`, `<=`.
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Greater | Self::GreaterEqual | Self::Less | Self::LessEqual
        )
    }
}

/// A token together with the byte span it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    /// The token.
    pub token: Token,
    /// Byte offset of the token's first character.
    pub position: usize,
    /// Byte offset just past the token's last character.
    pub end: usize,
}

/// Tokenizes a query string.
struct Lexer<'a> {
    /// The original input string.
    input: &'a str,
    /// Character iterator with one-character lookahead.
    chars: Peekable<Chars<'a>>,
    /// Current byte position in input.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    /// Tokenizes the entire input, returning all tokens or an error.
    fn tokenize(mut self) -> Result<Vec<Spanned>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            let position = self.position;
            match self.next_token()? {
                Some(token) => tokens.push(Spanned {
                    token,
                    position,
                    end: self.position,
                }),
                None => break,
            }
        }

        Ok(tokens)
    }

    /// Returns the next token, or None if at end of input.
    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        let Some(&ch) = self.chars.peek() else {
            return Ok(None);
        };

        match ch {
            '"' => self.read_quoted().map(Some),
            '/' => self.read_regex().map(Some),
            '(' => {
                self.advance();
                Ok(Some(Token::LParen))
            }
            ')' => {
                self.advance();
                Ok(Some(Token::RParen))
            }
            '>' | '<' => Ok(Some(self.read_comparison(ch))),
            '-' if self.rest().starts_with("->") => {
                self.advance();
                self.advance();
                Ok(Some(Token::Arrow))
            }
            _ => Ok(Some(self.read_word_or_prefix())),
        }
    }

    /// Reads a quoted phrase. `\"` embeds a quote.
    fn read_quoted(&mut self) -> Result<Token, LexError> {
        let start_pos = self.position;
        self.advance(); // consume opening quote

        let mut content = String::new();

        loop {
            match self.chars.peek() {
                Some(&'"') => {
                    self.advance();
                    return Ok(Token::Quoted(content));
                }
                Some(&'\\') => {
                    self.advance();
                    match self.chars.peek() {
                        Some(&next) => {
                            content.push(next);
                            self.advance();
                        }
                        None => content.push('\\'),
                    }
                }
                Some(&ch) => {
                    content.push(ch);
                    self.advance();
                }
                None => return Err(LexError::new("unclosed quote", start_pos)),
            }
        }
    }

    /// Reads a `/pattern/` regular expression. `\/` embeds a slash; other
    /// escapes are kept verbatim for the regex engine.
    fn read_regex(&mut self) -> Result<Token, LexError> {
        let start_pos = self.position;
        self.advance(); // consume opening slash

        let mut pattern = String::new();

        loop {
            match self.chars.peek() {
                Some(&'/') => {
                    self.advance();
                    return Ok(Token::Regex(pattern));
                }
                Some(&'\\') => {
                    self.advance();
                    match self.chars.peek() {
                        Some(&'/') => {
                            pattern.push('/');
                            self.advance();
                        }
                        Some(&next) => {
                            pattern.push('\\');
                            pattern.push(next);
                            self.advance();
                        }
                        None => pattern.push('\\'),
                    }
                }
                Some(&ch) => {
                    pattern.push(ch);
                    self.advance();
                }
                None => return Err(LexError::new("unclosed regular expression", start_pos)),
            }
        }
    }

    /// Reads `>`, `>=`, `<` or `<=`.
    fn read_comparison(&mut self, first: char) -> Token {
        self.advance();
        let inclusive = self.chars.peek() == Some(&'=');
        if inclusive {
            self.advance();
        }
        match (first, inclusive) {
            ('>', false) => Token::Greater,
            ('>', true) => Token::GreaterEqual,
            (_, false) => Token::Less,
            (_, true) => Token::LessEqual,
        }
    }

    /// Reads a word or a keyword prefix.
    ///
    /// A colon ends a keyword prefix only when the word so far starts with a
    /// letter and the colon does not open `://`, so URLs and numeric ratios
    /// stay whole.
    fn read_word_or_prefix(&mut self) -> Token {
        let mut word = String::new();

        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() || ch == '(' || ch == ')' || ch == '"' {
                break;
            }

            match ch {
                '\\' => {
                    self.advance();
                    match self.chars.peek() {
                        Some(&next) => {
                            word.push(next);
                            self.advance();
                        }
                        None => word.push('\\'),
                    }
                }
                ':' if self.colon_ends_prefix(&word) => {
                    self.advance();
                    return Token::KeywordPrefix(word);
                }
                _ => {
                    word.push(ch);
                    self.advance();
                }
            }
        }

        Token::Word(word)
    }

    /// Returns true if a colon at the current position terminates `word` as a prefix.
    fn colon_ends_prefix(&self, word: &str) -> bool {
        word.starts_with(|c: char| c.is_alphabetic()) && !self.rest().starts_with("://")
    }

    /// Returns the unread remainder of the input.
    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Advances to the next character.
    fn advance(&mut self) {
        if let Some(ch) = self.chars.next() {
            self.position += ch.len_utf8();
        }
    }
}

/// Tokenizes a query string.
pub fn tokenize(input: &str) -> Result<Vec<Spanned>, LexError> {
    Lexer::new(input).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|spanned| spanned.token)
            .collect()
    }

    fn word(text: &str) -> Token {
        Token::Word(text.into())
    }

    #[test]
    fn empty_input() {
        assert_eq!(tokens(""), vec![]);
        assert_eq!(tokens("  \t "), vec![]);
    }

    #[test]
    fn words_keep_connectives_as_words() {
        assert_eq!(
            tokens("ellis and not hawking"),
            vec![word("ellis"), word("and"), word("not"), word("hawking")]
        );
    }

    #[test]
    fn keyword_prefix() {
        assert_eq!(
            tokens("author:ellis"),
            vec![Token::KeywordPrefix("author".into()), word("ellis")]
        );
        assert_eq!(
            tokens("a: ellis"),
            vec![Token::KeywordPrefix("a".into()), word("ellis")]
        );
    }

    #[test]
    fn nested_prefixes() {
        assert_eq!(
            tokens("refersto:recid:123"),
            vec![
                Token::KeywordPrefix("refersto".into()),
                Token::KeywordPrefix("recid".into()),
                word("123"),
            ]
        );
    }

    #[test]
    fn colon_in_url_and_numbers_stays_in_word() {
        assert_eq!(tokens("http://x.org"), vec![word("http://x.org")]);
        assert_eq!(tokens("1:2"), vec![word("1:2")]);
    }

    #[test]
    fn quoted_phrase_with_escape() {
        assert_eq!(
            tokens(r#"t:"a \"b\" c""#),
            vec![
                Token::KeywordPrefix("t".into()),
                Token::Quoted("a \"b\" c".into())
            ]
        );
    }

    #[test]
    fn unclosed_quote_error() {
        let err = tokenize("t \"higgs boson").unwrap_err();
        assert_eq!(err.position, 2);
        assert!(err.message.contains("unclosed quote"));
    }

    #[test]
    fn regex_tokens() {
        assert_eq!(
            tokens(r"t:/^h\d+\/x$/"),
            vec![
                Token::KeywordPrefix("t".into()),
                Token::Regex(r"^h\d+/x$".into())
            ]
        );
        let err = tokenize("t /abc").unwrap_err();
        assert!(err.message.contains("unclosed regular expression"));
        assert_eq!(err.position, 2);
    }

    #[test]
    fn comparisons_and_arrow() {
        assert_eq!(
            tokens("> >= < <= 2000 -> 2005"),
            vec![
                Token::Greater,
                Token::GreaterEqual,
                Token::Less,
                Token::LessEqual,
                word("2000"),
                Token::Arrow,
                word("2005"),
            ]
        );
        assert_eq!(
            tokens("date:>=2000"),
            vec![
                Token::KeywordPrefix("date".into()),
                Token::GreaterEqual,
                word("2000")
            ]
        );
    }

    #[test]
    fn inline_arrow_stays_in_word() {
        assert_eq!(tokens("2000->2005"), vec![word("2000->2005")]);
        assert_eq!(tokens("50+ 1999-"), vec![word("50+"), word("1999-")]);
    }

    #[test]
    fn parentheses_split_words() {
        assert_eq!(
            tokens("a:(ellis or(hawking))"),
            vec![
                Token::KeywordPrefix("a".into()),
                Token::LParen,
                word("ellis"),
                word("or"),
                Token::LParen,
                word("hawking"),
                Token::RParen,
                Token::RParen,
            ]
        );
    }

    #[test]
    fn backslash_escapes_in_words() {
        assert_eq!(tokens(r"ellis\ j"), vec![word("ellis j")]);
        assert_eq!(tokens(r"a\:b"), vec![word("a:b")]);
        assert_eq!(tokens("x\\"), vec![word("x\\")]);
    }

    #[test]
    fn positions_are_byte_offsets() {
        let spans = tokenize("é t:x").unwrap();
        assert_eq!(spans[0].position, 0);
        assert_eq!(spans[1].position, 3);
        assert_eq!(spans[2].position, 5);
        assert_eq!(spans[1].end, 5);
        assert_eq!(spans[2].end, 6);
    }

    #[test]
    fn token_helpers() {
        assert!(word("AND").is_word("and"));
        assert!(!Token::LParen.is_word("and"));
        assert!(Token::LessEqual.is_comparison());
        assert!(!Token::Arrow.is_comparison());
    }
}
