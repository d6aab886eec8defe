//! Query parser.
//!
//! Parses a query string into a [`ParseTree`] using recursive descent over the
//! lexer's token stream.
//!
//! # Grammar
//!
//! ```text
//! query      → find_query | bare_query | ε
//! find_query → ("find" | "fin" | "f") WS body
//! body       → operand (connective? operand)*
//! connective → "and not" | "and" | "or" | "not"
//! operand    → "not" operand | "(" body ")" | keyword_q | value
//! keyword_q  → KEYWORD ":" target | KEYWORD WS target          (WS form: find mode only)
//! target     → "(" body ")" | value
//! value      → WORD+ | QUOTED | REGEX | range
//! range      → (">" | ">=" | "<" | "<=") value
//!            | ("after" | "before") value | value "+" | value "-" | value "->" value
//! ```
//!
//! Chains are kept flat here; the converter folds them left-deep. In find mode a value
//! runs over several words until a connective, keyword prefix, parenthesis or quoted
//! token. In bare mode a value is a single word unless quoted.
//!
//! Bare input that never starts a keyword construct is accepted whole as
//! [`ParseTree::FreeText`], even when it does not match the grammar.

use biblio_config::KeywordTable;
use tracing::debug;

use crate::{
    ast::Value,
    error::{ParseError, QueryError},
    lexer::{Spanned, Token, tokenize},
    parse_tree::{Connective, KeywordQuery, KeywordTarget, Operand, ParseTree, QueryBody},
};

/// Command words that switch a query into find mode.
const FIND_COMMANDS: [&str; 3] = ["find", "fin", "f"];

/// Reserved connective words.
const CONNECTIVES: [&str; 3] = ["and", "or", "not"];

/// Maximum nesting of parentheses and `not` prefixes.
const MAX_DEPTH: usize = 64;

/// Parses query strings against a keyword alias table.
#[derive(Debug, Clone, Copy)]
pub struct Parser<'a> {
    /// Known keyword aliases.
    keywords: &'a KeywordTable,
}

impl<'a> Parser<'a> {
    /// Creates a parser that recognizes the aliases in `keywords`.
    pub fn new(keywords: &'a KeywordTable) -> Self {
        Self { keywords }
    }

    /// Parses a query string.
    ///
    /// Empty or all-whitespace input yields [`ParseTree::Empty`]. Fails only when
    /// the input is made of reserved words alone, when a find query does not match
    /// the grammar, or when a bare query starts a keyword construct that does not
    /// complete.
    pub fn parse(&self, input: &str) -> Result<ParseTree, QueryError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(ParseTree::Empty);
        }
        let offset = input.len() - input.trim_start().len();

        if is_reserved_only(trimmed) {
            return Err(QueryError::parse(
                "query consists only of reserved words",
                Some(offset),
                input,
            ));
        }

        match split_find_command(trimmed) {
            Some((command, body)) => {
                let body_offset = offset + (trimmed.len() - body.len());
                self.parse_find(command, body, body_offset, input)
            }
            None => self.parse_bare(trimmed, offset, input),
        }
    }

    /// Parses the body of a find query. Every failure is a syntax error.
    fn parse_find(
        &self,
        command: &str,
        body: &str,
        offset: usize,
        input: &str,
    ) -> Result<ParseTree, QueryError> {
        if is_reserved_only(body) {
            return Err(QueryError::parse(
                "query consists only of reserved words",
                Some(offset),
                input,
            ));
        }

        let tokens = tokenize(body).map_err(|err| QueryError::from_lex(err, offset, input))?;
        let mut cursor = Cursor::new(tokens, body.len(), Mode::Find, self.keywords);
        let body = cursor
            .parse_query()
            .map_err(|err| QueryError::from_parse(err, offset, input))?;

        Ok(ParseTree::Find {
            command: command.to_string(),
            body,
        })
    }

    /// Parses a query without a command word, falling back to free text.
    fn parse_bare(&self, trimmed: &str, offset: usize, input: &str) -> Result<ParseTree, QueryError> {
        let tokens = match tokenize(trimmed) {
            Ok(tokens) => tokens,
            Err(err) if self.mentions_keyword(trimmed) => {
                return Err(QueryError::from_lex(err, offset, input));
            }
            Err(err) => {
                debug!(error = %err, "unlexable input without keywords, using free text");
                return Ok(ParseTree::FreeText(trimmed.to_string()));
            }
        };

        let mut cursor = Cursor::new(tokens, trimmed.len(), Mode::Bare, self.keywords);
        match cursor.parse_query() {
            Ok(body) if body.has_keyword() => Ok(ParseTree::Bare(body)),
            Ok(_) => Ok(ParseTree::FreeText(trimmed.to_string())),
            Err(err) if cursor.keyword_seen => Err(QueryError::from_parse(err, offset, input)),
            Err(err) => {
                debug!(error = %err, "unparsable input without keywords, using free text");
                Ok(ParseTree::FreeText(trimmed.to_string()))
            }
        }
    }

    /// Returns true if any word of `text` starts with a known `alias:` prefix.
    fn mentions_keyword(&self, text: &str) -> bool {
        text.split_whitespace().any(|word| {
            word.split_once(':').is_some_and(|(prefix, _)| {
                self.keywords
                    .is_alias(prefix.trim_start_matches(['(', '"']))
            })
        })
    }
}

/// Splits `find <body>` into the command word and the body.
fn split_find_command(text: &str) -> Option<(&str, &str)> {
    let end = text.find(char::is_whitespace)?;
    let (command, rest) = text.split_at(end);
    FIND_COMMANDS
        .iter()
        .any(|candidate| command.eq_ignore_ascii_case(candidate))
        .then_some((command, rest.trim_start()))
}

/// Returns true if `word` is `and`, `or` or `not` in any case.
fn is_connective(word: &str) -> bool {
    CONNECTIVES
        .iter()
        .any(|connective| word.eq_ignore_ascii_case(connective))
}

/// Returns true if every word of `text` is a reserved connective.
fn is_reserved_only(text: &str) -> bool {
    text.split_whitespace().all(is_connective)
}

/// Returns true if `word` opens an `after`/`before` range.
fn is_range_word(word: &str) -> bool {
    word.eq_ignore_ascii_case("after") || word.eq_ignore_ascii_case("before")
}

/// Interprets a single range-capable word: `a->b`, `x+` and `x-`.
fn range_from_word(text: String) -> Value {
    if text.contains(char::is_whitespace) {
        return Value::Simple(text);
    }
    if let Some((from, to)) = text.split_once("->")
        && !from.is_empty()
        && !to.is_empty()
    {
        return Value::Range {
            from: from.to_string(),
            to: to.to_string(),
        };
    }
    if text.len() > 1 {
        if let Some(bound) = text.strip_suffix('+') {
            return Value::GreaterEqual(bound.to_string());
        }
        if let Some(bound) = text.strip_suffix('-') {
            return Value::LowerEqual(bound.to_string());
        }
    }
    Value::Simple(text)
}

/// Keeps nested `inner:` prefixes as literal value text.
fn with_literal_prefix(prefix: &str, value: Value) -> Value {
    if prefix.is_empty() {
        return value;
    }
    match value {
        Value::Simple(text) => Value::Simple(format!("{prefix}{text}")),
        Value::Quoted(text) => Value::Quoted(format!("{prefix}{text}")),
        other => Value::Simple(format!("{prefix}{}", other.to_query_string())),
    }
}

/// Query dialect being parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// `find` queries: whitespace keywords, multi-word values.
    Find,
    /// Keyword prefixes with colons, single-word values.
    Bare,
}

/// How a value is scanned.
#[derive(Debug, Clone, Copy)]
struct ValueContext {
    /// Values run over several words.
    multi_word: bool,
    /// Range forms (`after`, `x+`, `a->b`) are recognized.
    ranges: bool,
}

/// Recursive descent parser over a token stream.
struct Cursor<'a> {
    /// Token stream to parse.
    tokens: Vec<Spanned>,
    /// Index of the next token.
    position: usize,
    /// Length of the parsed text, reported for errors at end of input.
    end: usize,
    /// Query dialect.
    mode: Mode,
    /// Known keyword aliases.
    keywords: &'a KeywordTable,
    /// Current nesting depth.
    depth: usize,
    /// Set once a known keyword prefix has been consumed.
    keyword_seen: bool,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor at the start of `tokens`.
    fn new(tokens: Vec<Spanned>, end: usize, mode: Mode, keywords: &'a KeywordTable) -> Self {
        Self {
            tokens,
            position: 0,
            end,
            mode,
            keywords,
            depth: 0,
            keyword_seen: false,
        }
    }

    /// Parses a complete body, rejecting leftover tokens.
    fn parse_query(&mut self) -> Result<QueryBody, ParseError> {
        let body = self.parse_body()?;

        if self.peek().is_some() {
            return Err(self.error("unexpected closing parenthesis"));
        }

        Ok(body)
    }

    /// Parses an operand chain up to end of input or a closing parenthesis.
    fn parse_body(&mut self) -> Result<QueryBody, ParseError> {
        let first = self.parse_operand(true)?;
        let mut rest = Vec::new();

        while !matches!(self.peek(), None | Some(Token::RParen)) {
            let connective = self.parse_connective();
            if matches!(self.peek(), None | Some(Token::RParen)) {
                return Err(self.error(format!(
                    "'{}' needs an expression on its right",
                    connective.as_str()
                )));
            }
            let operand = self.parse_operand(false)?;
            rest.push((connective, operand));
        }

        Ok(QueryBody { first, rest })
    }

    /// Consumes a connective if one is next; otherwise the join is implicit.
    fn parse_connective(&mut self) -> Connective {
        let Some(token) = self.peek() else {
            return Connective::Implicit;
        };

        if token.is_word("and") {
            self.advance();
            if self.peek().is_some_and(|next| next.is_word("not")) {
                self.advance();
                return Connective::AndNot;
            }
            Connective::And
        } else if token.is_word("or") {
            self.advance();
            Connective::Or
        } else if token.is_word("not") {
            self.advance();
            Connective::Not
        } else {
            Connective::Implicit
        }
    }

    /// Parses one operand. `leading` is true for the first operand of a chain.
    fn parse_operand(&mut self, leading: bool) -> Result<Operand, ParseError> {
        let Some(token) = self.peek().cloned() else {
            return Err(self.error("unexpected end of query"));
        };

        match token {
            Token::Word(word) if word.eq_ignore_ascii_case("not") => {
                self.advance();
                self.enter()?;
                if self.peek().is_none() {
                    return Err(self.error("'not' needs an expression on its right"));
                }
                let inner = self.parse_operand(leading)?;
                self.leave();
                Ok(Operand::Negated(Box::new(inner)))
            }
            Token::Word(word) if is_connective(&word) => Err(self.error(format!(
                "'{}' needs an expression on its left",
                word.to_ascii_lowercase()
            ))),
            Token::LParen => Ok(Operand::Group(Box::new(self.parse_group()?))),
            Token::RParen => Err(self.error("unexpected closing parenthesis")),
            Token::Arrow => Err(self.error("unexpected '->'")),
            Token::KeywordPrefix(prefix) => {
                self.advance();
                self.parse_prefixed_keyword(&prefix)
            }
            Token::Word(word)
                if self.mode == Mode::Find
                    && self.keywords.is_alias(&word)
                    && self.starts_value_at(self.position + 1) =>
            {
                self.advance();
                self.parse_spaced_keyword(&word)
            }
            Token::Word(word)
                if self.mode == Mode::Find
                    && !leading
                    && is_range_word(&word)
                    && self.plain_word_at(self.position + 1) =>
            {
                let context = ValueContext {
                    multi_word: true,
                    ranges: true,
                };
                Ok(Operand::Value(self.parse_value(context)?))
            }
            _ => {
                let context = ValueContext {
                    multi_word: self.mode == Mode::Find,
                    ranges: false,
                };
                Ok(Operand::Value(self.parse_value(context)?))
            }
        }
    }

    /// Parses `keyword:` (already consumed) and its target.
    fn parse_prefixed_keyword(&mut self, prefix: &str) -> Result<Operand, ParseError> {
        let mut keyword = prefix.to_ascii_lowercase();

        // Compound aliases such as `refersto:recid`.
        while let Some(Token::KeywordPrefix(next)) = self.peek() {
            let compound = format!("{keyword}:{}", next.to_ascii_lowercase());
            if !self.keywords.is_alias(&compound) {
                break;
            }
            keyword = compound;
            self.advance();
        }

        if self.keywords.is_alias(&keyword) {
            self.keyword_seen = true;
        }

        // Nested prefixes stay in the value. A known alias is reported unless it is
        // typed inside one word, as in `eprint:arXiv:1234.5678`.
        let mut literal = String::new();
        let mut extra_keywords = Vec::new();
        while let Some(Token::KeywordPrefix(inner)) = self.peek() {
            let inner = inner.clone();
            let joined = self.joins_previous();
            self.advance();
            let in_word = joined
                && self.joins_previous()
                && matches!(self.peek(), Some(Token::Word(_) | Token::KeywordPrefix(_)));
            if self.keywords.is_alias(&inner) && !in_word {
                extra_keywords.push(inner.to_ascii_lowercase());
            }
            literal.push_str(&inner);
            literal.push(':');
        }

        let target = self.parse_keyword_target(&keyword, &literal)?;
        Ok(Operand::Keyword(KeywordQuery {
            keyword,
            extra_keywords,
            target,
        }))
    }

    /// Parses `keyword <target>` in find mode (keyword word already consumed).
    fn parse_spaced_keyword(&mut self, word: &str) -> Result<Operand, ParseError> {
        let keyword = word.to_ascii_lowercase();
        self.keyword_seen = true;
        let target = self.parse_keyword_target(&keyword, "")?;
        Ok(Operand::Keyword(KeywordQuery {
            keyword,
            extra_keywords: Vec::new(),
            target,
        }))
    }

    /// Parses the value or group a keyword applies to.
    fn parse_keyword_target(
        &mut self,
        keyword: &str,
        literal: &str,
    ) -> Result<KeywordTarget, ParseError> {
        let ranges = self
            .keywords
            .lookup(keyword)
            .is_some_and(|(_, spec)| spec.kind.accepts_ranges());

        let has_value = match self.peek() {
            Some(Token::Word(word)) => !is_connective(word),
            Some(Token::RParen | Token::Arrow) | None => false,
            Some(_) => true,
        };
        if !has_value {
            return Err(self.error(format!("expected a value after '{keyword}'")));
        }

        if self.peek() == Some(&Token::LParen) {
            return Ok(KeywordTarget::Group(Box::new(self.parse_group()?)));
        }

        let context = ValueContext {
            multi_word: self.mode == Mode::Find,
            ranges,
        };
        let value = self.parse_value(context)?;
        Ok(KeywordTarget::Value(with_literal_prefix(literal, value)))
    }

    /// Parses a value, including range forms allowed by `context`.
    fn parse_value(&mut self, context: ValueContext) -> Result<Value, ParseError> {
        let Some(token) = self.peek().cloned() else {
            return Err(self.error("unexpected end of query"));
        };

        match token {
            Token::Quoted(text) => {
                self.advance();
                Ok(Value::Quoted(text))
            }
            Token::Regex(pattern) => {
                self.advance();
                Ok(Value::Regex(pattern))
            }
            Token::Greater => {
                self.advance();
                Ok(Value::Greater(self.parse_bound(context, ">")?))
            }
            Token::GreaterEqual => {
                self.advance();
                Ok(Value::GreaterEqual(self.parse_bound(context, ">=")?))
            }
            Token::Less => {
                self.advance();
                Ok(Value::Lower(self.parse_bound(context, "<")?))
            }
            Token::LessEqual => {
                self.advance();
                Ok(Value::LowerEqual(self.parse_bound(context, "<=")?))
            }
            Token::Word(word)
                if context.ranges && is_range_word(&word) && self.plain_word_at(self.position + 1) =>
            {
                self.advance();
                let bound = self.parse_bound(context, &word)?;
                if word.eq_ignore_ascii_case("after") {
                    Ok(Value::Greater(bound))
                } else {
                    Ok(Value::Lower(bound))
                }
            }
            Token::Word(word) => {
                self.advance();
                self.parse_words(word, context)
            }
            Token::KeywordPrefix(_) | Token::LParen | Token::RParen | Token::Arrow => {
                Err(self.error("unexpected token where a value was expected"))
            }
        }
    }

    /// Parses the words of a value whose first word is already consumed.
    fn parse_words(&mut self, first: String, context: ValueContext) -> Result<Value, ParseError> {
        if context.ranges && self.peek() == Some(&Token::Arrow) {
            self.advance();
            let single = ValueContext {
                multi_word: false,
                ..context
            };
            let to = self.parse_bound(single, "->")?;
            return Ok(Value::Range { from: first, to });
        }

        let text = if context.multi_word {
            let mut words = vec![first];
            words.extend(self.collect_words());
            words.join(" ")
        } else {
            first
        };

        if context.ranges {
            Ok(range_from_word(text))
        } else {
            Ok(Value::Simple(text))
        }
    }

    /// Parses the operand of a range operator.
    fn parse_bound(&mut self, context: ValueContext, operator: &str) -> Result<String, ParseError> {
        match self.peek().cloned() {
            Some(Token::Quoted(text)) => {
                self.advance();
                Ok(text)
            }
            Some(Token::Word(word)) if !is_connective(&word) => {
                self.advance();
                if context.multi_word {
                    let mut words = vec![word];
                    words.extend(self.collect_words());
                    Ok(words.join(" "))
                } else {
                    Ok(word)
                }
            }
            _ => Err(self.error(format!("expected a value after '{operator}'"))),
        }
    }

    /// Consumes consecutive plain words, stopping at a connective.
    fn collect_words(&mut self) -> Vec<String> {
        let mut words = Vec::new();
        while let Some(Token::Word(word)) = self.peek() {
            if is_connective(word) {
                break;
            }
            words.push(word.clone());
            self.advance();
        }
        words
    }

    /// Parses a parenthesized body.
    fn parse_group(&mut self) -> Result<QueryBody, ParseError> {
        let open = self.byte_position();
        self.advance(); // consume '('
        self.enter()?;

        if self.peek() == Some(&Token::RParen) {
            return Err(self.error("empty parentheses"));
        }

        let body = self.parse_body()?;

        if self.peek() != Some(&Token::RParen) {
            return Err(ParseError::new("expected closing parenthesis", Some(open)));
        }
        self.advance();
        self.leave();

        Ok(body)
    }

    /// Returns true if the token at `index` can start a value.
    fn starts_value_at(&self, index: usize) -> bool {
        self.tokens.get(index).is_some_and(|spanned| match &spanned.token {
            Token::Word(word) => !is_connective(word),
            Token::Quoted(_) | Token::Regex(_) | Token::LParen => true,
            other => other.is_comparison(),
        })
    }

    /// Returns true if the token at `index` is a word other than a connective.
    fn plain_word_at(&self, index: usize) -> bool {
        self.tokens
            .get(index)
            .and_then(|spanned| spanned.token.as_word())
            .is_some_and(|word| !is_connective(word))
    }

    /// Increases nesting depth, failing past the limit.
    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error("query nested too deeply"));
        }
        Ok(())
    }

    /// Decreases nesting depth.
    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position).map(|spanned| &spanned.token)
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    /// Returns true if the current token follows the previous one with no
    /// whitespace between them.
    fn joins_previous(&self) -> bool {
        let previous = self
            .position
            .checked_sub(1)
            .and_then(|index| self.tokens.get(index));
        match (previous, self.tokens.get(self.position)) {
            (Some(previous), Some(current)) => previous.end == current.position,
            _ => false,
        }
    }

    /// Returns the byte position of the current token, or the end of input.
    fn byte_position(&self) -> usize {
        self.tokens
            .get(self.position)
            .map_or(self.end, |spanned| spanned.position)
    }

    /// Creates an error at the current token.
    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, Some(self.byte_position()))
    }
}
