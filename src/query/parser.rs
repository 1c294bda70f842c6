//! Parses query text into a [`Query`].
//!
//! ```text
//! [LIST|TABLE f1, f2|TASK|COUNT] [FROM src (OR src)*]
//!     [WHERE cond (AND cond)*] [ORDER BY field [ASC|DESC]] [LIMIT n]
//! ```
//!
//! Keywords are case-insensitive. A `WHERE` clause that cannot be parsed
//! yields no conditions rather than an error.

use crate::domain::{Tag, Value, parse_number};
use crate::query::lexer::{Token, tokenize};
use crate::query::{
    Condition, Operator, OrderBy, Query, QueryError, QueryType, SortDirection, Source,
};
use tracing::debug;

const CLAUSE_KEYWORDS: [&str; 4] = ["FROM", "WHERE", "ORDER", "LIMIT"];

/// Parses a query.
pub fn parse(text: &str) -> Result<Query, QueryError> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(QueryError::Empty);
    }
    Parser { tokens, pos: 0 }.query()
}

/// Parses a literal value.
///
/// Quoted text becomes a string, `true`/`false` booleans, numeric text a
/// number, `[a, b]` a list of recursively parsed elements, and anything else
/// the raw string.
pub fn parse_value(text: &str) -> Value {
    let text = text.trim();
    if let Some(inner) = unquote(text) {
        return Value::string(inner);
    }
    match text {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Some(n) = parse_number(text) {
        return Value::Number(n);
    }
    if let Some(inner) = text.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
        return Value::List(
            split_top_level(inner)
                .into_iter()
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(parse_value)
                .collect(),
        );
    }
    Value::string(text)
}

fn unquote(text: &str) -> Option<&str> {
    let first = text.chars().next()?;
    if matches!(first, '"' | '\'') && text.len() >= 2 && text.ends_with(first) {
        Some(&text[1..text.len() - 1])
    } else {
        None
    }
}

/// Splits on commas that are not inside nested brackets or quotes.
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.peek().is_some_and(|t| t.is_keyword(keyword)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn at_clause(&self) -> bool {
        self.peek()
            .is_some_and(|t| CLAUSE_KEYWORDS.iter().any(|k| t.is_keyword(k)))
    }

    fn query(mut self) -> Result<Query, QueryError> {
        let mut query = Query::default();

        if let Some(Token::Word(word)) = self.peek()
            && let Some(query_type) = QueryType::from_keyword(word)
        {
            query.query_type = query_type;
            self.pos += 1;
        }
        if query.query_type == QueryType::Table {
            query.fields = self.fields()?;
        }
        if self.eat_keyword("FROM") {
            query.sources = self.sources()?;
        }
        if self.eat_keyword("WHERE") {
            query.conditions = self.conditions();
        }
        if self.eat_keyword("ORDER") {
            query.order_by = Some(self.order_by()?);
        }
        if self.eat_keyword("LIMIT") {
            query.limit = Some(self.limit()?);
        }

        match self.peek() {
            Some(token) => Err(QueryError::UnexpectedToken(token.to_string())),
            None => Ok(query),
        }
    }

    fn fields(&mut self) -> Result<Vec<String>, QueryError> {
        let mut fields = Vec::new();
        while !self.at_clause() {
            match self.next() {
                None => break,
                Some(Token::Word(field)) => fields.push(field),
                Some(Token::Comma) => {}
                Some(other) => return Err(QueryError::UnexpectedToken(other.to_string())),
            }
        }
        Ok(fields)
    }

    fn sources(&mut self) -> Result<Vec<Source>, QueryError> {
        let mut sources = vec![self.source()?];
        while self.eat_keyword("OR") {
            sources.push(self.source()?);
        }
        Ok(sources)
    }

    fn source(&mut self) -> Result<Source, QueryError> {
        if self.at_clause() {
            return Err(QueryError::MissingSource);
        }
        match self.next() {
            Some(Token::Quoted(prefix)) => Ok(Source::Path(prefix)),
            Some(Token::Word(word)) => Tag::new(&word)
                .map(Source::Tag)
                .map_err(|_| QueryError::InvalidTag(word)),
            Some(other) => Err(QueryError::UnexpectedToken(other.to_string())),
            None => Err(QueryError::MissingSource),
        }
    }

    fn conditions(&mut self) -> Vec<Condition> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|t| !t.is_keyword("ORDER") && !t.is_keyword("LIMIT"))
        {
            self.pos += 1;
        }

        let clause = &self.tokens[start..self.pos];
        let mut conditions = Vec::new();
        for group in clause.split(|t| t.is_keyword("AND")) {
            match parse_condition(group) {
                Some(condition) => conditions.push(condition),
                None => {
                    debug!(?group, "ignoring malformed WHERE clause");
                    return Vec::new();
                }
            }
        }
        conditions
    }

    fn order_by(&mut self) -> Result<OrderBy, QueryError> {
        if !self.eat_keyword("BY") || self.at_clause() {
            return Err(QueryError::IncompleteOrder);
        }
        let Some(Token::Word(field)) = self.next() else {
            return Err(QueryError::IncompleteOrder);
        };

        let direction = if self.eat_keyword("DESC") {
            SortDirection::Desc
        } else {
            self.eat_keyword("ASC");
            SortDirection::Asc
        };
        Ok(OrderBy { field, direction })
    }

    fn limit(&mut self) -> Result<usize, QueryError> {
        match self.next() {
            Some(Token::Word(word)) => word
                .parse::<usize>()
                .map_err(|_| QueryError::InvalidLimit(word)),
            Some(other) => Err(QueryError::InvalidLimit(other.to_string())),
            None => Err(QueryError::InvalidLimit(String::new())),
        }
    }
}

fn parse_condition(tokens: &[Token]) -> Option<Condition> {
    let (negated, rest) = match tokens.split_first() {
        Some((Token::Bang, rest)) => (true, rest),
        Some((first, rest)) if first.is_keyword("NOT") => (true, rest),
        _ => (false, tokens),
    };

    let condition = match rest {
        [Token::Word(field)] => Condition::exists(field.as_str()),
        [Token::Word(field), op, value] => {
            let operator = match op {
                Token::Symbol(symbol) => Operator::from_symbol(symbol),
                Token::Word(word) => Operator::from_symbol(word),
                _ => None,
            }?;
            Condition::new(field.as_str(), operator, literal(value)?)
        }
        _ => return None,
    };

    Some(if negated { condition.negate() } else { condition })
}

fn literal(token: &Token) -> Option<Value> {
    match token {
        Token::Quoted(text) => Some(Value::string(text.as_str())),
        Token::Word(text) | Token::List(text) => Some(parse_value(text)),
        _ => None,
    }
}
