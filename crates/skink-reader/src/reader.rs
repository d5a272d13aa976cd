use skink_core::Value;

use crate::error::ReadError;
use crate::lexer::{tokenize, SpannedToken, Token};

struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<SpannedToken>) -> Self {
        Parser { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).map(|t| t.token.clone());
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    /// Line of the current token, falling back to the last one at EOF.
    fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|t| t.line)
            .unwrap_or(1)
    }

    fn parse_expr(&mut self) -> Result<Value, ReadError> {
        let line = self.line();
        match self.next() {
            // Exhausted input reads as nil, so a trailing quote quietly
            // quotes the empty list.
            None => Ok(Value::Nil),
            Some(Token::Bool(b)) => Ok(Value::bool(b)),
            Some(Token::Number(text)) => Ok(Value::atom(text)),
            Some(Token::String(text)) => Ok(Value::atom(text)),
            Some(Token::Symbol(name)) => Ok(Value::symbol(&name)),
            Some(Token::LParen) => self.parse_list(')', Token::RParen),
            Some(Token::LBracket) => self.parse_list(']', Token::RBracket),
            Some(Token::Quote) => {
                let inner = self.parse_expr()?;
                Ok(Value::list(vec![Value::symbol("quote"), inner]))
            }
            Some(Token::RParen) => Err(ReadError::Mismatched { close: ')', line }),
            Some(Token::RBracket) => Err(ReadError::Mismatched { close: ']', line }),
            Some(Token::Dot) => Err(ReadError::MisplacedDot { line }),
        }
    }

    fn parse_list(&mut self, close: char, term: Token) -> Result<Value, ReadError> {
        let mut items = Vec::new();
        loop {
            match self.peek() {
                None => {
                    return Err(ReadError::Unterminated { close, line: self.line() });
                }
                Some(t) if *t == term => {
                    self.pos += 1;
                    return Ok(Value::list(items));
                }
                Some(Token::Dot) => {
                    let line = self.line();
                    self.pos += 1;
                    if items.is_empty() || self.peek().is_none() || self.peek() == Some(&term) {
                        return Err(ReadError::MisplacedDot { line });
                    }
                    let tail = self.parse_expr()?;
                    return match self.peek() {
                        Some(t) if *t == term => {
                            self.pos += 1;
                            Ok(Value::list_with_tail(items, tail))
                        }
                        None => Err(ReadError::Unterminated { close, line: self.line() }),
                        Some(_) => Err(ReadError::MisplacedDot { line }),
                    };
                }
                Some(_) => items.push(self.parse_expr()?),
            }
        }
    }
}

/// Read the first datum in `input`. `Ok(None)` means the input held
/// nothing but whitespace and comments; trailing data is ignored.
pub fn read(input: &str) -> Result<Option<Value>, ReadError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Ok(None);
    }
    Parser::new(tokens).parse_expr().map(Some)
}

/// Read every datum in `input`, wrapped in a single `(begin ...)` form
/// ready for evaluation. Empty input reads as `(begin)`.
pub fn read_program(input: &str) -> Result<Value, ReadError> {
    let mut parser = Parser::new(tokenize(input)?);
    let mut forms = vec![Value::symbol("begin")];
    while parser.peek().is_some() {
        forms.push(parser.parse_expr()?);
    }
    Ok(Value::list(forms))
}
