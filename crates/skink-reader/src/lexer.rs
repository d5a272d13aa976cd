use skink_core::is_numeric_text;

use crate::error::ReadError;

/// Longest accepted token, in characters.
const MAX_TOKEN: usize = 1024;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    LParen,
    RParen,
    LBracket,
    RBracket,
    Quote,
    Dot,
    Bool(bool),
    Number(String),
    String(String),
    Symbol(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub line: usize,
}

fn is_run_char(c: char) -> bool {
    c.is_ascii_graphic() && !matches!(c, '(' | ')' | '[' | ']' | '\'' | '"' | ';')
}

/// Split source text into tokens. Symbols fold to lower case; strings
/// decode their escapes here, so the reader only sees finished text.
pub fn tokenize(input: &str) -> Result<Vec<SpannedToken>, ReadError> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;
    let mut line = 1;

    while i < chars.len() {
        let ch = chars[i];
        match ch {
            ' ' | '\t' | '\r' | '\x0b' | '\x0c' => {
                i += 1;
            }
            '\n' => {
                line += 1;
                i += 1;
            }
            ';' => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '(' => {
                tokens.push(SpannedToken { token: Token::LParen, line });
                i += 1;
            }
            ')' => {
                tokens.push(SpannedToken { token: Token::RParen, line });
                i += 1;
            }
            '[' => {
                tokens.push(SpannedToken { token: Token::LBracket, line });
                i += 1;
            }
            ']' => {
                tokens.push(SpannedToken { token: Token::RBracket, line });
                i += 1;
            }
            '\'' => {
                tokens.push(SpannedToken { token: Token::Quote, line });
                i += 1;
            }
            '"' => {
                i += 1;
                let mut text = String::new();
                loop {
                    if text.len() == MAX_TOKEN {
                        return Err(ReadError::TokenTooLong { line });
                    }
                    match chars.get(i) {
                        None => return Err(ReadError::UnterminatedString { line }),
                        Some('"') => {
                            i += 1;
                            break;
                        }
                        Some('\\') => {
                            i += 1;
                            match chars.get(i) {
                                None => return Err(ReadError::UnterminatedString { line }),
                                Some(d) if d.is_ascii_digit() => {
                                    // A decimal escape eats every following
                                    // digit, then keeps the low 7 bits.
                                    let mut v: u32 = 0;
                                    while let Some(d) =
                                        chars.get(i).filter(|c| c.is_ascii_digit())
                                    {
                                        v = v.wrapping_mul(10).wrapping_add(*d as u32 - '0' as u32);
                                        i += 1;
                                    }
                                    text.push(((v & 0x7f) as u8) as char);
                                }
                                Some(c) => {
                                    text.push(match c {
                                        'n' => '\n',
                                        'r' => '\r',
                                        't' => '\t',
                                        'b' => '\u{8}',
                                        'a' => '\u{7}',
                                        c => *c,
                                    });
                                    i += 1;
                                }
                            }
                        }
                        Some(c) => {
                            if *c == '\n' {
                                line += 1;
                            }
                            text.push(*c);
                            i += 1;
                        }
                    }
                }
                tokens.push(SpannedToken { token: Token::String(text), line });
            }
            c if !c.is_ascii_graphic() => {
                return Err(ReadError::BadChar { code: c as u32, line });
            }
            _ => {
                let mut run = String::new();
                while let Some(c) = chars.get(i).filter(|c| is_run_char(**c)) {
                    if run.len() == MAX_TOKEN {
                        return Err(ReadError::TokenTooLong { line });
                    }
                    run.push(*c);
                    i += 1;
                }
                let token = classify_run(run);
                tokens.push(SpannedToken { token, line });
            }
        }
    }

    Ok(tokens)
}

fn classify_run(run: String) -> Token {
    if run == "." {
        return Token::Dot;
    }
    if is_numeric_text(&run) {
        return Token::Number(run);
    }
    let bytes = run.as_bytes();
    if bytes.len() == 2 && bytes[0] == b'#' {
        match bytes[1].to_ascii_lowercase() {
            b't' => return Token::Bool(true),
            b'f' => return Token::Bool(false),
            _ => {}
        }
    }
    Token::Symbol(run.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(input: &str) -> Vec<Token> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn delimiters_and_quote() {
        assert_eq!(
            toks("'([])"),
            vec![
                Token::Quote,
                Token::LParen,
                Token::LBracket,
                Token::RBracket,
                Token::RParen,
            ]
        );
    }

    #[test]
    fn runs_split_on_delimiters() {
        assert_eq!(
            toks("(foo bar)"),
            vec![
                Token::LParen,
                Token::Symbol("foo".into()),
                Token::Symbol("bar".into()),
                Token::RParen,
            ]
        );
        assert_eq!(
            toks("a(b"),
            vec![
                Token::Symbol("a".into()),
                Token::LParen,
                Token::Symbol("b".into()),
            ]
        );
    }

    #[test]
    fn symbols_fold_to_lower_case() {
        assert_eq!(toks("FooBar"), vec![Token::Symbol("foobar".into())]);
    }

    #[test]
    fn numbers_keep_their_text() {
        assert_eq!(toks("42"), vec![Token::Number("42".into())]);
        assert_eq!(toks("-3.5e2"), vec![Token::Number("-3.5e2".into())]);
        assert_eq!(toks("1E6"), vec![Token::Number("1E6".into())]);
        // Signs alone are symbols.
        assert_eq!(toks("+"), vec![Token::Symbol("+".into())]);
    }

    #[test]
    fn booleans_need_exactly_two_chars() {
        assert_eq!(toks("#t #F"), vec![Token::Bool(true), Token::Bool(false)]);
        assert_eq!(toks("#true"), vec![Token::Symbol("#true".into())]);
        assert_eq!(toks("#"), vec![Token::Symbol("#".into())]);
    }

    #[test]
    fn a_lone_dot_is_the_dot_token() {
        assert_eq!(toks("."), vec![Token::Dot]);
        assert_eq!(toks(".5"), vec![Token::Number(".5".into())]);
        assert_eq!(toks(".x"), vec![Token::Symbol(".x".into())]);
    }

    #[test]
    fn comments_run_to_end_of_line() {
        assert_eq!(
            toks("a ; rest is noise )(\nb"),
            vec![Token::Symbol("a".into()), Token::Symbol("b".into())]
        );
        assert_eq!(toks("; only a comment"), vec![]);
    }

    #[test]
    fn strings_decode_escapes() {
        assert_eq!(
            toks(r#""a\nb\tc""#),
            vec![Token::String("a\nb\tc".into())]
        );
        assert_eq!(toks(r#""q\"q""#), vec![Token::String("q\"q".into())]);
        assert_eq!(toks(r#""\w""#), vec![Token::String("w".into())]);
    }

    #[test]
    fn decimal_escapes_eat_all_digits_and_mask() {
        assert_eq!(toks(r#""\65""#), vec![Token::String("A".into())]);
        // 200 & 0x7f == 72 == 'H'
        assert_eq!(toks(r#""\200""#), vec![Token::String("H".into())]);
        assert_eq!(toks(r#""\658""#), vec![Token::String("\u{12}".into())]);
    }

    #[test]
    fn strings_keep_case_and_newlines() {
        assert_eq!(toks("\"Mixed Case\""), vec![Token::String("Mixed Case".into())]);
        let spanned = tokenize("\"a\nb\" c").unwrap();
        assert_eq!(spanned[0].token, Token::String("a\nb".into()));
        assert_eq!(spanned[1].line, 2);
    }

    #[test]
    fn unterminated_string_is_an_error() {
        assert_eq!(
            tokenize("\"abc"),
            Err(ReadError::UnterminatedString { line: 1 })
        );
        assert_eq!(
            tokenize("\"abc\\"),
            Err(ReadError::UnterminatedString { line: 1 })
        );
    }

    #[test]
    fn control_characters_are_rejected() {
        assert_eq!(
            tokenize("a \x01 b"),
            Err(ReadError::BadChar { code: 1, line: 1 })
        );
    }

    #[test]
    fn over_long_tokens_are_rejected() {
        let long = "x".repeat(MAX_TOKEN + 1);
        assert_eq!(tokenize(&long), Err(ReadError::TokenTooLong { line: 1 }));
        let ok = "x".repeat(MAX_TOKEN);
        assert!(tokenize(&ok).is_ok());
    }

    #[test]
    fn lines_are_tracked() {
        let spanned = tokenize("a\nb\n\nc").unwrap();
        let lines: Vec<usize> = spanned.iter().map(|t| t.line).collect();
        assert_eq!(lines, vec![1, 2, 4]);
    }
}
