//! Go tokenizer
//!
//! Token-level parsers are written with nom; the driver loop applies Go's
//! automatic semicolon insertion at line ends. Comments are dropped.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while, take_while1},
    character::complete::{anychar, char, none_of, satisfy},
    combinator::{recognize, value},
    multi::many0,
    sequence::{delimited, pair, preceded},
    IResult,
};

/// A lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Identifier or keyword
    Ident(String),
    /// String literal, already decoded
    Str(String),
    /// Rune literal (source text)
    Rune(String),
    /// Numeric literal (source text)
    Number(String),
    /// Operator or punctuation
    Op(&'static str),
    /// Explicit or inserted `;`
    Semi,
}

impl Token {
    /// True if this token is the given operator.
    pub fn is_op(&self, op: &str) -> bool { matches!(self, Token::Op(o) if *o == op) }

    /// True if this token is the given identifier or keyword.
    pub fn is_ident(&self, ident: &str) -> bool { matches!(self, Token::Ident(i) if i == ident) }
}

/// A token with the line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    /// The token
    pub token: Token,
    /// 1-based line number
    pub line: usize,
}

/// A tokenizer failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct LexError {
    /// 1-based line number
    pub line: usize,
    /// What went wrong
    pub message: String,
}

/// Go keywords. Only `break`, `continue`, `fallthrough` and `return` trigger
/// semicolon insertion.
pub const KEYWORDS: [&str; 25] = [
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

// Longest first so that prefixes never shadow longer operators.
const OPERATORS: [&str; 47] = [
    "<<=", ">>=", "&^=", "...", "&&", "||", "<-", "++", "--", "==", "!=", "<=", ">=", ":=", "<<",
    ">>", "&^", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "+", "-", "*", "/", "%", "&", "|",
    "^", "<", ">", "=", "!", "(", ")", "[", "]", "{", "}", ",", ".", ":", "~",
];

/// Whether `ident` is a Go keyword.
pub fn is_keyword(ident: &str) -> bool { KEYWORDS.contains(&ident) }

fn is_ident_start(c: char) -> bool { c == '_' || c.is_alphabetic() }

fn is_ident_continue(c: char) -> bool { c == '_' || c.is_alphanumeric() }

fn blanks(input: &str) -> IResult<&str, &str> {
    take_while(|c| c == ' ' || c == '\t' || c == '\r')(input)
}

fn line_comment(input: &str) -> IResult<&str, &str> {
    recognize(pair(tag("//"), take_while(|c| c != '\n')))(input)
}

fn block_comment(input: &str) -> IResult<&str, &str> {
    recognize(delimited(tag("/*"), take_until("*/"), tag("*/")))(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(satisfy(is_ident_start), take_while(is_ident_continue)))(input)
}

fn number(input: &str) -> IResult<&str, &str> {
    alt((
        recognize(pair(
            satisfy(|c| c.is_ascii_digit()),
            take_while(|c: char| c.is_alphanumeric() || c == '.' || c == '_'),
        )),
        recognize(pair(char('.'), take_while1(|c: char| c.is_ascii_digit() || c == '_'))),
    ))(input)
}

fn escape(input: &str) -> IResult<&str, &str> { recognize(pair(char('\\'), anychar))(input) }

fn interpreted_string(input: &str) -> IResult<&str, &str> {
    delimited(char('"'), recognize(many0(alt((escape, recognize(none_of("\\\"\n")))))), char('"'))(
        input,
    )
}

fn raw_string(input: &str) -> IResult<&str, &str> {
    delimited(char('`'), take_until("`"), char('`'))(input)
}

fn rune(input: &str) -> IResult<&str, &str> {
    recognize(delimited(char('\''), many0(alt((escape, recognize(none_of("\\'\n"))))), char('\'')))(
        input,
    )
}

fn operator(input: &str) -> IResult<&str, &'static str> {
    for op in OPERATORS {
        if let Ok((rest, _)) = tag::<&str, &str, nom::error::Error<&str>>(op)(input) {
            return Ok((rest, op));
        }
    }
    Err(nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Tag)))
}

fn semicolon(input: &str) -> IResult<&str, ()> { value((), preceded(blanks, char(';')))(input) }

/// Decode the escapes of an interpreted string body.
///
/// Unknown escapes are kept verbatim; the collector only needs the text.
pub fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn triggers_semicolon(token: &Token) -> bool {
    match token {
        Token::Ident(ident) => {
            !is_keyword(ident)
                || matches!(ident.as_str(), "break" | "continue" | "fallthrough" | "return")
        }
        Token::Str(_) | Token::Rune(_) | Token::Number(_) => true,
        Token::Op(op) => matches!(*op, ")" | "]" | "}" | "++" | "--"),
        Token::Semi => false,
    }
}

fn end_of_line(tokens: &mut Vec<Spanned>, line: usize) {
    if tokens.last().is_some_and(|t| triggers_semicolon(&t.token)) {
        tokens.push(Spanned { token: Token::Semi, line });
    }
}

/// Split Go source into tokens.
pub fn tokenize(source: &str) -> Result<Vec<Spanned>, LexError> {
    let mut tokens: Vec<Spanned> = Vec::new();
    let mut input = source;
    let mut line = 1;

    loop {
        if let Ok((rest, _)) = blanks(input) {
            input = rest;
        }
        let Some(c) = input.chars().next() else {
            end_of_line(&mut tokens, line);
            break;
        };

        if c == '\n' {
            end_of_line(&mut tokens, line);
            input = &input[1..];
            line += 1;
            continue;
        }
        if let Ok((rest, _)) = line_comment(input) {
            input = rest;
            continue;
        }
        if input.starts_with("/*") {
            let (rest, comment) = block_comment(input)
                .map_err(|_| LexError { line, message: "unterminated block comment".into() })?;
            let newlines = comment.matches('\n').count();
            if newlines > 0 {
                end_of_line(&mut tokens, line);
                line += newlines;
            }
            input = rest;
            continue;
        }
        if let Ok((rest, ())) = semicolon(input) {
            tokens.push(Spanned { token: Token::Semi, line });
            input = rest;
            continue;
        }

        let start_line = line;
        let (rest, token) = if c == '"' {
            let (rest, body) = interpreted_string(input)
                .map_err(|_| LexError { line, message: "unterminated string literal".into() })?;
            (rest, Token::Str(unescape(body)))
        } else if c == '`' {
            let (rest, body) = raw_string(input)
                .map_err(|_| LexError { line, message: "unterminated raw string literal".into() })?;
            line += body.matches('\n').count();
            (rest, Token::Str(body.replace('\r', "")))
        } else if c == '\'' {
            let (rest, text) = rune(input)
                .map_err(|_| LexError { line, message: "unterminated rune literal".into() })?;
            (rest, Token::Rune(text.to_string()))
        } else if is_ident_start(c) {
            let (rest, ident) = identifier(input)
                .map_err(|_| LexError { line, message: format!("invalid identifier at {:?}", c) })?;
            (rest, Token::Ident(ident.to_string()))
        } else if let Ok((rest, text)) = number(input) {
            (rest, Token::Number(text.to_string()))
        } else if let Ok((rest, op)) = operator(input) {
            (rest, Token::Op(op))
        } else {
            return Err(LexError { line, message: format!("unexpected character {:?}", c) });
        };

        tokens.push(Spanned { token, line: start_line });
        input = rest;
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source).expect("source should tokenize").into_iter().map(|s| s.token).collect()
    }

    #[test]
    fn test_semicolon_insertion() {
        let tokens = kinds("type A struct {\n\tName string\n}\n");
        assert_eq!(
            tokens,
            vec![
                Token::Ident("type".into()),
                Token::Ident("A".into()),
                Token::Ident("struct".into()),
                Token::Op("{"),
                Token::Ident("Name".into()),
                Token::Ident("string".into()),
                Token::Semi,
                Token::Op("}"),
                Token::Semi,
            ]
        );
    }

    #[test]
    fn test_strings_and_comments() {
        let tokens = kinds("X int `json:\"x\"` // trailing\n/* block\n comment */ \"a\\\"b\"");
        assert_eq!(
            tokens,
            vec![
                Token::Ident("X".into()),
                Token::Ident("int".into()),
                Token::Str("json:\"x\"".into()),
                Token::Semi,
                Token::Str("a\"b".into()),
                Token::Semi,
            ]
        );
    }

    #[test]
    fn test_operators_prefer_longest_match() {
        let tokens = kinds("a <-chan b ... c &^= d");
        assert!(tokens.contains(&Token::Op("<-")));
        assert!(tokens.contains(&Token::Op("...")));
        assert!(tokens.contains(&Token::Op("&^=")));
    }

    #[test]
    fn test_line_numbers_follow_raw_strings() {
        let spanned = tokenize("A `x\ny`\nB").expect("source should tokenize");
        let b = spanned.iter().find(|s| s.token.is_ident("B")).expect("B should be lexed");
        assert_eq!(b.line, 3);
    }

    #[test]
    fn test_unterminated_string_is_an_error() {
        let err = tokenize("package p\nvar s = \"oops\n").expect_err("string is unterminated");
        assert_eq!(err.line, 2);
    }
}
