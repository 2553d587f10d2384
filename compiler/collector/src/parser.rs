//! Declaration-level Go parser
//!
//! Reads the package clause, imports and `type` declarations of a single
//! file. Function, variable and constant declarations are skipped by
//! balanced-bracket scanning, so their bodies never need to be understood.

use crate::lexer::{is_keyword, tokenize, LexError, Spanned, Token};

/// A parsed Go source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Name from the `package` clause
    pub package: String,
    /// Import declarations in source order
    pub imports: Vec<ImportSpec>,
    /// Type declarations in source order
    pub types: Vec<TypeSpec>,
}

/// One imported package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Explicit name (`_`, `.` or an identifier), if any
    pub alias: Option<String>,
    /// Import path
    pub path: String,
}

impl ImportSpec {
    /// The identifier this import is referenced by inside the file.
    ///
    /// Without an explicit alias this is the last path element, which is the
    /// package name for conventionally laid out modules.
    pub fn local_name(&self) -> &str {
        match &self.alias {
            Some(alias) => alias,
            None => self.path.rsplit('/').next().unwrap_or(&self.path),
        }
    }
}

/// One `type` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    /// Declared name
    pub name: String,
    /// `type A = B`
    pub alias: bool,
    /// Declared with type parameters
    pub generic: bool,
    /// Right-hand side
    pub ty: TypeExpr,
    /// Line of the declared name
    pub line: usize,
}

/// A type expression as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// `Name` or `pkg.Name`; type arguments are dropped
    Name {
        /// Package qualifier
        qualifier: Option<String>,
        /// Type name
        name: String,
    },
    /// `*T`
    Pointer(Box<TypeExpr>),
    /// `[]T`
    Slice(Box<TypeExpr>),
    /// `[N]T`
    Array {
        /// Length expression as source text
        len: String,
        /// Element type
        elem: Box<TypeExpr>,
    },
    /// `map[K]V`
    Map {
        /// Key type
        key: Box<TypeExpr>,
        /// Value type
        value: Box<TypeExpr>,
    },
    /// `struct { ... }`
    Struct(Vec<FieldSpec>),
    /// `interface { ... }`
    Interface {
        /// No methods and no embedded constraints
        empty: bool,
    },
    /// `func(...) ...`
    Func,
    /// `chan T`, `<-chan T`, `chan<- T`
    Chan(Box<TypeExpr>),
}

impl TypeExpr {
    /// The bare type name an embedded field is known by.
    pub fn embedded_name(&self) -> Option<&str> {
        match self {
            TypeExpr::Name { name, .. } => Some(name),
            TypeExpr::Pointer(inner) => inner.embedded_name(),
            _ => None,
        }
    }
}

/// One field declaration line inside a struct literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Declared names; empty for an embedded field
    pub names: Vec<String>,
    /// Declared type
    pub ty: TypeExpr,
    /// Raw struct tag, empty when absent
    pub tag: String,
}

/// A parse failure, reported with the line it occurred on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Tokenizer failure
    #[error(transparent)]
    Lex(#[from] LexError),
    /// Unexpected token or end of input
    #[error("line {line}: {message}")]
    Syntax {
        /// 1-based line number
        line: usize,
        /// What was expected
        message: String,
    },
}

/// Parse a complete Go source file.
pub fn parse_file(source: &str) -> Result<SourceFile, ParseError> {
    let tokens = tokenize(source)?;
    Parser::new(&tokens).file()
}

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Spanned]) -> Self { Self { tokens, pos: 0 } }

    fn peek(&self) -> Option<&'a Token> { self.peek_at(0) }

    fn peek_at(&self, offset: usize) -> Option<&'a Token> {
        self.tokens.get(self.pos + offset).map(|s| &s.token)
    }

    fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|s| s.line)
            .unwrap_or(1)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn error<T>(&self, message: impl Into<String>) -> Result<T, ParseError> {
        Err(ParseError::Syntax { line: self.line(), message: message.into() })
    }

    fn describe(&self) -> String {
        match self.peek() {
            Some(Token::Ident(i)) => format!("{:?}", i),
            Some(Token::Str(_)) => "string literal".to_string(),
            Some(Token::Rune(r)) => r.clone(),
            Some(Token::Number(n)) => n.clone(),
            Some(Token::Op(op)) => format!("{:?}", op),
            Some(Token::Semi) => "newline or \";\"".to_string(),
            None => "end of file".to_string(),
        }
    }

    fn eat_op(&mut self, op: &str) -> bool {
        if self.peek().is_some_and(|t| t.is_op(op)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_semis(&mut self) {
        while matches!(self.peek(), Some(Token::Semi)) {
            self.pos += 1;
        }
    }

    fn expect_op(&mut self, op: &str) -> Result<(), ParseError> {
        if self.eat_op(op) {
            Ok(())
        } else {
            self.error(format!("expected {:?}, found {}", op, self.describe()))
        }
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Some(Token::Ident(ident)) if !is_keyword(ident) => {
                self.pos += 1;
                Ok(ident.clone())
            }
            _ => self.error(format!("expected identifier, found {}", self.describe())),
        }
    }

    /// Ends a spec or field: `;`, or nothing before a closing bracket.
    fn expect_terminator(&mut self, close: &str) -> Result<(), ParseError> {
        match self.peek() {
            Some(Token::Semi) => {
                self.pos += 1;
                Ok(())
            }
            Some(token) if token.is_op(close) => Ok(()),
            None => Ok(()),
            _ => self.error(format!("expected newline or \";\", found {}", self.describe())),
        }
    }

    /// Skip past the bracket that closes the one just consumed.
    fn skip_balanced(&mut self, open: &str, close: &str) -> Result<Vec<&'a Token>, ParseError> {
        let mut depth = 1usize;
        let mut inner = Vec::new();
        while let Some(token) = self.advance() {
            if token.is_op(open) {
                depth += 1;
            } else if token.is_op(close) {
                depth -= 1;
                if depth == 0 {
                    return Ok(inner);
                }
            }
            inner.push(token);
        }
        self.error(format!("unbalanced {:?}", open))
    }

    /// Skip a top-level declaration up to its terminating `;`.
    fn skip_declaration(&mut self) {
        let mut depth = 0usize;
        while let Some(token) = self.advance() {
            match token {
                Token::Op("(" | "[" | "{") => depth += 1,
                Token::Op(")" | "]" | "}") => depth = depth.saturating_sub(1),
                Token::Semi if depth == 0 => return,
                _ => {}
            }
        }
    }

    fn file(mut self) -> Result<SourceFile, ParseError> {
        self.eat_semis();
        if !self.peek().is_some_and(|t| t.is_ident("package")) {
            return self.error(format!("expected package clause, found {}", self.describe()));
        }
        self.pos += 1;
        let package = self.expect_ident()?;
        self.expect_terminator(";")?;

        let mut imports = Vec::new();
        let mut types = Vec::new();
        loop {
            self.eat_semis();
            match self.peek() {
                None => break,
                Some(token) if token.is_ident("import") => {
                    self.pos += 1;
                    self.grouped(&mut imports, Self::import_spec)?;
                }
                Some(token) if token.is_ident("type") => {
                    self.pos += 1;
                    self.grouped(&mut types, Self::type_spec)?;
                }
                Some(_) => self.skip_declaration(),
            }
        }

        Ok(SourceFile { package, imports, types })
    }

    /// Parse either one spec or a parenthesised group of specs.
    fn grouped<T>(
        &mut self,
        out: &mut Vec<T>,
        spec: fn(&mut Self) -> Result<T, ParseError>,
    ) -> Result<(), ParseError> {
        if self.eat_op("(") {
            loop {
                self.eat_semis();
                if self.eat_op(")") {
                    break;
                }
                if self.peek().is_none() {
                    return self.error("unterminated declaration group");
                }
                out.push(spec(self)?);
                self.expect_terminator(")")?;
            }
            self.expect_terminator(";")
        } else {
            out.push(spec(self)?);
            self.expect_terminator(";")
        }
    }

    fn import_spec(&mut self) -> Result<ImportSpec, ParseError> {
        let alias = match self.peek() {
            Some(Token::Ident(name)) => {
                self.pos += 1;
                Some(name.clone())
            }
            Some(token) if token.is_op(".") => {
                self.pos += 1;
                Some(".".to_string())
            }
            _ => None,
        };
        match self.advance() {
            Some(Token::Str(path)) => Ok(ImportSpec { alias, path: path.clone() }),
            _ => {
                self.pos = self.pos.saturating_sub(1);
                self.error(format!("expected import path, found {}", self.describe()))
            }
        }
    }

    fn type_spec(&mut self) -> Result<TypeSpec, ParseError> {
        let line = self.line();
        let name = self.expect_ident()?;
        let mut generic = false;
        if self.peek().is_some_and(|t| t.is_op("[")) && self.at_type_parameters() {
            self.pos += 1;
            self.skip_balanced("[", "]")?;
            generic = true;
        }
        let alias = self.eat_op("=");
        let ty = self.type_expr()?;
        Ok(TypeSpec { name, alias, generic, ty, line })
    }

    /// Tell `type T[P any] ...` apart from `type T [N]E`.
    fn at_type_parameters(&self) -> bool {
        match (self.peek_at(1), self.peek_at(2)) {
            (Some(Token::Ident(_)), Some(Token::Ident(_))) => true,
            (Some(Token::Ident(_)), Some(next)) => next.is_op(",") || next.is_op("~") || next.is_op("["),
            _ => false,
        }
    }

    fn type_expr(&mut self) -> Result<TypeExpr, ParseError> {
        let Some(token) = self.peek() else {
            return self.error("expected type, found end of file");
        };
        match token {
            Token::Ident(kw) if kw == "map" => {
                self.pos += 1;
                self.expect_op("[")?;
                let key = self.type_expr()?;
                self.expect_op("]")?;
                let value = self.type_expr()?;
                Ok(TypeExpr::Map { key: Box::new(key), value: Box::new(value) })
            }
            Token::Ident(kw) if kw == "struct" => {
                self.pos += 1;
                self.struct_body()
            }
            Token::Ident(kw) if kw == "interface" => {
                self.pos += 1;
                self.expect_op("{")?;
                let inner = self.skip_balanced("{", "}")?;
                Ok(TypeExpr::Interface { empty: inner.iter().all(|t| matches!(t, Token::Semi)) })
            }
            Token::Ident(kw) if kw == "func" => {
                self.pos += 1;
                self.signature()?;
                Ok(TypeExpr::Func)
            }
            Token::Ident(kw) if kw == "chan" => {
                self.pos += 1;
                self.eat_op("<-");
                Ok(TypeExpr::Chan(Box::new(self.type_expr()?)))
            }
            Token::Ident(_) => self.type_name(),
            Token::Op("<-") => {
                self.pos += 1;
                if !self.peek().is_some_and(|t| t.is_ident("chan")) {
                    return self.error(format!("expected \"chan\", found {}", self.describe()));
                }
                self.pos += 1;
                Ok(TypeExpr::Chan(Box::new(self.type_expr()?)))
            }
            Token::Op("*") => {
                self.pos += 1;
                Ok(TypeExpr::Pointer(Box::new(self.type_expr()?)))
            }
            Token::Op("[") => {
                self.pos += 1;
                if self.eat_op("]") {
                    return Ok(TypeExpr::Slice(Box::new(self.type_expr()?)));
                }
                let len = self.skip_balanced("[", "]")?.iter().map(|t| token_text(t)).collect();
                Ok(TypeExpr::Array { len, elem: Box::new(self.type_expr()?) })
            }
            Token::Op("(") => {
                self.pos += 1;
                let inner = self.type_expr()?;
                self.expect_op(")")?;
                Ok(inner)
            }
            _ => self.error(format!("expected type, found {}", self.describe())),
        }
    }

    fn type_name(&mut self) -> Result<TypeExpr, ParseError> {
        let first = self.expect_ident()?;
        let (qualifier, name) = if self.eat_op(".") {
            (Some(first), self.expect_ident()?)
        } else {
            (None, first)
        };
        if self.eat_op("[") {
            self.skip_balanced("[", "]")?;
        }
        Ok(TypeExpr::Name { qualifier, name })
    }

    fn signature(&mut self) -> Result<(), ParseError> {
        self.expect_op("(")?;
        self.skip_balanced("(", ")")?;
        match self.peek() {
            Some(token) if token.is_op("(") => {
                self.pos += 1;
                self.skip_balanced("(", ")")?;
            }
            Some(token) if starts_type(token) => {
                self.type_expr()?;
            }
            _ => {}
        }
        Ok(())
    }

    fn struct_body(&mut self) -> Result<TypeExpr, ParseError> {
        self.expect_op("{")?;
        let mut fields = Vec::new();
        loop {
            self.eat_semis();
            if self.eat_op("}") {
                break;
            }
            if self.peek().is_none() {
                return self.error("unterminated struct literal");
            }
            fields.push(self.field_spec()?);
            self.expect_terminator("}")?;
        }
        Ok(TypeExpr::Struct(fields))
    }

    fn field_spec(&mut self) -> Result<FieldSpec, ParseError> {
        let embedded = match (self.peek(), self.peek_at(1)) {
            (Some(token), _) if token.is_op("*") => true,
            (Some(Token::Ident(_)), Some(next)) => {
                next.is_op(".") || next.is_op("}") || matches!(next, Token::Semi | Token::Str(_))
            }
            (Some(Token::Ident(_)), None) => true,
            _ => false,
        };

        let (names, ty) = if embedded {
            (Vec::new(), self.type_expr()?)
        } else {
            let mut names = vec![self.expect_ident()?];
            while self.eat_op(",") {
                names.push(self.expect_ident()?);
            }
            (names, self.type_expr()?)
        };

        let tag = match self.peek() {
            Some(Token::Str(tag)) => {
                self.pos += 1;
                tag.clone()
            }
            _ => String::new(),
        };

        Ok(FieldSpec { names, ty, tag })
    }
}

fn starts_type(token: &Token) -> bool {
    match token {
        Token::Ident(ident) => {
            !is_keyword(ident) || matches!(ident.as_str(), "map" | "struct" | "interface" | "func" | "chan")
        }
        Token::Op(op) => matches!(*op, "*" | "[" | "<-" | "("),
        _ => false,
    }
}

fn token_text(token: &Token) -> String {
    match token {
        Token::Ident(text) | Token::Rune(text) | Token::Number(text) => text.clone(),
        Token::Str(text) => format!("{:?}", text),
        Token::Op(op) => op.to_string(),
        Token::Semi => ";".to_string(),
    }
}
