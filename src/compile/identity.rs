//! Inference of the fully qualified name a Java source file must be stored
//! under.
//!
//! `javac` requires a file holding a public top-level type to be named after
//! that type and placed under its package directory. Instead of parsing Java,
//! a small lexer walks the text tracking brace depth, the `package` clause,
//! and whether a `public` modifier is pending at depth 0.

use std::path::PathBuf;

use rand::RngCore;

use super::random::FallbackNamer;

/// Keywords that open a type declaration and consume a pending `public`.
const TYPE_KEYWORDS: [&str; 4] = ["class", "interface", "enum", "record"];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Word(String),
    Symbol(char),
    /// A string, char or text-block literal. Its contents are discarded.
    Literal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    LineComment,
    BlockComment,
    Word,
    Quote(char),
    TextBlock,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    state: State,
    word: String,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            state: State::Normal,
            word: String::new(),
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek(0)?;
        self.pos += 1;
        Some(c)
    }

    fn next_token(&mut self) -> Option<Token> {
        loop {
            match self.state {
                State::Normal => {
                    let c = self.bump()?;
                    match c {
                        c if is_word_char(c) => {
                            self.word.push(c);
                            self.state = State::Word;
                        }
                        c if c.is_whitespace() => {}
                        '/' if self.peek(0) == Some('/') => {
                            self.pos += 1;
                            self.state = State::LineComment;
                        }
                        '/' if self.peek(0) == Some('*') => {
                            self.pos += 1;
                            self.state = State::BlockComment;
                        }
                        '"' if self.peek(0) == Some('"') && self.peek(1) == Some('"') => {
                            self.pos += 2;
                            self.state = State::TextBlock;
                        }
                        '"' | '\'' => self.state = State::Quote(c),
                        c => return Some(Token::Symbol(c)),
                    }
                }
                State::Word => match self.peek(0) {
                    Some(c) if is_word_char(c) => {
                        self.pos += 1;
                        self.word.push(c);
                    }
                    _ => {
                        self.state = State::Normal;
                        return Some(Token::Word(std::mem::take(&mut self.word)));
                    }
                },
                State::LineComment => {
                    if self.bump()? == '\n' {
                        self.state = State::Normal;
                    }
                }
                State::BlockComment => {
                    if self.bump()? == '*' && self.peek(0) == Some('/') {
                        self.pos += 1;
                        self.state = State::Normal;
                    }
                }
                State::Quote(quote) => {
                    let c = self.bump()?;
                    if c == '\\' {
                        self.pos += 1;
                    } else if c == quote || c == '\n' {
                        self.state = State::Normal;
                        return Some(Token::Literal);
                    }
                }
                State::TextBlock => {
                    let c = self.bump()?;
                    if c == '\\' {
                        self.pos += 1;
                    } else if c == '"' && self.peek(0) == Some('"') && self.peek(1) == Some('"') {
                        self.pos += 2;
                        self.state = State::Normal;
                        return Some(Token::Literal);
                    }
                }
            }
        }
    }
}

/// Outcome of scanning one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeScan {
    /// Package name with a trailing dot, or empty for the default package.
    pub package_prefix: String,
    /// Simple name of the first public top-level type, if any.
    pub public_type: Option<String>,
}

impl TypeScan {
    /// Dotted identity of the file. Sources without a public type get a
    /// placeholder name from `namer`.
    pub fn into_identity<R: RngCore>(self, namer: &mut FallbackNamer<R>) -> String {
        let name = match self.public_type {
            Some(name) => name,
            None => namer.next_suffix(),
        };
        self.package_prefix + &name
    }
}

/// Scans Java source text for its package and first public top-level type.
pub fn scan_source(source: &str) -> TypeScan {
    let mut lexer = Lexer::new(source);
    let mut scan = TypeScan::default();
    let mut depth: i64 = 0;
    let mut pending_public = false;
    let mut awaiting_name = false;
    let mut after_dot = false;

    while let Some(token) = lexer.next_token() {
        let follows_dot = std::mem::replace(&mut after_dot, token == Token::Symbol('.'));
        if std::mem::take(&mut awaiting_name) {
            if let Token::Word(name) = token {
                scan.public_type = Some(name);
                return scan;
            }
        }
        match token {
            Token::Symbol('{') => depth += 1,
            Token::Symbol('}') => depth -= 1,
            Token::Word(word) if depth == 0 => match word.as_str() {
                "package" => scan.package_prefix = read_package(&mut lexer),
                "public" => pending_public = true,
                // `Foo.class` and the like are class literals, not declarations.
                kw if TYPE_KEYWORDS.contains(&kw) && !follows_dot => {
                    awaiting_name = std::mem::take(&mut pending_public);
                }
                _ => {}
            },
            _ => {}
        }
    }
    scan
}

/// Consumes a package clause up to its `;`, returning `a.b.c.`.
fn read_package(lexer: &mut Lexer) -> String {
    let mut prefix = String::new();
    while let Some(token) = lexer.next_token() {
        match token {
            Token::Symbol(';') => break,
            Token::Word(part) => {
                prefix.push_str(&part);
                prefix.push('.');
            }
            _ => {}
        }
    }
    prefix
}

/// Path, relative to the staging root, that a source with `identity` must be
/// stored at: `a.b.Foo` becomes `a/b/Foo.java`.
pub fn staged_relative_path(identity: &str) -> PathBuf {
    let mut path: PathBuf = identity.split('.').collect();
    path.set_extension("java");
    path
}
