//! Turtle and N3 tokens.

use std::fmt;

/// A token and the byte offset where it starts.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) start: usize,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, start: usize) -> Self {
        Self { kind, start }
    }
}

/// Token kinds. Strings and IRIs are already unescaped; numeric tokens keep
/// their lexical form.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum TokenKind {
    // IRIs
    /// `<...>`, possibly relative.
    Iri(String),
    /// `prefix:local`; either part may be empty.
    PrefixedName { prefix: String, local: String },

    // Blank nodes
    /// `_:label`
    BlankNodeLabel(String),
    /// `[]`
    Anon,
    /// `()`
    Nil,

    // Literals
    String(String),
    Integer(String),
    Decimal(String),
    Double(String),
    /// Without the `@`.
    LangTag(String),

    // Keywords
    KwPrefix,
    KwBase,
    KwSparqlPrefix,
    KwSparqlBase,
    KwA,
    KwTrue,
    KwFalse,

    // Punctuation
    Dot,
    Comma,
    Semicolon,
    DoubleCaret,
    LBracket,
    RBracket,
    LParen,
    RParen,

    // N3 only
    /// `=`
    Equals,
    /// `=>`
    Implies,
    /// `<=`
    ImpliedBy,
    KwHas,
    KwIs,
    KwOf,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `?name`
    Variable(String),
    /// `@forAll` or `@forSome`.
    Quantifier(String),

    /// A bare word before keyword resolution; never reaches the parser.
    Word(String),

    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Iri(s) => write!(f, "<{s}>"),
            TokenKind::PrefixedName { prefix, local } => write!(f, "{prefix}:{local}"),
            TokenKind::BlankNodeLabel(s) => write!(f, "_:{s}"),
            TokenKind::Anon => f.write_str("[]"),
            TokenKind::Nil => f.write_str("()"),
            TokenKind::String(s) => write!(f, "{s:?}"),
            TokenKind::Integer(s) | TokenKind::Decimal(s) | TokenKind::Double(s) => {
                f.write_str(s)
            }
            TokenKind::LangTag(s) => write!(f, "@{s}"),
            TokenKind::KwPrefix => f.write_str("@prefix"),
            TokenKind::KwBase => f.write_str("@base"),
            TokenKind::KwSparqlPrefix => f.write_str("PREFIX"),
            TokenKind::KwSparqlBase => f.write_str("BASE"),
            TokenKind::KwA => f.write_str("a"),
            TokenKind::KwTrue => f.write_str("true"),
            TokenKind::KwFalse => f.write_str("false"),
            TokenKind::Dot => f.write_str("'.'"),
            TokenKind::Comma => f.write_str("','"),
            TokenKind::Semicolon => f.write_str("';'"),
            TokenKind::DoubleCaret => f.write_str("'^^'"),
            TokenKind::LBracket => f.write_str("'['"),
            TokenKind::RBracket => f.write_str("']'"),
            TokenKind::LParen => f.write_str("'('"),
            TokenKind::RParen => f.write_str("')'"),
            TokenKind::Equals => f.write_str("'='"),
            TokenKind::Implies => f.write_str("'=>'"),
            TokenKind::ImpliedBy => f.write_str("'<='"),
            TokenKind::KwHas => f.write_str("has"),
            TokenKind::KwIs => f.write_str("is"),
            TokenKind::KwOf => f.write_str("of"),
            TokenKind::LBrace => f.write_str("'{'"),
            TokenKind::RBrace => f.write_str("'}'"),
            TokenKind::Variable(s) => write!(f, "?{s}"),
            TokenKind::Quantifier(s) => write!(f, "@{s}"),
            TokenKind::Word(s) => f.write_str(s),
            TokenKind::Eof => f.write_str("end of input"),
        }
    }
}
