//! On-demand tokenizer for Turtle and N3.
//!
//! Tokens are produced one at a time as the parser asks for them, so a
//! lexical fault late in a document does not prevent the statements before
//! it from being delivered.

use winnow::ascii::digit1;
use winnow::combinator::{alt, opt, preceded};
use winnow::error::ContextError;
use winnow::stream::{AsChar, Location, Offset, Stream};
use winnow::token::{any, one_of, take_till, take_while};
use winnow::{ModalResult, Parser};

use super::token::{Token, TokenKind};
use super::Dialect;
use crate::error::SyntaxError;
use crate::grammar::lex::{self, backtrack, is_pn_chars, is_pn_chars_base, is_pn_chars_u, Input};

/// Tokenizer over an owned document.
pub(crate) struct Lexer {
    text: String,
    pos: usize,
    dialect: Dialect,
    /// The last token was a string, so `@word` is its language tag.
    after_string: bool,
}

impl Lexer {
    pub(crate) fn new(text: String, dialect: Dialect) -> Self {
        let pos = if text.starts_with('\u{FEFF}') { '\u{FEFF}'.len_utf8() } else { 0 };
        Self { text, pos, dialect, after_string: false }
    }

    /// The whole document, for error positions.
    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    /// Lexes the next token. At the end of input this keeps returning
    /// [`TokenKind::Eof`].
    pub(crate) fn next_token(&mut self) -> Result<Token, SyntaxError> {
        let mut input = Input::new(&self.text[self.pos..]);
        skip_ws_and_comments(&mut input);
        let start = self.pos + input.current_token_start();

        if input.is_empty() {
            self.pos = start;
            return Ok(Token::new(TokenKind::Eof, start));
        }

        let kind = match next_token(&mut input, self.dialect, self.after_string) {
            Ok(kind) => kind,
            Err(_) => return Err(self.error_at(start)),
        };
        let end = self.pos + input.current_token_start();
        self.pos = end;

        let kind = match kind {
            TokenKind::Word(word) => match keyword(&word, self.dialect) {
                Some(kind) => kind,
                None => {
                    return Err(SyntaxError::at(
                        &self.text,
                        start,
                        format!("unknown keyword '{word}'"),
                    ))
                }
            },
            other => other,
        };
        self.after_string = matches!(kind, TokenKind::String(_));
        Ok(Token::new(kind, start))
    }

    fn error_at(&self, offset: usize) -> SyntaxError {
        let bad = self.text[offset..].chars().next().unwrap_or(' ');
        let message = match bad {
            '"' | '\'' => "unterminated or malformed string literal".to_owned(),
            '<' => "invalid or unterminated IRI".to_owned(),
            '_' => "malformed blank node label".to_owned(),
            '@' => "malformed directive or language tag".to_owned(),
            c if c.is_control() || !c.is_ascii() => {
                format!("unexpected character U+{:04X}", c as u32)
            }
            c => format!("unexpected character '{c}'"),
        };
        SyntaxError::at(&self.text, offset, message)
    }
}

fn keyword(word: &str, dialect: Dialect) -> Option<TokenKind> {
    match word {
        "a" => Some(TokenKind::KwA),
        "true" => Some(TokenKind::KwTrue),
        "false" => Some(TokenKind::KwFalse),
        w if w.eq_ignore_ascii_case("prefix") => Some(TokenKind::KwSparqlPrefix),
        w if w.eq_ignore_ascii_case("base") => Some(TokenKind::KwSparqlBase),
        "has" if dialect == Dialect::N3 => Some(TokenKind::KwHas),
        "is" if dialect == Dialect::N3 => Some(TokenKind::KwIs),
        "of" if dialect == Dialect::N3 => Some(TokenKind::KwOf),
        _ => None,
    }
}

fn skip_ws_and_comments(input: &mut Input<'_>) {
    loop {
        let _: ModalResult<&str, ContextError> = take_while(0.., lex::is_ws).parse_next(input);

        if input.starts_with('#') {
            let _: ModalResult<&str, ContextError> =
                take_till(0.., |c| c == '\n' || c == '\r').parse_next(input);
        } else {
            break;
        }
    }
}

/// Dispatches on the first character.
fn next_token(input: &mut Input<'_>, dialect: Dialect, after_string: bool) -> ModalResult<TokenKind> {
    let n3 = dialect == Dialect::N3;
    let first = input.chars().next().ok_or_else(backtrack)?;

    match first {
        '<' => {
            if let Some(iri) = opt(lex::iri_ref).parse_next(input)? {
                Ok(TokenKind::Iri(iri))
            } else if n3 && input.starts_with("<=") {
                "<=".value(TokenKind::ImpliedBy).parse_next(input)
            } else {
                Err(backtrack())
            }
        }
        '_' => lex::blank_node_label.map(TokenKind::BlankNodeLabel).parse_next(input),
        '[' => alt((
            ('[', take_while(0.., lex::is_ws), ']').value(TokenKind::Anon),
            '['.value(TokenKind::LBracket),
        ))
        .parse_next(input),
        '(' => alt((
            ('(', take_while(0.., lex::is_ws), ')').value(TokenKind::Nil),
            '('.value(TokenKind::LParen),
        ))
        .parse_next(input),
        '@' if after_string => lex::lang_tag.map(TokenKind::LangTag).parse_next(input),
        '@' => at_keyword(input),
        '"' | '\'' => string_literal(input),
        '0'..='9' | '+' | '-' => number(input),
        '.' => {
            if input.chars().nth(1).is_some_and(|c| c.is_ascii_digit()) {
                number(input)
            } else {
                '.'.value(TokenKind::Dot).parse_next(input)
            }
        }
        '^' => "^^".value(TokenKind::DoubleCaret).parse_next(input),
        ',' => ','.value(TokenKind::Comma).parse_next(input),
        ';' => ';'.value(TokenKind::Semicolon).parse_next(input),
        ']' => ']'.value(TokenKind::RBracket).parse_next(input),
        ')' => ')'.value(TokenKind::RParen).parse_next(input),
        '=' if n3 => alt((
            "=>".value(TokenKind::Implies),
            '='.value(TokenKind::Equals),
        ))
        .parse_next(input),
        '{' if n3 => '{'.value(TokenKind::LBrace).parse_next(input),
        '}' if n3 => '}'.value(TokenKind::RBrace).parse_next(input),
        '?' if n3 => preceded('?', take_while(1.., is_pn_chars))
            .map(|name: &str| TokenKind::Variable(name.to_owned()))
            .parse_next(input),
        c if c == ':' || is_pn_chars_base(c) => prefixed_name_or_word(input),
        _ => Err(backtrack()),
    }
}

/// `@prefix`, `@base`, the N3 quantifiers, or a language tag.
fn at_keyword(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let tag = lex::lang_tag(input)?;
    Ok(match tag.as_str() {
        "prefix" => TokenKind::KwPrefix,
        "base" => TokenKind::KwBase,
        "forAll" | "forSome" => TokenKind::Quantifier(tag),
        _ => TokenKind::LangTag(tag),
    })
}

fn string_literal(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    alt((
        lex::long_string('"'),
        lex::long_string('\''),
        lex::short_string('"'),
        lex::short_string('\''),
    ))
    .map(TokenKind::String)
    .parse_next(input)
}

/// `INTEGER`, `DECIMAL` or `DOUBLE`, keeping the lexical form.
fn number(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let checkpoint = input.checkpoint();
    let _ = opt(one_of(['+', '-'])).parse_next(input)?;
    let whole: Option<&str> = opt(digit1).parse_next(input)?;

    // A '.' only belongs to the number when digits (or an exponent) follow;
    // otherwise it ends the statement.
    let mut fraction = false;
    if input.starts_with('.') {
        let after = input.chars().nth(1);
        let continues = after.is_some_and(|c| c.is_ascii_digit())
            || (whole.is_some() && matches!(after, Some('e' | 'E')));
        if continues {
            '.'.parse_next(input)?;
            let _: Option<&str> = opt(digit1).parse_next(input)?;
            fraction = true;
        }
    }
    if whole.is_none() && !fraction {
        input.reset(&checkpoint);
        return Err(backtrack());
    }

    let exponent = opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1)).parse_next(input)?;

    let end = input.checkpoint();
    input.reset(&checkpoint);
    let consumed = end.offset_from(&checkpoint);
    let lexical: &str = winnow::token::take(consumed).parse_next(input)?;
    let lexical = lexical.to_owned();

    Ok(match (fraction, exponent.is_some()) {
        (_, true) => TokenKind::Double(lexical),
        (true, false) => TokenKind::Decimal(lexical),
        (false, false) => TokenKind::Integer(lexical),
    })
}

/// A prefixed name (`ex:thing`, `:thing`, `ex:`) or a bare word for keyword
/// resolution.
fn prefixed_name_or_word(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let checkpoint = input.checkpoint();
    let prefix = if input.starts_with(':') {
        String::new()
    } else {
        pn_prefix(input)?
    };

    if !input.starts_with(':') {
        if prefix.chars().all(|c| c.is_ascii_alphabetic()) {
            return Ok(TokenKind::Word(prefix));
        }
        input.reset(&checkpoint);
        return Err(backtrack());
    }
    ':'.parse_next(input)?;

    let local = match input.chars().next() {
        Some(c) if is_pn_local_start(c) => pn_local(input)?,
        _ => String::new(),
    };
    Ok(TokenKind::PrefixedName { prefix, local })
}

/// `PN_PREFIX ::= PN_CHARS_BASE ((PN_CHARS | '.')* PN_CHARS)?`
fn pn_prefix(input: &mut Input<'_>) -> ModalResult<String> {
    let first: char = any.verify(|c: &char| is_pn_chars_base(*c)).parse_next(input)?;
    let mut name = String::from(first);
    loop {
        let chunk: &str = take_while(0.., is_pn_chars).parse_next(input)?;
        name.push_str(chunk);
        if input.starts_with('.') && input.chars().nth(1).is_some_and(is_pn_chars) {
            '.'.parse_next(input)?;
            name.push('.');
        } else {
            break;
        }
    }
    Ok(name)
}

fn is_pn_local_start(c: char) -> bool {
    is_pn_chars_u(c) || c == ':' || c.is_ascii_digit() || c == '%' || c == '\\'
}

fn continues_local(c: char) -> bool {
    is_pn_chars(c) || c == ':' || c == '%' || c == '\\'
}

/// `PN_LOCAL`, with `\`-escapes removed and `%XX` kept verbatim.
fn pn_local(input: &mut Input<'_>) -> ModalResult<String> {
    let mut local = String::new();

    loop {
        let chunk: &str =
            take_while(0.., |c: char| is_pn_chars(c) || c == ':').parse_next(input)?;
        local.push_str(chunk);

        if input.starts_with('.') {
            if input.chars().nth(1).is_some_and(continues_local) {
                '.'.parse_next(input)?;
                local.push('.');
                continue;
            }
            break;
        }

        if input.starts_with('%') {
            let escape: &str =
                ('%', take_while(2..=2, AsChar::is_hex_digit)).take().parse_next(input)?;
            local.push_str(escape);
        } else if input.starts_with('\\') {
            '\\'.parse_next(input)?;
            let escaped: char = any.parse_next(input)?;
            if !"_~.-!$&'()*+,;=/?#@%".contains(escaped) {
                return Err(backtrack());
            }
            local.push(escaped);
        } else {
            break;
        }
    }

    Ok(local)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn kinds(text: &str, dialect: Dialect) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(text.to_owned(), dialect);
        let mut out = Vec::new();
        loop {
            let token = lexer.next_token().unwrap();
            if token.kind == TokenKind::Eof {
                return out;
            }
            out.push(token.kind);
        }
    }

    fn name(prefix: &str, local: &str) -> TokenKind {
        TokenKind::PrefixedName {
            prefix: prefix.to_owned(),
            local: local.to_owned(),
        }
    }

    #[test]
    fn directives_and_names() {
        assert_eq!(
            kinds("@prefix ex: <http://e/> . PREFIX : <http://d/>", Dialect::Turtle),
            vec![
                TokenKind::KwPrefix,
                name("ex", ""),
                TokenKind::Iri("http://e/".to_owned()),
                TokenKind::Dot,
                TokenKind::KwSparqlPrefix,
                name("", ""),
                TokenKind::Iri("http://d/".to_owned()),
            ]
        );
    }

    #[test]
    fn trailing_dot_ends_the_statement() {
        assert_eq!(
            kinds("ex:a.b ex:p ex:c.", Dialect::Turtle),
            vec![name("ex", "a.b"), name("ex", "p"), name("ex", "c"), TokenKind::Dot]
        );
        assert_eq!(
            kinds("_:b1.", Dialect::Turtle),
            vec![TokenKind::BlankNodeLabel("b1".to_owned()), TokenKind::Dot]
        );
    }

    #[test]
    fn local_name_escapes() {
        assert_eq!(
            kinds(r"ex:a\-b%20c", Dialect::Turtle),
            vec![name("ex", "a-b%20c")]
        );
    }

    #[test]
    fn numbers_keep_their_lexical_form() {
        assert_eq!(
            kinds("1 -2 +3.50 .5 1e10 1.E-2 4.", Dialect::Turtle),
            vec![
                TokenKind::Integer("1".to_owned()),
                TokenKind::Integer("-2".to_owned()),
                TokenKind::Decimal("+3.50".to_owned()),
                TokenKind::Decimal(".5".to_owned()),
                TokenKind::Double("1e10".to_owned()),
                TokenKind::Double("1.E-2".to_owned()),
                TokenKind::Integer("4".to_owned()),
                TokenKind::Dot,
            ]
        );
    }

    #[test]
    fn strings_and_tags() {
        assert_eq!(
            kinds(r#""a\nb"@en-GB '''x'y''' "" "#, Dialect::Turtle),
            vec![
                TokenKind::String("a\nb".to_owned()),
                TokenKind::LangTag("en-GB".to_owned()),
                TokenKind::String("x'y".to_owned()),
                TokenKind::String(String::new()),
            ]
        );
    }

    #[test]
    fn directive_names_after_a_string_are_tags() {
        assert_eq!(
            kinds(r#""x"@base "y" @prefix @prefix"#, Dialect::N3),
            vec![
                TokenKind::String("x".to_owned()),
                TokenKind::LangTag("base".to_owned()),
                TokenKind::String("y".to_owned()),
                TokenKind::LangTag("prefix".to_owned()),
                TokenKind::KwPrefix,
            ]
        );
        assert_eq!(
            kinds(r#""z"@forAll"#, Dialect::N3)[1],
            TokenKind::LangTag("forAll".to_owned())
        );
    }

    #[test]
    fn n3_operators_only_in_n3() {
        assert_eq!(
            kinds(":a = :b => :c <= :d . { ?x }", Dialect::N3),
            vec![
                name("", "a"),
                TokenKind::Equals,
                name("", "b"),
                TokenKind::Implies,
                name("", "c"),
                TokenKind::ImpliedBy,
                name("", "d"),
                TokenKind::Dot,
                TokenKind::LBrace,
                TokenKind::Variable("x".to_owned()),
                TokenKind::RBrace,
            ]
        );
        let mut lexer = Lexer::new(":a = :b .".to_owned(), Dialect::Turtle);
        lexer.next_token().unwrap();
        let err = lexer.next_token().unwrap_err();
        assert!(err.message.contains("'='"));
    }

    #[test]
    fn unknown_words_are_rejected() {
        let mut lexer = Lexer::new("has".to_owned(), Dialect::Turtle);
        let err = lexer.next_token().unwrap_err();
        assert!(err.message.contains("unknown keyword 'has'"));
        assert_eq!(kinds("has", Dialect::N3), vec![TokenKind::KwHas]);
    }

    #[test]
    fn comments_and_bom_are_skipped() {
        assert_eq!(
            kinds("\u{FEFF}# comment\n[ ] ( ) # more", Dialect::Turtle),
            vec![TokenKind::Anon, TokenKind::Nil]
        );
    }
}
