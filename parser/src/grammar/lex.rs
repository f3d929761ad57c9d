//! Lexical productions shared by the N-Triples and Turtle/N3 tokenizers.
//!
//! Character classes follow the Turtle 1.1 grammar (the same productions as
//! SPARQL); N-Triples uses the subset it needs.

use winnow::combinator::delimited;
use winnow::error::{ContextError, ErrMode};
use winnow::stream::AsChar;
use winnow::token::{any, take, take_while};
use winnow::{LocatingSlice, ModalResult, Parser};

/// Input type for the tokenizers; tracks byte offsets for error positions.
pub(crate) type Input<'a> = LocatingSlice<&'a str>;

pub(crate) fn backtrack() -> ErrMode<ContextError> {
    ErrMode::Backtrack(ContextError::new())
}

/// ```text
/// PN_CHARS_BASE ::= [A-Z] | [a-z] | [#x00C0-#x00D6] | [#x00D8-#x00F6]
///                 | [#x00F8-#x02FF] | [#x0370-#x037D] | [#x037F-#x1FFF]
///                 | [#x200C-#x200D] | [#x2070-#x218F] | [#x2C00-#x2FEF]
///                 | [#x3001-#xD7FF] | [#xF900-#xFDCF] | [#xFDF0-#xFFFD]
///                 | [#x10000-#xEFFFF]
/// ```
pub(crate) fn is_pn_chars_base(c: char) -> bool {
    matches!(c,
        'A'..='Z' |
        'a'..='z' |
        '\u{00C0}'..='\u{00D6}' |
        '\u{00D8}'..='\u{00F6}' |
        '\u{00F8}'..='\u{02FF}' |
        '\u{0370}'..='\u{037D}' |
        '\u{037F}'..='\u{1FFF}' |
        '\u{200C}'..='\u{200D}' |
        '\u{2070}'..='\u{218F}' |
        '\u{2C00}'..='\u{2FEF}' |
        '\u{3001}'..='\u{D7FF}' |
        '\u{F900}'..='\u{FDCF}' |
        '\u{FDF0}'..='\u{FFFD}' |
        '\u{10000}'..='\u{EFFFF}'
    )
}

/// `PN_CHARS_U ::= PN_CHARS_BASE | '_'`
pub(crate) fn is_pn_chars_u(c: char) -> bool {
    is_pn_chars_base(c) || c == '_'
}

/// `PN_CHARS ::= PN_CHARS_U | '-' | [0-9] | #x00B7 | [#x0300-#x036F] | [#x203F-#x2040]`
pub(crate) fn is_pn_chars(c: char) -> bool {
    is_pn_chars_u(c)
        || c == '-'
        || c.is_ascii_digit()
        || c == '\u{00B7}'
        || matches!(c, '\u{0300}'..='\u{036F}' | '\u{203F}'..='\u{2040}')
}

pub(crate) fn is_ws(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Characters allowed unescaped between `<` and `>`.
pub(crate) fn is_iri_char(c: char) -> bool {
    !matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' | '\x00'..='\x20')
}

/// `IRIREF ::= '<' ([^#x00-#x20<>"{}|^`\] | UCHAR)* '>'`, returning the
/// unescaped content.
pub(crate) fn iri_ref(input: &mut Input<'_>) -> ModalResult<String> {
    delimited('<', iri_content, '>').parse_next(input)
}

fn iri_content(input: &mut Input<'_>) -> ModalResult<String> {
    let mut result = String::new();

    loop {
        let chunk: &str = take_while(0.., is_iri_char).parse_next(input)?;
        result.push_str(chunk);

        if input.is_empty() || input.starts_with('>') {
            break;
        }

        if input.starts_with('\\') {
            '\\'.parse_next(input)?;
            let c = unicode_escape(input)?;
            if !is_iri_char(c) {
                return Err(backtrack());
            }
            result.push(c);
        } else {
            return Err(backtrack());
        }
    }

    Ok(result)
}

/// `UCHAR` after the backslash: `uXXXX` or `UXXXXXXXX`.
fn unicode_escape(input: &mut Input<'_>) -> ModalResult<char> {
    let width = match any.parse_next(input)? {
        'u' => 4,
        'U' => 8,
        _ => return Err(backtrack()),
    };
    let hex: &str = take_while(width..=width, AsChar::is_hex_digit).parse_next(input)?;
    let code = u32::from_str_radix(hex, 16).map_err(|_| backtrack())?;
    char::from_u32(code).ok_or_else(backtrack)
}

/// `ECHAR` or `UCHAR` after the backslash.
pub(crate) fn escape_char(input: &mut Input<'_>) -> ModalResult<char> {
    if input.starts_with('u') || input.starts_with('U') {
        return unicode_escape(input);
    }
    match any.parse_next(input)? {
        't' => Ok('\t'),
        'b' => Ok('\x08'),
        'n' => Ok('\n'),
        'r' => Ok('\r'),
        'f' => Ok('\x0C'),
        '"' => Ok('"'),
        '\'' => Ok('\''),
        '\\' => Ok('\\'),
        _ => Err(backtrack()),
    }
}

/// A single-line string delimited by `quote`; returns the unescaped content.
pub(crate) fn short_string(mut quote: char) -> impl FnMut(&mut Input<'_>) -> ModalResult<String> {
    move |input: &mut Input<'_>| {
        quote.parse_next(input)?;
        let mut result = String::new();
        loop {
            let chunk: &str =
                take_while(0.., |c: char| c != quote && c != '\\' && c != '\n' && c != '\r')
                    .parse_next(input)?;
            result.push_str(chunk);

            if input.starts_with('\\') {
                '\\'.parse_next(input)?;
                result.push(escape_char(input)?);
            } else {
                break;
            }
        }
        quote.parse_next(input)?;
        Ok(result)
    }
}

/// A string delimited by three `quote` characters; may span lines.
pub(crate) fn long_string(quote: char) -> impl FnMut(&mut Input<'_>) -> ModalResult<String> {
    move |input: &mut Input<'_>| {
        let delimiter: String = std::iter::repeat(quote).take(3).collect();
        delimiter.as_str().parse_next(input)?;
        let mut result = String::new();
        loop {
            let chunk: &str =
                take_while(0.., |c: char| c != quote && c != '\\').parse_next(input)?;
            result.push_str(chunk);

            if input.is_empty() {
                return Err(backtrack());
            }
            if input.starts_with(delimiter.as_str()) {
                break;
            }
            if input.starts_with('\\') {
                '\\'.parse_next(input)?;
                result.push(escape_char(input)?);
            } else {
                result.push(any.parse_next(input)?);
            }
        }
        delimiter.as_str().parse_next(input)?;
        Ok(result)
    }
}

/// `BLANK_NODE_LABEL ::= '_:' (PN_CHARS_U | [0-9]) ((PN_CHARS | '.')* PN_CHARS)?`,
/// returning the label without `_:`.
pub(crate) fn blank_node_label(input: &mut Input<'_>) -> ModalResult<String> {
    "_:".parse_next(input)?;
    let first: char = any
        .verify(|c: &char| is_pn_chars_u(*c) || c.is_ascii_digit())
        .parse_next(input)?;

    // A trailing '.' belongs to the statement, not the label.
    let mut body_chars = 0;
    for (count, c) in input.chars().enumerate() {
        if is_pn_chars(c) {
            body_chars = count + 1;
        } else if c != '.' {
            break;
        }
    }
    let body: &str = take(body_chars).parse_next(input)?;

    let mut label = String::with_capacity(body.len() + first.len_utf8());
    label.push(first);
    label.push_str(body);
    Ok(label)
}

/// `LANGTAG ::= '@' [a-zA-Z]+ ('-' [a-zA-Z0-9]+)*`, returning the tag
/// without `@`.
pub(crate) fn lang_tag(input: &mut Input<'_>) -> ModalResult<String> {
    '@'.parse_next(input)?;
    let primary: &str = take_while(1.., |c: char| c.is_ascii_alphabetic()).parse_next(input)?;
    let mut tag = primary.to_owned();
    while input.starts_with('-') {
        '-'.parse_next(input)?;
        let sub: &str =
            take_while(1.., |c: char| c.is_ascii_alphanumeric()).parse_next(input)?;
        tag.push('-');
        tag.push_str(sub);
    }
    Ok(tag)
}
