//! Parsing of SNBT, the human-readable text form of NBT, into tags.
//!
//! The printer lives on the tag types themselves: their `Display`/`Debug`
//! implementations emit compact SNBT, and [`parse_any`] inverts them.

mod lexer;

use thiserror::Error;

use crate::tag::{NbtCompound, NbtList, NbtTag, TagType};

use self::lexer::{FromExact, Lexer, Token, TokenData};

pub use self::lexer::allowed_unquoted;


/// Parses the given string into an NBT tag. Fails if anything but whitespace follows
/// the parsed value.
pub fn parse_any<T>(string_nbt: &T) -> Result<NbtTag, SnbtError>
where
    T: AsRef<str> + ?Sized,
{
    let mut tokens = Lexer::new(string_nbt.as_ref());
    let tag = parse_next_value(&mut tokens)?;
    expect_end(&mut tokens)?;
    Ok(tag)
}

/// Parses the given string into a compound NBT tag. Fails if the root value is not a
/// compound, or if anything but whitespace follows it.
pub fn parse_compound<T>(string_nbt: &T) -> Result<NbtCompound, SnbtError>
where
    T: AsRef<str> + ?Sized,
{
    let mut tokens = Lexer::new(string_nbt.as_ref());
    let open_curly = tokens.assert_next(&Token::OpenCurly)?;
    let compound = parse_compound_tag(&mut tokens, &open_curly)?;
    expect_end(&mut tokens)?;
    Ok(compound)
}

fn expect_end(tokens: &mut Lexer<'_>) -> Result<(), SnbtError> {
    match tokens.next(false).transpose()? {
        None => Ok(()),
        Some(td) => Err(SnbtError::trailing_data(tokens.raw(), td.index)),
    }
}

// Parses the next value in the token stream
fn parse_next_value(tokens: &mut Lexer<'_>) -> Result<NbtTag, SnbtError> {
    let token = tokens.next(false).transpose()?;
    parse_value(tokens, token)
}

/// Parses a token into a value
fn parse_value(tokens: &mut Lexer<'_>, token: Option<TokenData>) -> Result<NbtTag, SnbtError> {
    match token {
        // Open curly brace indicates a compound tag is present
        Some(td @ TokenData { token: Token::OpenCurly, .. }) => {
            parse_compound_tag(tokens, &td).map(NbtTag::Compound)
        }

        // Open square brace indicates that some kind of list is present
        Some(td @ TokenData { token: Token::OpenSquare, .. }) => parse_list(tokens, &td),

        // Could be a value token or a stray delimiter token
        Some(td) => td
            .into_tag()
            .map_err(|td| SnbtError::unexpected_token(tokens.raw(), Some(&td), "value")),

        // We expected a value but ran out of data
        None => Err(SnbtError::unexpected_eos("value")),
    }
}

// Parses a list, which is either a typed array of integers or a list of tags
fn parse_list(tokens: &mut Lexer<'_>, open_square: &TokenData) -> Result<NbtTag, SnbtError> {
    match tokens.next(false).transpose()? {
        // An empty list could carry any element type; Int keeps the choice
        // deterministic.
        Some(TokenData {
            token: Token::ClosedSquare,
            ..
        }) => Ok(NbtTag::List(NbtList::new(TagType::Int))),

        // A string as the first "element" is either an array type specifier such as in
        // [I; 1, 2], or a plain string element such as in [a, b, c]
        Some(TokenData {
            token: Token::String { value, quoted },
            index,
        }) => {
            // A semicolon after the first token identifies a typed array
            match tokens.peek(false) {
                Some(Ok(TokenData {
                    token: Token::Semicolon,
                    ..
                })) => {
                    // Moves past the peeked semicolon
                    tokens.next(false);

                    if quoted {
                        return Err(SnbtError::unexpected_token_at(
                            tokens.raw(),
                            index,
                            "'B', 'I', or 'L'",
                        ));
                    }

                    match value.as_str() {
                        "B" => parse_prim_list::<i8>(tokens, open_square),
                        "I" => parse_prim_list::<i32>(tokens, open_square),
                        "L" => parse_prim_list::<i64>(tokens, open_square),
                        _ => Err(SnbtError::unexpected_token_at(
                            tokens.raw(),
                            index,
                            "'B', 'I', or 'L'",
                        )),
                    }
                }

                _ => parse_tag_list(tokens, NbtTag::String(value), open_square)
                    .map(NbtTag::List),
            }
        }

        // Any other pattern is delegated to the general tag list parser
        td => {
            let first_element = parse_value(tokens, td)?;
            parse_tag_list(tokens, first_element, open_square).map(NbtTag::List)
        }
    }
}

fn parse_prim_list<T>(
    tokens: &mut Lexer<'_>,
    open_square: &TokenData,
) -> Result<NbtTag, SnbtError>
where
    T: FromExact,
    NbtTag: From<Vec<T>>,
{
    let mut list: Vec<T> = Vec::new();
    // Zero is used as a niche value so the first iteration of the loop runs correctly
    let mut comma: Option<usize> = Some(0);

    loop {
        match tokens.next(false).transpose()? {
            // Finish off the list
            Some(TokenData {
                token: Token::ClosedSquare,
                ..
            }) => match comma {
                Some(0) | None => return Ok(list.into()),
                Some(index) => return Err(SnbtError::trailing_comma(tokens.raw(), index)),
            },

            // Indicates another value should be parsed
            Some(TokenData {
                token: Token::Comma,
                index,
            }) => match comma {
                None => comma = Some(index),
                Some(_) => {
                    return Err(SnbtError::unexpected_token_at(
                        tokens.raw(),
                        index,
                        "integer or ']'",
                    ));
                }
            },

            // Attempt to convert the token into an element of the array's exact type
            Some(td) => {
                // Make sure a value was expected here
                if comma.is_none() {
                    return Err(SnbtError::unexpected_token(
                        tokens.raw(),
                        Some(&td),
                        "',' or ']'",
                    ));
                }

                match T::from_exact(td) {
                    Ok(value) => list.push(value),
                    Err(td) => {
                        return Err(SnbtError::non_homogenous_numeric_list(
                            tokens.raw(),
                            td.index,
                        ));
                    }
                }

                comma = None;
            }

            None => return Err(SnbtError::unmatched_brace(tokens.raw(), open_square.index)),
        }
    }
}

fn parse_tag_list(
    tokens: &mut Lexer<'_>,
    first_element: NbtTag,
    open_square: &TokenData,
) -> Result<NbtList, SnbtError> {
    // The first element determines the list's element type
    let element_type = first_element.tag_type();
    let mut list = NbtList::new(element_type);
    list.tags.push(first_element);

    loop {
        match tokens.next(false).transpose()? {
            // Finish off the list
            Some(TokenData {
                token: Token::ClosedSquare,
                ..
            }) => return Ok(list),

            // Indicates another value should be parsed
            Some(TokenData {
                token: Token::Comma,
                ..
            }) => {
                let trailing_comma_index = match tokens.peek(false) {
                    Some(Ok(TokenData {
                        token: Token::ClosedSquare,
                        index,
                    })) => Some(*index),
                    _ => None,
                };
                if let Some(index) = trailing_comma_index {
                    return Err(SnbtError::trailing_comma(tokens.raw(), index));
                }

                let element_index = tokens.index();
                let element = parse_next_value(tokens)?;

                if element.tag_type() == element_type {
                    list.tags.push(element);
                } else {
                    return Err(SnbtError::non_homogenous_tag_list(
                        tokens.raw(),
                        element_index,
                    ));
                }
            }

            // Some invalid token
            Some(td) => {
                return Err(SnbtError::unexpected_token(
                    tokens.raw(),
                    Some(&td),
                    "',' or ']'",
                ));
            }

            // End of input before the closing brace
            None => return Err(SnbtError::unmatched_brace(tokens.raw(), open_square.index)),
        }
    }
}

fn parse_compound_tag(
    tokens: &mut Lexer<'_>,
    open_curly: &TokenData,
) -> Result<NbtCompound, SnbtError> {
    let mut compound = NbtCompound::new();
    // Zero is used as a niche value so the first iteration of the loop runs correctly
    let mut comma: Option<usize> = Some(0);

    loop {
        match tokens.next(true).transpose()? {
            // Finish off the compound tag
            Some(TokenData {
                token: Token::ClosedCurly,
                ..
            }) => match comma {
                // First loop iteration or no trailing comma
                Some(0) | None => return Ok(compound),
                // Later iteration with a trailing comma
                Some(index) => return Err(SnbtError::trailing_comma(tokens.raw(), index)),
            },

            // Parse a new key-value pair
            Some(TokenData {
                token: Token::String { value: key, .. },
                index,
            }) => {
                // A comma (or the opening brace) must come before every pair
                if comma.is_none() {
                    return Err(SnbtError::unexpected_token_at(
                        tokens.raw(),
                        index,
                        Token::Comma.as_expectation(),
                    ));
                }

                tokens.assert_next(&Token::Colon)?;
                compound.insert(key, parse_next_value(tokens)?);
                comma = None;
            }

            // Denote that another key-value pair is anticipated
            Some(TokenData {
                token: Token::Comma,
                index,
            }) => match comma {
                None => comma = Some(index),
                // This comma came before any pair, or directly after another comma
                Some(_) => {
                    return Err(SnbtError::unexpected_token_at(
                        tokens.raw(),
                        index,
                        "compound key or '}'",
                    ));
                }
            },

            // Catch-all for unexpected tokens
            Some(td) => {
                return Err(SnbtError::unexpected_token(
                    tokens.raw(),
                    Some(&td),
                    "compound key, '}', or ','",
                ));
            }

            // End of input / unmatched brace
            None => return Err(SnbtError::unmatched_brace(tokens.raw(), open_curly.index)),
        }
    }
}

/// An error that occurs while parsing SNBT. Most errors carry a copy of the segment of
/// the input where the error occurred along with the byte column of that segment.
#[derive(Error, Debug, Clone)]
pub enum SnbtError {
    /// The end of the input was encountered before it was expected.
    #[error("reached end of input but expected {expected}")]
    UnexpectedEos {
        /// The expected token or sequence of tokens.
        expected: &'static str,
    },
    /// Non-whitespace input followed a complete value.
    #[error("trailing data at column {index} near '{segment}'")]
    TrailingData { segment: String, index: usize },
    /// An unexpected token was encountered.
    #[error("unexpected token at column {index} near '{segment}', expected {expected}")]
    UnexpectedToken {
        segment: String,
        index: usize,
        /// The expected token or sequence of tokens.
        expected: &'static str,
    },
    /// An escape sequence other than `\\`, `\"`, or `\'`.
    #[error("unknown escape sequence at column {index}: '{segment}'")]
    UnknownEscapeSequence { segment: String, index: usize },
    /// A character not permitted in unquoted strings outside of a quoted string.
    #[error("character '{ch}' disallowed in unquoted strings at column {index} near '{segment}'")]
    InvalidUnquotedCharacter {
        segment: String,
        index: usize,
        /// The encountered character which may not appear in unquoted strings.
        ch: char,
    },
    /// An unmatched single or double quote.
    #[error("unmatched quote at column {index} near '{segment}'")]
    UnmatchedQuote { segment: String, index: usize },
    /// An unmatched curly or square bracket.
    #[error("unmatched brace at column {index} near '{segment}'")]
    UnmatchedBrace { segment: String, index: usize },
    /// A typed array element whose suffix does not match the array's type.
    #[error("mismatched element in typed array of numbers at column {index} near '{segment}'")]
    NonHomogenousNumericList { segment: String, index: usize },
    /// A list element whose type does not match the list's first element.
    #[error("non-homogenous tag list at column {index} near '{segment}'")]
    NonHomogenousTagList { segment: String, index: usize },
    /// A trailing comma in a list, array, or compound.
    #[error("forbidden trailing comma at column {index}: '{segment}'")]
    TrailingComma { segment: String, index: usize },
}

impl SnbtError {
    fn unexpected_eos(expected: &'static str) -> Self {
        Self::UnexpectedEos { expected }
    }

    fn trailing_data(input: &str, index: usize) -> Self {
        Self::TrailingData {
            segment: Self::segment(input, index),
            index,
        }
    }

    fn unexpected_token(input: &str, token: Option<&TokenData>, expected: &'static str) -> Self {
        match token {
            Some(token) => Self::unexpected_token_at(input, token.index, expected),
            None => Self::unexpected_eos(expected),
        }
    }

    fn unexpected_token_at(input: &str, index: usize, expected: &'static str) -> Self {
        Self::UnexpectedToken {
            segment: Self::segment(input, index),
            index,
            expected,
        }
    }

    fn unknown_escape_sequence(input: &str, index: usize) -> Self {
        Self::UnknownEscapeSequence {
            segment: Self::segment(input, index),
            index,
        }
    }

    fn invalid_unquoted_character(input: &str, index: usize, ch: char) -> Self {
        Self::InvalidUnquotedCharacter {
            segment: Self::segment(input, index),
            index,
            ch,
        }
    }

    fn unmatched_quote(input: &str, index: usize) -> Self {
        Self::UnmatchedQuote {
            segment: Self::segment(input, index),
            index,
        }
    }

    fn unmatched_brace(input: &str, index: usize) -> Self {
        Self::UnmatchedBrace {
            segment: Self::segment(input, index),
            index,
        }
    }

    fn non_homogenous_numeric_list(input: &str, index: usize) -> Self {
        Self::NonHomogenousNumericList {
            segment: Self::segment(input, index),
            index,
        }
    }

    fn non_homogenous_tag_list(input: &str, index: usize) -> Self {
        Self::NonHomogenousTagList {
            segment: Self::segment(input, index),
            index,
        }
    }

    fn trailing_comma(input: &str, index: usize) -> Self {
        Self::TrailingComma {
            segment: Self::segment(input, index),
            index,
        }
    }

    /// Copies out up to sixteen characters of the input starting at the given byte
    /// index.
    fn segment(input: &str, index: usize) -> String {
        let start = index.min(input.len());
        input[start ..]
            .char_indices()
            .nth(16)
            .map(|(end, _)| &input[start .. start + end])
            .unwrap_or(&input[start ..])
            .to_owned()
    }
}
