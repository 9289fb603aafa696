//! logos-based parser for CSS-like grid track lists.
//!
//! Accepted grammar:
//!
//! ```text
//! list    := track*
//! track   := size | "minmax(" bound "," size ")" | "repeat(" count "," track+ ")"
//! size    := <n>px | <n> | <n>% | <n>fr | auto | min-content | max-content
//! ```
//!
//! `minmax` takes a pixel lower bound; the upper argument becomes the unit.
//! A template expands to at most [`MAX_TRACKS`] tracks.

use logos::Logos;

use super::track::{TrackSize, TrackUnit};

/// Token in a track list.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
enum Token {
    /// Number with a unit suffix: `50px`, `1fr`, `25%`.
    #[regex(r"[0-9]+(\.[0-9]+)?(px|fr|%)")]
    Dimension,

    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,

    /// `minmax(` and `repeat(` are lexed as one token.
    #[regex(r"[a-zA-Z][a-zA-Z-]*\(")]
    Function,

    #[regex(r"[a-zA-Z][a-zA-Z-]*")]
    Ident,

    #[token(",")]
    Comma,

    #[token(")")]
    ParenClose,
}

/// Errors from [`parse_track_list`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TemplateError {
    #[error("unexpected '{found}' at byte {position}")]
    UnexpectedToken { position: usize, found: String },
    #[error("unexpected end of track list")]
    UnexpectedEnd,
    #[error("unknown track keyword '{0}'")]
    UnknownKeyword(String),
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
    #[error("repeat count must be a positive integer, got '{0}'")]
    InvalidRepeatCount(String),
    #[error("minmax lower bound must be a pixel length, got '{0}'")]
    InvalidMinimum(String),
    #[error("track list expands to more than {} tracks", MAX_TRACKS)]
    TooManyTracks,
}

/// Upper bound on tracks a template may expand to, `repeat` included.
pub const MAX_TRACKS: usize = 1000;

struct Parser<'a> {
    input: &'a str,
    tokens: Vec<(Token, std::ops::Range<usize>)>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Result<Self, TemplateError> {
        let mut tokens = Vec::new();
        for (result, span) in Token::lexer(input).spanned() {
            match result {
                Ok(token) => tokens.push((token, span)),
                Err(()) => {
                    return Err(TemplateError::UnexpectedToken {
                        position: span.start,
                        found: input[span].to_string(),
                    })
                }
            }
        }
        Ok(Self { input, tokens, pos: 0 })
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).map(|(t, _)| *t)
    }

    fn next(&mut self) -> Result<(Token, &'a str, usize), TemplateError> {
        let (token, span) = self.tokens.get(self.pos).cloned().ok_or(TemplateError::UnexpectedEnd)?;
        self.pos += 1;
        Ok((token, &self.input[span.clone()], span.start))
    }

    fn expect(&mut self, expected: Token) -> Result<(), TemplateError> {
        let (token, text, position) = self.next()?;
        if token == expected {
            Ok(())
        } else {
            Err(TemplateError::UnexpectedToken { position, found: text.to_string() })
        }
    }

    /// Parse one `track` production into `out` (repeat may push several).
    fn track(&mut self, out: &mut Vec<TrackSize>) -> Result<(), TemplateError> {
        let (token, text, position) = self.next()?;
        match token {
            Token::Function => match &text[..text.len() - 1] {
                "minmax" => {
                    let min = self.minimum()?;
                    self.expect(Token::Comma)?;
                    let size = self.size()?;
                    self.expect(Token::ParenClose)?;
                    out.push(size.with_min(min));
                }
                "repeat" => {
                    let (_, count_text, _) = self.next()?;
                    let count: usize = count_text
                        .parse()
                        .ok()
                        .filter(|n| (1..=MAX_TRACKS).contains(n))
                        .ok_or_else(|| TemplateError::InvalidRepeatCount(count_text.to_string()))?;
                    self.expect(Token::Comma)?;
                    let mut body = Vec::new();
                    loop {
                        match self.peek() {
                            Some(Token::ParenClose) if !body.is_empty() => {
                                self.pos += 1;
                                break;
                            }
                            None => return Err(TemplateError::UnexpectedEnd),
                            _ => self.track(&mut body)?,
                        }
                    }
                    if out.len() + body.len() * count > MAX_TRACKS {
                        return Err(TemplateError::TooManyTracks);
                    }
                    for _ in 0..count {
                        out.extend_from_slice(&body);
                    }
                }
                other => return Err(TemplateError::UnknownFunction(other.to_string())),
            },
            Token::Dimension | Token::Number | Token::Ident => {
                out.push(size_from(token, text)?);
            }
            Token::Comma | Token::ParenClose => {
                return Err(TemplateError::UnexpectedToken { position, found: text.to_string() })
            }
        }
        Ok(())
    }

    fn size(&mut self) -> Result<TrackSize, TemplateError> {
        let (token, text, position) = self.next()?;
        match token {
            Token::Dimension | Token::Number | Token::Ident => size_from(token, text),
            _ => Err(TemplateError::UnexpectedToken { position, found: text.to_string() }),
        }
    }

    fn minimum(&mut self) -> Result<f64, TemplateError> {
        let (token, text, _) = self.next()?;
        let digits = match token {
            Token::Number => text,
            Token::Dimension if text.ends_with("px") => &text[..text.len() - 2],
            _ => return Err(TemplateError::InvalidMinimum(text.to_string())),
        };
        digits.parse().map_err(|_| TemplateError::InvalidMinimum(text.to_string()))
    }
}

fn size_from(token: Token, text: &str) -> Result<TrackSize, TemplateError> {
    let unit = match token {
        Token::Number => TrackUnit::Px(parse_number(text)),
        Token::Dimension => {
            if let Some(n) = text.strip_suffix("px") {
                TrackUnit::Px(parse_number(n))
            } else if let Some(n) = text.strip_suffix("fr") {
                TrackUnit::Fr(parse_number(n))
            } else {
                TrackUnit::Percent(parse_number(text.trim_end_matches('%')))
            }
        }
        _ => match text {
            "auto" => TrackUnit::Auto,
            "min-content" => TrackUnit::MinContent,
            "max-content" => TrackUnit::MaxContent,
            other => return Err(TemplateError::UnknownKeyword(other.to_string())),
        },
    };
    Ok(TrackSize::new(unit))
}

// The lexer regexes only admit well-formed numbers.
fn parse_number(text: &str) -> f64 {
    text.parse().unwrap_or(0.0)
}

/// Parse a whitespace-separated track list such as
/// `"1fr minmax(40px, 2fr) repeat(2, 50px) auto"`.
///
/// An empty string yields an empty list.
pub fn parse_track_list(input: &str) -> Result<Vec<TrackSize>, TemplateError> {
    let mut parser = Parser::new(input)?;
    let mut tracks = Vec::new();
    while parser.peek().is_some() {
        parser.track(&mut tracks)?;
    }
    Ok(tracks)
}
