/*!
# Rust Language Module

This Rust module provides lexical analysis of the BASIC language:
the token set, the keyword table, and the lexer for typed lines.

*/

#[macro_use]
mod error;
mod lex;
mod token;

pub use error::Error;
pub use error::ErrorCode;
pub use lex::LiveLine;
pub use token::*;

/// The only numeric type of the language.
pub type Number = f32;

/// Line numbers run from 1 to 65535.
pub type LineNumber = u16;

/// Variable names are one or two bytes, the second is 0 when unused.
pub type Name = [u8; 2];

/// Random access to encoded program bytes, whether they live in the
/// arena or in a persistent store.
pub trait ProgramText {
    fn len(&self) -> usize;
    fn byte(&self, at: usize) -> u8;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'a> ProgramText for &'a [u8] {
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }
    fn byte(&self, at: usize) -> u8 {
        self.get(at).copied().unwrap_or(0)
    }
}

/// Where tokens come from. A typed line is lexed from text, a running
/// program is decoded from its stored bytes. Positions are offsets into
/// whichever of the two is being read.
pub trait TokenSource {
    fn position(&self) -> usize;
    fn seek(&mut self, position: usize);
    fn next_token(&mut self, program: &dyn ProgramText) -> Token;
}
