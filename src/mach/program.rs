use super::codec::NUM_SIZE;
use super::{Address, Arena, Codec};
use crate::error;
use crate::lang::{
    keyword_index, Error, LineNumber, ProgramText, Token, TokenSource, BASE_KEYWORDS, KEYWORDS,
};

type Result<T> = std::result::Result<T, Error>;

// Bytes below 0x80 are single character tokens.
const TAG_NUMBER: u8 = 0x80;
const TAG_LINENUMBER: u8 = 0x81;
const TAG_STRING: u8 = 0x82;
const TAG_VAR: u8 = 0x83;
const TAG_STRVAR: u8 = 0x84;
const TAG_ARRAYVAR: u8 = 0x85;
const TAG_KEYWORD: u8 = 0x86;
const TAG_ESCAPE: u8 = 0xFF;

pub fn encode(token: &Token, codec: Codec, out: &mut Vec<u8>) -> Result<()> {
    match token {
        Token::Eol => {}
        Token::Number(n) => {
            out.push(TAG_NUMBER);
            let at = out.len();
            out.resize(at + NUM_SIZE, 0);
            codec.put_number(&mut out[at..], *n);
        }
        Token::LineNumber(n) => {
            out.push(TAG_LINENUMBER);
            let at = out.len();
            out.resize(at + codec.addr_size(), 0);
            codec.put_address(&mut out[at..], *n as Address);
        }
        Token::String(s) => {
            if s.len() > u8::max_value() as usize {
                return Err(error!(StringTooLong));
            }
            out.push(TAG_STRING);
            out.push(s.len() as u8);
            out.extend_from_slice(s);
        }
        Token::Var(n) | Token::StrVar(n) | Token::ArrayVar(n) => {
            out.push(match token {
                Token::Var(_) => TAG_VAR,
                Token::StrVar(_) => TAG_STRVAR,
                _ => TAG_ARRAYVAR,
            });
            out.extend_from_slice(n);
        }
        Token::Word(_) | Token::Operator(_) => match keyword_index(token) {
            Some(i) if i < BASE_KEYWORDS => out.push(TAG_KEYWORD + i as u8),
            Some(i) => {
                out.push(TAG_ESCAPE);
                out.push((i - BASE_KEYWORDS) as u8);
            }
            None => match token.to_string().as_bytes() {
                [b] => out.push(*b),
                _ => return Err(error!(InternalError; "UNENCODABLE TOKEN")),
            },
        },
        Token::Char(c) => out.push(if c.is_ascii() && *c != 0 { *c } else { b'?' }),
    }
    Ok(())
}

/// Bytes taken by the token starting at `at`.
fn extent(text: &dyn ProgramText, at: Address, codec: Codec) -> usize {
    match text.byte(at) {
        TAG_NUMBER => 1 + NUM_SIZE,
        TAG_LINENUMBER => 1 + codec.addr_size(),
        TAG_STRING => 2 + text.byte(at + 1) as usize,
        TAG_VAR | TAG_STRVAR | TAG_ARRAYVAR => 3,
        TAG_ESCAPE => 2,
        _ => 1,
    }
}

pub fn decode(text: &dyn ProgramText, at: Address, codec: Codec) -> (Token, Address) {
    if at >= text.len() {
        return (Token::Eol, at);
    }
    let next = at + extent(text, at, codec);
    if next > text.len() {
        return (Token::Eol, text.len());
    }
    let name = || [text.byte(at + 1), text.byte(at + 2)];
    let token = match text.byte(at) {
        TAG_NUMBER => Token::Number(codec.number_in(text, at + 1)),
        TAG_LINENUMBER => Token::LineNumber(codec.address_in(text, at + 1) as LineNumber),
        TAG_STRING => Token::String((at + 2..next).map(|i| text.byte(i)).collect()),
        TAG_VAR => Token::Var(name()),
        TAG_STRVAR => Token::StrVar(name()),
        TAG_ARRAYVAR => Token::ArrayVar(name()),
        TAG_ESCAPE => keyword(BASE_KEYWORDS + text.byte(at + 1) as usize),
        b if b >= TAG_KEYWORD => keyword((b - TAG_KEYWORD) as usize),
        b => Token::from_byte(b),
    };
    (token, next)
}

fn keyword(index: usize) -> Token {
    match KEYWORDS.get(index) {
        Some((_, t)) => t.clone(),
        None => Token::Char(b'?'),
    }
}

/// ## Reads a stored program one token at a time

#[derive(Debug, Clone, Copy)]
pub struct StoredProgram {
    pos: Address,
    codec: Codec,
}

impl StoredProgram {
    pub fn new(codec: Codec) -> StoredProgram {
        StoredProgram { pos: 0, codec }
    }
}

impl TokenSource for StoredProgram {
    fn position(&self) -> usize {
        self.pos
    }

    fn seek(&mut self, position: usize) {
        self.pos = position;
    }

    fn next_token(&mut self, program: &dyn ProgramText) -> Token {
        let (token, next) = decode(program, self.pos, self.codec);
        self.pos = next;
        token
    }
}

/// Line number, first byte, and end of each stored line.
pub struct Lines<T: ProgramText> {
    text: T,
    codec: Codec,
    pos: Address,
}

impl<T: ProgramText> Lines<T> {
    pub fn new(text: T, codec: Codec) -> Lines<T> {
        Lines {
            text,
            codec,
            pos: 0,
        }
    }

    fn skip_to_line(&mut self) {
        let len = self.text.len();
        while self.pos < len && self.text.byte(self.pos) != TAG_LINENUMBER {
            self.pos += extent(&self.text, self.pos, self.codec);
        }
    }
}

impl<T: ProgramText> Iterator for Lines<T> {
    type Item = (LineNumber, Address, Address);

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_to_line();
        let len = self.text.len();
        if self.pos >= len {
            return None;
        }
        let start = self.pos;
        let number = self.codec.address_in(&self.text, start + 1) as LineNumber;
        self.pos += extent(&self.text, start, self.codec);
        self.skip_to_line();
        Some((number, start, self.pos.min(len)))
    }
}

pub fn find_line<T: ProgramText>(text: T, codec: Codec, line: LineNumber) -> Option<Address> {
    Lines::new(text, codec)
        .find(|(n, _, _)| *n == line)
        .map(|(_, start, _)| start)
}

/// The line holding the byte at `pos`.
pub fn line_of<T: ProgramText>(text: T, codec: Codec, pos: Address) -> Option<LineNumber> {
    Lines::new(text, codec)
        .find(|(_, start, end)| pos >= *start && pos < *end)
        .map(|(n, _, _)| n)
}

const LINE_CACHE_SIZE: usize = 4;

#[derive(Debug, Default)]
pub struct LineCache {
    slots: [Option<(LineNumber, Address)>; LINE_CACHE_SIZE],
    next: usize,
}

impl LineCache {
    pub fn clear(&mut self) {
        self.slots = Default::default();
    }

    fn get(&self, line: LineNumber) -> Option<Address> {
        self.slots
            .iter()
            .flatten()
            .find(|(n, _)| *n == line)
            .map(|(_, at)| *at)
    }

    fn insert(&mut self, line: LineNumber, at: Address) {
        self.slots[self.next] = Some((line, at));
        self.next = (self.next + 1) % LINE_CACHE_SIZE;
    }
}

/// ## Line editor

impl Arena {
    pub fn lines(&self) -> Lines<&[u8]> {
        Lines::new(&self.bytes[..self.top], self.codec)
    }

    pub fn find_line(&mut self, line: LineNumber) -> Option<Address> {
        if let Some(at) = self.line_cache.get(line) {
            return Some(at);
        }
        let at = self.lines().find(|(n, _, _)| *n == line).map(|(_, s, _)| s)?;
        self.line_cache.insert(line, at);
        Some(at)
    }

    /// Tokens of one stored line, without its line number.
    pub fn line_tokens(&self, line: LineNumber) -> Option<Vec<Token>> {
        let (_, start, end) = self.lines().find(|(n, _, _)| *n == line)?;
        let text = &self.bytes[..end];
        let mut source = StoredProgram::new(self.codec);
        source.seek(start);
        source.next_token(&text);
        let mut tokens = vec![];
        loop {
            match source.next_token(&text) {
                Token::Eol => return Some(tokens),
                t => tokens.push(t),
            }
        }
    }

    pub fn store_line(&mut self, line: LineNumber, body: &[Token]) -> Result<()> {
        if line == 0 || line as Address > self.codec.max_address() {
            return Err(error!(UndefinedLine));
        }
        self.line_cache.clear();
        if body.is_empty() {
            return self.delete_line(line);
        }
        let mut record = vec![];
        encode(&Token::LineNumber(line), self.codec, &mut record)?;
        for token in body {
            encode(token, self.codec, &mut record)?;
        }
        let len = record.len();
        let old_top = self.top;
        let (at, existing) = self.insertion_point(line);
        let scratch = match existing {
            Some(end) => len + len.saturating_sub(end - at),
            None if at == old_top => len,
            None => 2 * len,
        };
        if old_top + scratch > self.himem {
            return Err(error!(OutOfMemory));
        }
        self.bytes[old_top..old_top + len].copy_from_slice(&record);
        self.top = old_top + len;
        match existing {
            Some(end) => {
                let old_len = end - at;
                if len > old_len {
                    let delta = len - old_len;
                    self.move_block(end, self.top - end, end + delta)?;
                    self.move_block(old_top + delta, len, at)?;
                } else {
                    self.move_block(old_top, len, at)?;
                    if len < old_len {
                        self.move_block(end, old_top - end, at + len)?;
                    }
                }
                self.top = old_top + len - old_len;
            }
            None if at == old_top => {}
            None => {
                self.move_block(at, self.top - at, at + len)?;
                self.move_block(old_top + len, len, at)?;
                self.top = old_top + len;
            }
        }
        let top = self.top;
        self.zero(top, old_top + scratch);
        Ok(())
    }

    fn delete_line(&mut self, line: LineNumber) -> Result<()> {
        let (start, end) = match self.lines().find(|(n, _, _)| *n == line) {
            Some((_, start, end)) => (start, end),
            None => return Err(error!(UndefinedLine)),
        };
        let old_top = self.top;
        self.move_block(end, old_top - end, start)?;
        self.top = old_top - (end - start);
        let top = self.top;
        self.zero(top, old_top);
        Ok(())
    }

    /// Where a line goes: the start of the first line numbered `line` or
    /// higher (with its end when the number matches), else `top`.
    fn insertion_point(&self, line: LineNumber) -> (Address, Option<Address>) {
        for (n, start, end) in self.lines() {
            if n == line {
                return (start, Some(end));
            }
            if n > line {
                return (start, None);
            }
        }
        (self.top, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::{LiveLine, Word};

    fn store(arena: &mut Arena, s: &str) {
        let mut tokens = LiveLine::new(s, true).tokens();
        let n = match tokens.remove(0) {
            Token::Number(n) => n as LineNumber,
            _ => panic!(),
        };
        arena.store_line(n, &tokens).unwrap();
    }

    fn numbers(arena: &Arena) -> Vec<LineNumber> {
        arena.lines().map(|(n, _, _)| n).collect()
    }

    #[test]
    fn test_insert_replace_delete() {
        let mut a = Arena::new(1024);
        store(&mut a, "20 PRINT 2");
        store(&mut a, "10 PRINT 1");
        store(&mut a, "30 PRINT 3");
        store(&mut a, "15 PRINT 15");
        assert_eq!(numbers(&a), vec![10, 15, 20, 30]);
        store(&mut a, "15 PRINT \"LONGER\",1,2,3");
        store(&mut a, "20 END");
        assert_eq!(numbers(&a), vec![10, 15, 20, 30]);
        assert_eq!(a.line_tokens(20), Some(vec![Token::Word(Word::End)]));
        store(&mut a, "15");
        assert_eq!(numbers(&a), vec![10, 20, 30]);
        assert!(a.store_line(15, &[]).is_err());
    }

    #[test]
    fn test_same_line_twice() {
        let mut a = Arena::new(1024);
        store(&mut a, "10 A=1");
        store(&mut a, "20 B=2");
        let before = a.program().to_vec();
        store(&mut a, "10 A=1");
        assert_eq!(a.program(), &before[..]);
    }

    #[test]
    fn test_full_program_unchanged() {
        let mut a = Arena::new(64);
        store(&mut a, "10 PRINT \"ABCDEFGHIJKLMNOP\"");
        a.himem = a.top + 30;
        let before = a.program().to_vec();
        let body = LiveLine::new("PRINT \"ABCDEFGHIJKLMNOP\"", true).tokens();
        assert!(a.store_line(5, &body).is_err());
        assert_eq!(a.program(), &before[..]);
    }

    #[test]
    fn test_extended_keyword_escape() {
        let mut out = vec![];
        let codec = Codec::for_memsize(1024);
        encode(&Token::Word(Word::While), codec, &mut out).unwrap();
        assert_eq!(out[0], TAG_ESCAPE);
        let text: &[u8] = &out;
        assert_eq!(decode(&text, 0, codec).0, Token::Word(Word::While));
    }

    #[test]
    fn test_line_of() {
        let mut a = Arena::new(1024);
        store(&mut a, "10 A=1");
        store(&mut a, "20 B=2");
        let at = a.find_line(20).unwrap();
        let text = a.program();
        assert_eq!(line_of(text, a.codec(), at + 4), Some(20));
        assert_eq!(line_of(text, a.codec(), 0), Some(10));
    }
}
