use super::{match_keyword, Name, ProgramText, Token, TokenSource, Word};
use super::token::Operator;

fn is_basic_whitespace(c: u8) -> bool {
    c == b' ' || c == b'\t'
}

fn is_basic_alphabetic(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'@'
}

/// ## Typed line lexer
///
/// Reads a line of text one token at a time, straight from the text,
/// the way the machine reads a stored program one token at a time from
/// its bytes. After `REM` the rest of the line is passed through one
/// byte per token.

#[derive(Debug, Clone, Default)]
pub struct LiveLine {
    bytes: Vec<u8>,
    pos: usize,
    literal: bool,
    float: bool,
}

impl LiveLine {
    pub fn new(line: &str, float: bool) -> LiveLine {
        LiveLine {
            bytes: line.trim_end_matches(&['\r', '\n'][..]).as_bytes().to_vec(),
            pos: 0,
            literal: false,
            float,
        }
    }

    /// All remaining tokens, for storing a line.
    pub fn tokens(&mut self) -> Vec<Token> {
        let empty: &[u8] = &[];
        let mut v = vec![];
        loop {
            match self.next_token(&empty) {
                Token::Eol => return v,
                t => v.push(t),
            }
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !is_basic_whitespace(c) {
                break;
            }
            self.pos += 1;
        }
    }

    fn digits(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            self.pos += 1;
        }
    }

    fn number(&mut self) -> Token {
        let start = self.pos;
        self.digits();
        if self.float {
            if self.peek() == Some(b'.') {
                self.pos += 1;
                self.digits();
            }
            if let Some(b'E') | Some(b'e') = self.peek() {
                let mantissa_end = self.pos;
                self.pos += 1;
                if let Some(b'+') | Some(b'-') = self.peek() {
                    self.pos += 1;
                }
                match self.peek() {
                    Some(c) if c.is_ascii_digit() => self.digits(),
                    _ => self.pos = mantissa_end,
                }
            }
        }
        let text = String::from_utf8_lossy(&self.bytes[start..self.pos]);
        Token::Number(text.parse().unwrap_or(0.0))
    }

    fn string(&mut self) -> Token {
        self.pos += 1;
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == b'"' {
                break;
            }
            self.pos += 1;
        }
        let s = self.bytes[start..self.pos].to_vec();
        if self.peek() == Some(b'"') {
            self.pos += 1;
        }
        Token::String(s)
    }

    fn relation(&mut self, first: u8) -> Token {
        use Operator::*;
        self.pos += 1;
        self.skip_whitespace();
        let second = self.peek();
        let op = match (first, second) {
            (b'=', Some(b'>')) | (b'>', Some(b'=')) => GreaterEqual,
            (b'=', Some(b'<')) | (b'<', Some(b'=')) => LessEqual,
            (b'<', Some(b'>')) => NotEqual,
            (b'=', _) => return Token::Operator(Equal),
            (b'<', _) => return Token::Operator(Less),
            _ => return Token::Operator(Greater),
        };
        self.pos += 1;
        Token::Operator(op)
    }

    fn alphabetic(&mut self) -> Token {
        let start = self.pos;
        let mut end = start;
        while let Some(c) = self.bytes.get(end) {
            if !is_basic_alphabetic(*c) {
                break;
            }
            end += 1;
        }
        if let Some((len, token)) = match_keyword(&self.bytes[start..end]) {
            self.pos += len;
            if *token == Token::Word(Word::Rem) {
                self.literal = true;
            }
            return token.clone();
        }
        if end - start > 2 {
            self.pos += 1;
            return Token::Char(self.bytes[start].to_ascii_uppercase());
        }
        let mut name: Name = [self.bytes[start].to_ascii_uppercase(), 0];
        self.pos += 1;
        if end - start == 2 {
            name[1] = self.bytes[start + 1].to_ascii_uppercase();
            self.pos += 1;
        } else if let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                name[1] = c;
                self.pos += 1;
            }
        }
        match self.peek() {
            Some(b'$') => {
                self.pos += 1;
                Token::StrVar(name)
            }
            Some(b'(') => Token::ArrayVar(name),
            _ => Token::Var(name),
        }
    }
}

impl TokenSource for LiveLine {
    fn position(&self) -> usize {
        self.pos
    }

    fn seek(&mut self, position: usize) {
        self.pos = position.min(self.bytes.len());
        self.literal = false;
    }

    fn next_token(&mut self, _program: &dyn ProgramText) -> Token {
        if self.literal {
            return match self.peek() {
                Some(c) => {
                    self.pos += 1;
                    Token::from_byte(c)
                }
                None => {
                    self.literal = false;
                    Token::Eol
                }
            };
        }
        self.skip_whitespace();
        let c = match self.peek() {
            Some(c) => c,
            None => return Token::Eol,
        };
        if c.is_ascii_digit() {
            return self.number();
        }
        if c == b'.' && self.float && self.peek_at(1).map_or(false, |d| d.is_ascii_digit()) {
            return self.number();
        }
        if c == b'"' {
            return self.string();
        }
        if c == b'=' || c == b'<' || c == b'>' {
            return self.relation(c);
        }
        if is_basic_alphabetic(c) {
            return self.alphabetic();
        }
        self.pos += 1;
        Token::from_byte(c)
    }
}
