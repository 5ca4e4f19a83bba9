use super::program::{Lines, StoredProgram};
use super::{Address, Codec};
use crate::lang::{LineNumber, Operator, ProgramText, Token, TokenSource, Word};
use std::ops::RangeInclusive;

/// ## Program listing
///
/// Turns stored lines back into text that lexes to the same tokens.

#[derive(Debug, Clone, Copy)]
pub struct Listing {
    codec: Codec,
}

impl Listing {
    pub fn new(codec: Codec) -> Listing {
        Listing { codec }
    }

    pub fn lines<T: ProgramText + Copy>(
        &self,
        text: T,
        range: RangeInclusive<LineNumber>,
    ) -> Vec<String> {
        Lines::new(text, self.codec)
            .filter(|(n, _, _)| range.contains(n))
            .map(|(n, start, end)| self.line(text, n, start, end))
            .collect()
    }

    fn line<T: ProgramText>(&self, text: T, number: LineNumber, start: Address, end: Address) -> String {
        let mut source = StoredProgram::new(self.codec);
        source.seek(start);
        source.next_token(&text);
        let mut tokens = vec![];
        while source.position() < end {
            match source.next_token(&text) {
                Token::Eol => break,
                t => tokens.push(t),
            }
        }
        format_line(number, &tokens)
    }
}

fn is_word(t: &Token) -> bool {
    matches!(
        t,
        Token::Word(_)
            | Token::Operator(Operator::Not)
            | Token::Operator(Operator::And)
            | Token::Operator(Operator::Or)
    )
}

fn is_operand(t: &Token) -> bool {
    matches!(
        t,
        Token::Number(_)
            | Token::Var(_)
            | Token::StrVar(_)
            | Token::String(_)
            | Token::Char(b')')
    )
}

fn spaced(prev: &Token, t: &Token) -> bool {
    if prev.is_char(b':') {
        return true;
    }
    if is_word(prev) {
        return !matches!(
            t,
            Token::Char(b'(') | Token::Char(b'$') | Token::Char(b',') | Token::Char(b';') | Token::Char(b':')
        );
    }
    if is_word(t) {
        return is_operand(prev);
    }
    match prev {
        Token::Number(_) => matches!(t, Token::Var(_) | Token::StrVar(_) | Token::ArrayVar(_)),
        _ => false,
    }
}

pub fn format_line(number: LineNumber, tokens: &[Token]) -> String {
    let mut s = format!("{} ", number);
    let mut prev: Option<&Token> = None;
    let mut literal = false;
    for t in tokens {
        if literal {
            s.push_str(&t.to_string());
            continue;
        }
        if let Some(p) = prev {
            if spaced(p, t) {
                s.push(' ');
            }
        }
        s.push_str(&t.to_string());
        literal = t.is_word(Word::Rem);
        prev = Some(t);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::LiveLine;
    use crate::mach::Arena;

    fn relist(line: &str) -> String {
        let mut arena = Arena::new(512);
        let mut tokens = LiveLine::new(line, true).tokens();
        let n = match tokens.remove(0) {
            Token::Number(n) => n as LineNumber,
            _ => panic!(),
        };
        arena.store_line(n, &tokens).unwrap();
        let listing = Listing::new(arena.codec()).lines(arena.program(), 0..=65535);
        listing.join("\n")
    }

    #[test]
    fn test_spacing() {
        assert_eq!(relist("10 for i=1to 3 step 2"), "10 FOR I=1 TO 3 STEP 2");
        assert_eq!(relist("20 print\"A\";b$:goto 10"), "20 PRINT \"A\";B$: GOTO 10");
        assert_eq!(relist("30 if a and not b then 100 else 200"), "30 IF A AND NOT B THEN 100 ELSE 200");
        assert_eq!(relist("40 a$=chr$(65)+str$(x(2))"), "40 A$=CHR$(65)+STR$(X(2))");
    }

    #[test]
    fn test_remark_is_verbatim() {
        assert_eq!(relist("50 REM  keep:  THIS"), "50 REM  keep:  THIS");
    }

    #[test]
    fn test_relisted_lines_lex_the_same() {
        for line in &[
            "10 FOR I=1 TO 3 STEP -1",
            "20 DATA 1,-2,\"X\"",
            "30 ON X GOSUB 100,200",
            "40 A(I,J)=A(I,J)*2^-1",
        ] {
            let listed = relist(line);
            assert_eq!(
                LiveLine::new(&listed, true).tokens(),
                LiveLine::new(line, true).tokens()
            );
        }
    }

    #[test]
    fn test_range() {
        let mut arena = Arena::new(512);
        for n in &[10u16, 20, 30] {
            arena
                .store_line(*n, &LiveLine::new("PRINT", true).tokens())
                .unwrap();
        }
        let listing = Listing::new(arena.codec()).lines(arena.program(), 15..=30);
        assert_eq!(listing, vec!["20 PRINT", "30 PRINT"]);
    }
}
