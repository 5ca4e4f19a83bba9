use super::{LineNumber, Name, Number};

/// ## Tokens
///
/// The same tokens come out of the live-line lexer and out of the
/// stored program decoder. `LineNumber` only ever appears in stored
/// programs; a live line reports its leading number as `Number`.

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Eol,
    Number(Number),
    LineNumber(LineNumber),
    String(Vec<u8>),
    Var(Name),
    StrVar(Name),
    ArrayVar(Name),
    Word(Word),
    Operator(Operator),
    Char(u8),
}

impl Token {
    /// Single bytes that are not part of a number, string or identifier.
    pub fn from_byte(byte: u8) -> Token {
        use Operator::*;
        match byte {
            b'+' => Token::Operator(Plus),
            b'-' => Token::Operator(Minus),
            b'*' => Token::Operator(Multiply),
            b'/' => Token::Operator(Divide),
            b'%' => Token::Operator(Modulus),
            b'^' => Token::Operator(Caret),
            b'=' => Token::Operator(Equal),
            b'<' => Token::Operator(Less),
            b'>' => Token::Operator(Greater),
            _ if byte.is_ascii() && byte != 0 => Token::Char(byte),
            _ => Token::Char(b'?'),
        }
    }

    /// Statement terminators: `:`, a new line, or the end of the text.
    pub fn is_terminator(&self) -> bool {
        matches!(
            self,
            Token::Eol | Token::LineNumber(_) | Token::Char(b':')
        )
    }

    pub fn is_word(&self, word: Word) -> bool {
        *self == Token::Word(word)
    }

    pub fn is_char(&self, ch: u8) -> bool {
        *self == Token::Char(ch)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Token::*;
        match self {
            Eol => Ok(()),
            Number(n) => write!(f, "{}", format_number(*n)),
            LineNumber(n) => write!(f, "{}", n),
            String(s) => write!(f, "\"{}\"", std::string::String::from_utf8_lossy(s)),
            Var(n) | ArrayVar(n) => write!(f, "{}", name_to_string(n)),
            StrVar(n) => write!(f, "{}$", name_to_string(n)),
            Word(w) => write!(f, "{}", w),
            Operator(o) => write!(f, "{}", o),
            Char(c) => write!(f, "{}", char::from(*c)),
        }
    }
}

pub fn name_to_string(name: &Name) -> String {
    name.iter()
        .take_while(|b| **b != 0)
        .map(|b| char::from(*b))
        .collect()
}

/// Shortest text that lexes back to the same number.
pub fn format_number(n: Number) -> String {
    let abs = n.abs();
    if n.fract() == 0.0 && abs < 1e9 {
        format!("{}", n as i64)
    } else if abs >= 1e9 || abs < 1e-4 {
        format!("{:E}", n)
    } else {
        format!("{}", n)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Word {
    Abs,
    After,
    Asc,
    Atan,
    Avail,
    Break,
    Case,
    Catalog,
    Chr,
    Close,
    Clr,
    Cls,
    Cont,
    Cos,
    Data,
    Def,
    Delay,
    Delete,
    Dend,
    Dim,
    Do,
    Else,
    End,
    Error,
    Event,
    Every,
    Exp,
    Fdisk,
    Find,
    Fn,
    For,
    Get,
    Gosub,
    Goto,
    Himem,
    If,
    Input,
    Instr,
    Int,
    Left,
    Len,
    Let,
    List,
    Load,
    Log,
    Malloc,
    Mid,
    Millis,
    New,
    Next,
    On,
    Open,
    Peek,
    Poke,
    Pow,
    Print,
    Put,
    Read,
    Rem,
    Repeat,
    Restore,
    Return,
    Right,
    Rnd,
    Run,
    Save,
    Set,
    Sgn,
    Sin,
    Size,
    Sqr,
    Step,
    Stop,
    Str,
    Swend,
    Switch,
    Tab,
    Tan,
    Then,
    To,
    Troff,
    Tron,
    Until,
    Val,
    Wend,
    While,
}

impl std::fmt::Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let text = KEYWORDS
            .iter()
            .find(|(_, t)| *t == Token::Word(*self))
            .map(|(s, _)| *s)
            .unwrap_or("?");
        write!(f, "{}", text)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Operator {
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulus,
    Caret,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Not,
    And,
    Or,
}

impl Operator {
    pub fn is_relational(&self) -> bool {
        use Operator::*;
        matches!(
            self,
            Equal | NotEqual | Less | LessEqual | Greater | GreaterEqual
        )
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Operator::*;
        match self {
            Plus => write!(f, "+"),
            Minus => write!(f, "-"),
            Multiply => write!(f, "*"),
            Divide => write!(f, "/"),
            Modulus => write!(f, "%"),
            Caret => write!(f, "^"),
            Equal => write!(f, "="),
            NotEqual => write!(f, "<>"),
            Less => write!(f, "<"),
            LessEqual => write!(f, "<="),
            Greater => write!(f, ">"),
            GreaterEqual => write!(f, ">="),
            Not => write!(f, "NOT"),
            And => write!(f, "AND"),
            Or => write!(f, "OR"),
        }
    }
}

/// Keyword table. Stored programs encode an entry by its position here;
/// the first `BASE_KEYWORDS` entries take one byte, the rest are written
/// behind an escape byte.
pub static KEYWORDS: &[(&str, Token)] = &[
    (">=", Token::Operator(Operator::GreaterEqual)),
    ("<=", Token::Operator(Operator::LessEqual)),
    ("<>", Token::Operator(Operator::NotEqual)),
    ("NOT", Token::Operator(Operator::Not)),
    ("AND", Token::Operator(Operator::And)),
    ("OR", Token::Operator(Operator::Or)),
    ("PRINT", Token::Word(Word::Print)),
    ("LET", Token::Word(Word::Let)),
    ("INPUT", Token::Word(Word::Input)),
    ("GOTO", Token::Word(Word::Goto)),
    ("GOSUB", Token::Word(Word::Gosub)),
    ("RETURN", Token::Word(Word::Return)),
    ("IF", Token::Word(Word::If)),
    ("FOR", Token::Word(Word::For)),
    ("TO", Token::Word(Word::To)),
    ("STEP", Token::Word(Word::Step)),
    ("NEXT", Token::Word(Word::Next)),
    ("STOP", Token::Word(Word::Stop)),
    ("LIST", Token::Word(Word::List)),
    ("NEW", Token::Word(Word::New)),
    ("RUN", Token::Word(Word::Run)),
    ("ABS", Token::Word(Word::Abs)),
    ("RND", Token::Word(Word::Rnd)),
    ("SIZE", Token::Word(Word::Size)),
    ("REM", Token::Word(Word::Rem)),
    ("LEN", Token::Word(Word::Len)),
    ("SGN", Token::Word(Word::Sgn)),
    ("PEEK", Token::Word(Word::Peek)),
    ("DIM", Token::Word(Word::Dim)),
    ("CLR", Token::Word(Word::Clr)),
    ("HIMEM", Token::Word(Word::Himem)),
    ("TAB", Token::Word(Word::Tab)),
    ("THEN", Token::Word(Word::Then)),
    ("END", Token::Word(Word::End)),
    ("POKE", Token::Word(Word::Poke)),
    ("CONT", Token::Word(Word::Cont)),
    ("SQR", Token::Word(Word::Sqr)),
    ("POW", Token::Word(Word::Pow)),
    ("BREAK", Token::Word(Word::Break)),
    ("SAVE", Token::Word(Word::Save)),
    ("LOAD", Token::Word(Word::Load)),
    ("GET", Token::Word(Word::Get)),
    ("PUT", Token::Word(Word::Put)),
    ("SET", Token::Word(Word::Set)),
    ("CLS", Token::Word(Word::Cls)),
    ("ELSE", Token::Word(Word::Else)),
    ("DELAY", Token::Word(Word::Delay)),
    ("MILLIS", Token::Word(Word::Millis)),
    ("SIN", Token::Word(Word::Sin)),
    ("COS", Token::Word(Word::Cos)),
    ("TAN", Token::Word(Word::Tan)),
    ("ATAN", Token::Word(Word::Atan)),
    ("LOG", Token::Word(Word::Log)),
    ("EXP", Token::Word(Word::Exp)),
    ("INT", Token::Word(Word::Int)),
    ("DATA", Token::Word(Word::Data)),
    ("READ", Token::Word(Word::Read)),
    ("RESTORE", Token::Word(Word::Restore)),
    ("DEF", Token::Word(Word::Def)),
    ("FN", Token::Word(Word::Fn)),
    ("ON", Token::Word(Word::On)),
    ("MALLOC", Token::Word(Word::Malloc)),
    ("FIND", Token::Word(Word::Find)),
    ("AVAIL", Token::Word(Word::Avail)),
    ("STR", Token::Word(Word::Str)),
    ("INSTR", Token::Word(Word::Instr)),
    ("VAL", Token::Word(Word::Val)),
    ("ASC", Token::Word(Word::Asc)),
    ("CHR", Token::Word(Word::Chr)),
    ("RIGHT", Token::Word(Word::Right)),
    ("LEFT", Token::Word(Word::Left)),
    ("MID", Token::Word(Word::Mid)),
    ("TRON", Token::Word(Word::Tron)),
    ("TROFF", Token::Word(Word::Troff)),
    // extended set
    ("CATALOG", Token::Word(Word::Catalog)),
    ("DELETE", Token::Word(Word::Delete)),
    ("OPEN", Token::Word(Word::Open)),
    ("CLOSE", Token::Word(Word::Close)),
    ("FDISK", Token::Word(Word::Fdisk)),
    ("ERROR", Token::Word(Word::Error)),
    ("AFTER", Token::Word(Word::After)),
    ("EVERY", Token::Word(Word::Every)),
    ("EVENT", Token::Word(Word::Event)),
    ("WHILE", Token::Word(Word::While)),
    ("WEND", Token::Word(Word::Wend)),
    ("REPEAT", Token::Word(Word::Repeat)),
    ("UNTIL", Token::Word(Word::Until)),
    ("SWITCH", Token::Word(Word::Switch)),
    ("CASE", Token::Word(Word::Case)),
    ("SWEND", Token::Word(Word::Swend)),
    ("DO", Token::Word(Word::Do)),
    ("DEND", Token::Word(Word::Dend)),
];

pub const BASE_KEYWORDS: usize = 74;

/// Position of a keyword or multi-character operator in `KEYWORDS`.
pub fn keyword_index(token: &Token) -> Option<usize> {
    match token {
        Token::Word(_) | Token::Operator(_) => KEYWORDS.iter().position(|(_, t)| t == token),
        _ => None,
    }
}

/// Longest keyword that prefixes `word`, compared upper case.
pub fn match_keyword(word: &[u8]) -> Option<(usize, &'static Token)> {
    KEYWORDS
        .iter()
        .filter(|(s, _)| s.as_bytes()[0].is_ascii_alphabetic())
        .filter(|(s, _)| word.len() >= s.len() && word[..s.len()].eq_ignore_ascii_case(s.as_bytes()))
        .max_by_key(|(s, _)| s.len())
        .map(|(s, t)| (s.len(), t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_table_split() {
        assert_eq!(KEYWORDS[BASE_KEYWORDS - 1].0, "TROFF");
        assert_eq!(KEYWORDS[BASE_KEYWORDS].0, "CATALOG");
        assert!(KEYWORDS.len() - BASE_KEYWORDS < 256);
    }

    #[test]
    fn test_longest_match() {
        assert_eq!(
            match_keyword(b"INSTR"),
            Some((5, &Token::Word(Word::Instr)))
        );
        assert_eq!(match_keyword(b"INT"), Some((3, &Token::Word(Word::Int))));
        assert_eq!(match_keyword(b"FORI"), Some((3, &Token::Word(Word::For))));
        assert_eq!(match_keyword(b"TROFF"), Some((5, &Token::Word(Word::Troff))));
        assert_eq!(match_keyword(b"XY"), None);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-12.0), "-12");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(1e20), "1E20");
    }

    #[test]
    fn test_display() {
        assert_eq!(Token::Word(Word::Gosub).to_string(), "GOSUB");
        assert_eq!(Token::StrVar([b'A', b'1']).to_string(), "A1$");
        assert_eq!(Token::Var([b'X', 0]).to_string(), "X");
        assert_eq!(Token::Operator(Operator::NotEqual).to_string(), "<>");
    }
}
