use super::function::Function;
use super::operation::{Operation, TRUE};
use super::var::channel_number;
use super::{Address, Kind, Location, Mode, Runtime};
use crate::error;
use crate::lang::{format_number, Error, Name, Number, Operator, Token, Word};
use rand::Rng;

type Result<T> = std::result::Result<T, Error>;

type Level = fn(&mut Runtime) -> Result<()>;

/// ## Expression evaluator
///
/// Recursive descent straight over the token stream. Each level leaves
/// its value on the arithmetic stack and the cursor on the first token
/// it did not use.

impl Runtime {
    pub(crate) fn expression(&mut self) -> Result<()> {
        self.nested(Runtime::or_expression)
    }

    /// Runs `level` one nesting deeper, at most `stack_size` deep.
    fn nested(&mut self, level: Level) -> Result<()> {
        if self.depth >= self.config.stack_size {
            return Err(error!(StackOverflow; "EXPRESSION"));
        }
        self.depth += 1;
        let result = level(self);
        self.depth -= 1;
        result
    }

    /// Reads the right operand of a binary operator at `level`.
    fn operand(&mut self, level: Level) -> Result<(Number, Number)> {
        self.next_token();
        level(self)?;
        self.stack.pop_2()
    }

    fn or_expression(&mut self) -> Result<()> {
        self.and_expression()?;
        while self.token == Token::Operator(Operator::Or) {
            let (lhs, rhs) = self.operand(Runtime::and_expression)?;
            self.push(Operation::or(lhs, rhs)?)?;
        }
        Ok(())
    }

    fn and_expression(&mut self) -> Result<()> {
        self.not_expression()?;
        while self.token == Token::Operator(Operator::And) {
            let (lhs, rhs) = self.operand(Runtime::not_expression)?;
            self.push(Operation::and(lhs, rhs)?)?;
        }
        Ok(())
    }

    fn not_expression(&mut self) -> Result<()> {
        if self.token == Token::Operator(Operator::Not) {
            self.next_token();
            self.nested(Runtime::not_expression)?;
            let n = self.pop()?;
            return self.push(Operation::not(n)?);
        }
        self.comparison()
    }

    fn comparison(&mut self) -> Result<()> {
        use Operator::*;
        self.additive()?;
        loop {
            let op = match self.token {
                Token::Operator(op) if op.is_relational() => op,
                _ => return Ok(()),
            };
            let (lhs, rhs) = self.operand(Runtime::additive)?;
            let n = match op {
                Equal => Operation::equal(lhs, rhs),
                NotEqual => Operation::not_equal(lhs, rhs),
                Less => Operation::less(lhs, rhs),
                LessEqual => Operation::less_equal(lhs, rhs),
                Greater => Operation::greater(lhs, rhs),
                _ => Operation::greater_equal(lhs, rhs),
            };
            self.push(n)?;
        }
    }

    fn additive(&mut self) -> Result<()> {
        match self.token {
            Token::Operator(Operator::Plus) | Token::Operator(Operator::Minus) => self.push(0.0)?,
            _ => self.term()?,
        }
        loop {
            let op = match self.token {
                Token::Operator(op @ Operator::Plus) | Token::Operator(op @ Operator::Minus) => op,
                _ => return Ok(()),
            };
            let (lhs, rhs) = self.operand(Runtime::term)?;
            let n = if op == Operator::Plus {
                Operation::add(lhs, rhs)?
            } else {
                Operation::subtract(lhs, rhs)?
            };
            self.push(n)?;
        }
    }

    pub(crate) fn term(&mut self) -> Result<()> {
        use Operator::*;
        self.power()?;
        let integer = self.config.integer;
        loop {
            let op = match self.token {
                Token::Operator(op @ Multiply)
                | Token::Operator(op @ Divide)
                | Token::Operator(op @ Modulus) => op,
                _ => return Ok(()),
            };
            let (lhs, rhs) = self.operand(Runtime::power)?;
            let n = match op {
                Multiply => Operation::multiply(lhs, rhs)?,
                Divide => Operation::divide(lhs, rhs, integer)?,
                _ => Operation::modulus(lhs, rhs)?,
            };
            self.push(n)?;
        }
    }

    fn power(&mut self) -> Result<()> {
        self.factor()?;
        while self.token == Token::Operator(Operator::Caret) {
            let (lhs, rhs) = self.operand(Runtime::factor)?;
            let n = Operation::power(lhs, rhs, self.config.integer)?;
            self.push(n)?;
        }
        Ok(())
    }

    fn factor(&mut self) -> Result<()> {
        match self.token {
            Token::Operator(Operator::Minus) => {
                self.next_token();
                self.nested(Runtime::power)?;
                let n = self.pop()?;
                self.push(Operation::negate(n))
            }
            Token::Operator(Operator::Plus) => {
                self.next_token();
                self.nested(Runtime::power)
            }
            Token::Number(n) => {
                self.next_token();
                self.push(n)
            }
            Token::Var(name) => {
                self.next_token();
                let n = self.get_var(name)?;
                self.push(n)
            }
            Token::ArrayVar(name) => {
                self.next_token();
                let (i, j) = self.subscripts()?;
                let n = self.get_element(name, i, j)?;
                self.push(n)
            }
            Token::Char(b'(') => {
                self.next_token();
                self.expression()?;
                self.expect_char(b')')
            }
            Token::String(_)
            | Token::StrVar(_)
            | Token::Word(Word::Str)
            | Token::Word(Word::Chr)
            | Token::Word(Word::Left)
            | Token::Word(Word::Right)
            | Token::Word(Word::Mid) => self.string_factor(),
            Token::Word(word) => self.function(word),
            _ => Err(error!(SyntaxError)),
        }
    }

    /// A string where a number is wanted: compared with another string
    /// it gives a truth value, otherwise the code of its first byte.
    fn string_factor(&mut self) -> Result<()> {
        use Operator::*;
        let lhs = self.text()?;
        let op = match self.token {
            Token::Operator(op) if op.is_relational() => op,
            _ => return self.push(lhs.first().map_or(0.0, |c| Number::from(*c))),
        };
        self.next_token();
        let rhs = self.text()?;
        let equal = lhs == rhs;
        let truth = match op {
            Equal | LessEqual | GreaterEqual => equal,
            _ => !equal,
        };
        self.push(if truth { TRUE } else { 0.0 })
    }

    /// A string expression, if the cursor is on one.
    pub(crate) fn string_value(&mut self) -> Result<Option<Vec<u8>>> {
        let s = match self.token {
            Token::String(ref s) => {
                let s = s.clone();
                self.next_token();
                s
            }
            Token::StrVar(name) => {
                self.next_token();
                let selector = self.selector()?;
                self.read_string(name, selector)?
            }
            Token::Word(word @ Word::Str)
            | Token::Word(word @ Word::Chr)
            | Token::Word(word @ Word::Left)
            | Token::Word(word @ Word::Right)
            | Token::Word(word @ Word::Mid) => {
                self.next_token();
                if self.token.is_char(b'$') {
                    self.next_token();
                }
                if self.depth >= self.config.stack_size {
                    return Err(error!(StackOverflow; "EXPRESSION"));
                }
                self.depth += 1;
                let s = self.string_function(word);
                self.depth -= 1;
                s?
            }
            _ => return Ok(None),
        };
        Ok(Some(s))
    }

    pub(crate) fn text(&mut self) -> Result<Vec<u8>> {
        self.string_value()?.ok_or_else(|| error!(TypeMismatch))
    }

    /// Pieces joined with `+`. A numeric piece adds one byte.
    pub(crate) fn concatenation(&mut self) -> Result<Vec<u8>> {
        let mut out = vec![];
        loop {
            match self.string_value()? {
                Some(s) => out.extend_from_slice(&s),
                None => {
                    self.term()?;
                    let n = self.pop()?;
                    out.push(byte(n)?);
                }
            }
            if self.token != Token::Operator(Operator::Plus) {
                break;
            }
            self.next_token();
        }
        if out.len() > 255 {
            return Err(error!(StringTooLong));
        }
        Ok(out)
    }

    fn string_function(&mut self, word: Word) -> Result<Vec<u8>> {
        self.expect_char(b'(')?;
        let s = match word {
            Word::Str => format_number(self.value()?).into_bytes(),
            Word::Chr => vec![byte(self.value()?)?],
            Word::Left | Word::Right => {
                let s = self.text()?;
                self.expect_char(b',')?;
                let n = count(self.value()?)?.min(s.len());
                if word == Word::Left {
                    s[..n].to_vec()
                } else {
                    s[s.len() - n..].to_vec()
                }
            }
            Word::Mid => {
                let s = self.text()?;
                self.expect_char(b',')?;
                let i = self.value()?;
                if !(i >= 1.0) {
                    return Err(error!(IllegalFunctionCall));
                }
                let start = (i as usize - 1).min(s.len());
                let n = if self.token.is_char(b',') {
                    self.next_token();
                    count(self.value()?)?
                } else {
                    s.len()
                };
                s[start..(start.saturating_add(n)).min(s.len())].to_vec()
            }
            _ => return Err(error!(InternalError; "NOT A STRING FUNCTION")),
        };
        self.expect_char(b')')?;
        Ok(s)
    }

    /// `(expr, ...)` onto the stack. Returns how many.
    fn arguments(&mut self) -> Result<usize> {
        self.expect_char(b'(')?;
        let mut n = 0;
        if !self.token.is_char(b')') {
            loop {
                self.expression()?;
                n += 1;
                if !self.token.is_char(b',') {
                    break;
                }
                self.next_token();
            }
        }
        self.expect_char(b')')?;
        Ok(n)
    }

    fn function(&mut self, word: Word) -> Result<()> {
        match word {
            Word::Fn => return self.call_fn(),
            Word::Len | Word::Val | Word::Asc | Word::Instr => return self.text_function(word),
            Word::Find => return self.find(),
            Word::Error => {
                self.next_token();
                return self.push(Number::from(self.last_error));
            }
            _ => {}
        }
        let arity = Function::arity(word).ok_or_else(|| error!(SyntaxError))?;
        self.next_token();
        let n = if self.token.is_char(b'(') {
            self.arguments()?
        } else {
            0
        };
        if !arity.contains(&n) {
            return Err(error!(IllegalFunctionCall));
        }
        let args = self.stack.pop_n(n)?;
        let integer = self.config.integer;
        let x = args.first().copied().unwrap_or(0.0);
        let value = match word {
            Word::Rnd => {
                let r = self.rng.gen::<Number>() * x;
                if integer {
                    r.trunc()
                } else {
                    r
                }
            }
            Word::Peek => match self.arena.peek(address(x)?) {
                Some(b) => Number::from(b),
                None => return Err(error!(IllegalFunctionCall)),
            },
            Word::Millis => {
                let divisor = if x < 1.0 { 1 } else { x as u64 };
                (self.devices.millis() / divisor) as Number
            }
            Word::Avail => self.devices.available(channel_number(x)?) as Number,
            Word::Malloc => {
                let name = buffer_name(x)?;
                let size = count(args[1])?;
                self.arena.allocate(Kind::Buffer, name, size)? as Number
            }
            Word::Size => self.arena.free() as Number,
            Word::Himem => self.arena.himem() as Number,
            _ => Function::call(word, &args, integer)?,
        };
        self.push(value)
    }

    fn text_function(&mut self, word: Word) -> Result<()> {
        self.next_token();
        self.expect_char(b'(')?;
        let n = match word {
            Word::Len => match self.string_value()? {
                Some(s) => s.len() as Number,
                None => {
                    let name = buffer_name(self.value()?)?;
                    self.arena.length(Kind::Buffer, name).unwrap_or(0) as Number
                }
            },
            Word::Val => {
                let s = self.text()?;
                parse_number(&s, self.config.integer).unwrap_or(0.0)
            }
            Word::Asc => {
                let s = self.text()?;
                s.first().map_or(0.0, |c| Number::from(*c))
            }
            _ => {
                let s = self.text()?;
                self.expect_char(b',')?;
                let t = self.text()?;
                if t.is_empty() {
                    0.0
                } else {
                    s.windows(t.len())
                        .position(|w| w == t.as_slice())
                        .map_or(0.0, |i| (i + 1) as Number)
                }
            }
        };
        self.expect_char(b')')?;
        self.push(n)
    }

    /// Payload address of a heap object, 0 when there is none.
    fn find(&mut self) -> Result<()> {
        self.next_token();
        self.expect_char(b'(')?;
        let (kind, name) = match self.token {
            Token::Var(name) => {
                self.next_token();
                (Kind::Scalar, name)
            }
            Token::StrVar(name) => {
                self.next_token();
                (Kind::String, name)
            }
            Token::ArrayVar(name) => {
                self.next_token();
                self.expect_char(b'(')?;
                self.expect_char(b')')?;
                (Kind::Array, name)
            }
            Token::Word(Word::Fn) => {
                self.next_token();
                match self.token {
                    Token::Var(name) | Token::ArrayVar(name) => {
                        self.next_token();
                        (Kind::Function, name)
                    }
                    _ => return Err(error!(SyntaxError)),
                }
            }
            _ => (Kind::Buffer, buffer_name(self.value()?)?),
        };
        self.expect_char(b')')?;
        let at = self.arena.find(kind, name).map_or(0, |f| f.at);
        self.push(at as Number)
    }

    /// Evaluates a user function. The parameter shadows a variable of
    /// the same name for the duration of the call.
    fn call_fn(&mut self) -> Result<()> {
        self.next_token();
        let name = match self.token {
            Token::ArrayVar(name) | Token::Var(name) => name,
            _ => return Err(error!(SyntaxError)),
        };
        self.next_token();
        let arg = if self.token.is_char(b'(') {
            self.next_token();
            let arg = if self.token.is_char(b')') {
                None
            } else {
                Some(self.value()?)
            };
            self.expect_char(b')')?;
            arg
        } else {
            None
        };
        let found = self
            .arena
            .find(Kind::Function, name)
            .ok_or_else(|| error!(UndefinedFunction))?;
        let addr = self.arena.codec().addr_size();
        let entry = self.arena.address_at(found.at);
        let param: Name = [
            self.arena.bytes[found.at + addr],
            self.arena.bytes[found.at + addr + 1],
        ];
        if self.depth >= self.config.stack_size {
            return Err(error!(StackOverflow; "FN"));
        }
        let back = self.location();
        let saved = match (param, arg) {
            ([0, 0], None) => None,
            ([0, 0], Some(_)) | (_, None) => return Err(error!(IllegalFunctionCall)),
            (param, Some(value)) => {
                let old = self.var_exists(param);
                self.set_var(param, value)?;
                Some((param, old))
            }
        };
        let mode = if self.mode == Mode::RunStore {
            Mode::RunStore
        } else {
            Mode::Run
        };
        self.jump(Location { mode, at: entry });
        let result = if self.token == Token::Operator(Operator::Equal) {
            self.next_token();
            self.expression()
        } else {
            Err(error!(SyntaxError))
        };
        let restored = match saved {
            Some((param, Some(value))) => self.set_var(param, value),
            Some((param, None)) => {
                self.arena.delete(Kind::Scalar, param);
                Ok(())
            }
            None => Ok(()),
        };
        result?;
        restored?;
        self.jump(back);
        Ok(())
    }
}

fn byte(n: Number) -> Result<u8> {
    if n < 0.0 || n > 255.0 {
        return Err(error!(IllegalFunctionCall));
    }
    Ok(n as u8)
}

fn count(n: Number) -> Result<usize> {
    if n < 0.0 {
        return Err(error!(IllegalFunctionCall));
    }
    Ok(n as usize)
}

fn address(n: Number) -> Result<Address> {
    if n < 0.0 {
        return Err(error!(IllegalFunctionCall));
    }
    Ok(n as Address)
}

/// Buffers are named by a number from 0 to 65535.
pub(crate) fn buffer_name(n: Number) -> Result<Name> {
    if n < 0.0 || n > 65535.0 {
        return Err(error!(IllegalFunctionCall));
    }
    let id = n as u16;
    Ok(id.to_le_bytes())
}

pub(crate) fn parse_number(s: &[u8], integer: bool) -> Option<Number> {
    let n = std::str::from_utf8(s).ok()?.trim().parse::<Number>().ok()?;
    Some(if integer { n.trunc() } else { n })
}
