use crate::error;
use crate::lang::{Error, Number, Word};

type Result<T> = std::result::Result<T, Error>;

pub struct Function {}

impl Function {
    /// Built-ins taking numeric arguments and how many they take.
    /// Functions with string arguments are parsed by the evaluator.
    pub fn arity(word: Word) -> Option<std::ops::RangeInclusive<usize>> {
        use Word::*;
        match word {
            Abs | Sgn | Int | Sqr | Sin | Cos | Tan | Atan | Log | Exp => Some(1..=1),
            Pow => Some(2..=2),
            Rnd | Peek | Millis | Avail => Some(1..=1),
            Malloc => Some(2..=2),
            Size | Himem => Some(0..=0),
            _ => None,
        }
    }

    /// Pure math. In integer mode every result is truncated.
    pub fn call(word: Word, args: &[Number], integer: bool) -> Result<Number> {
        use Word::*;
        let x = args.first().copied().unwrap_or(0.0);
        let n = match word {
            Abs => x.abs(),
            Sgn => {
                if x > 0.0 {
                    1.0
                } else if x < 0.0 {
                    -1.0
                } else {
                    0.0
                }
            }
            Int => x.floor(),
            Sqr => {
                if x < 0.0 {
                    return Err(error!(IllegalFunctionCall));
                }
                x.sqrt()
            }
            Sin => x.sin(),
            Cos => x.cos(),
            Tan => x.tan(),
            Atan => x.atan(),
            Log => {
                if x <= 0.0 {
                    return Err(error!(IllegalFunctionCall));
                }
                x.ln()
            }
            Exp => x.exp(),
            Pow => {
                let y = args.get(1).copied().unwrap_or(0.0);
                return super::Operation::power(x, y, integer);
            }
            _ => return Err(error!(InternalError; "NOT A MATH FUNCTION")),
        };
        if !n.is_finite() {
            return Err(error!(Overflow));
        }
        Ok(if integer { n.trunc() } else { n })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_math() {
        assert_eq!(Function::call(Word::Abs, &[-2.5], false).unwrap(), 2.5);
        assert_eq!(Function::call(Word::Int, &[-2.5], false).unwrap(), -3.0);
        assert_eq!(Function::call(Word::Sgn, &[-0.1], false).unwrap(), -1.0);
        assert_eq!(Function::call(Word::Pow, &[2.0, 10.0], false).unwrap(), 1024.0);
        assert_eq!(Function::call(Word::Sqr, &[17.0], true).unwrap(), 4.0);
    }

    #[test]
    fn test_domain_errors() {
        assert!(Function::call(Word::Sqr, &[-1.0], false).is_err());
        assert!(Function::call(Word::Log, &[0.0], false).is_err());
        assert!(Function::call(Word::Exp, &[1000.0], false).is_err());
    }

    #[test]
    fn test_arity() {
        assert_eq!(Function::arity(Word::Pow), Some(2..=2));
        assert_eq!(Function::arity(Word::Print), None);
    }
}
