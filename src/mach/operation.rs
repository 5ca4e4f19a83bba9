use crate::error;
use crate::lang::{Error, Number};

type Result<T> = std::result::Result<T, Error>;

/// Value of a true comparison.
pub const TRUE: Number = -1.0;

pub struct Operation {}

impl Operation {
    fn checked(n: Number) -> Result<Number> {
        if n.is_finite() {
            Ok(n)
        } else {
            Err(error!(Overflow))
        }
    }

    fn truth(b: bool) -> Number {
        if b {
            TRUE
        } else {
            0.0
        }
    }

    /// Whole-number view of a value for the bitwise operators.
    fn bits(n: Number) -> Result<i32> {
        if n.is_finite() && n >= i32::min_value() as Number && n <= i32::max_value() as Number {
            Ok(n as i32)
        } else {
            Err(error!(Overflow))
        }
    }

    pub fn negate(n: Number) -> Number {
        -n
    }

    pub fn add(lhs: Number, rhs: Number) -> Result<Number> {
        Operation::checked(lhs + rhs)
    }

    pub fn subtract(lhs: Number, rhs: Number) -> Result<Number> {
        Operation::checked(lhs - rhs)
    }

    pub fn multiply(lhs: Number, rhs: Number) -> Result<Number> {
        Operation::checked(lhs * rhs)
    }

    pub fn divide(lhs: Number, rhs: Number, integer: bool) -> Result<Number> {
        if rhs == 0.0 {
            return Err(error!(DivisionByZero));
        }
        let q = lhs / rhs;
        Operation::checked(if integer { q.trunc() } else { q })
    }

    /// Remainder of whole numbers, sign of the dividend.
    pub fn modulus(lhs: Number, rhs: Number) -> Result<Number> {
        let r = Operation::bits(rhs.trunc())?;
        if r == 0 {
            return Err(error!(DivisionByZero));
        }
        let l = Operation::bits(lhs.trunc())?;
        match l.checked_rem(r) {
            Some(n) => Ok(n as Number),
            None => Err(error!(Overflow)),
        }
    }

    pub fn power(lhs: Number, rhs: Number, integer: bool) -> Result<Number> {
        let p = lhs.powf(rhs);
        if p.is_nan() {
            return Err(error!(IllegalFunctionCall));
        }
        Operation::checked(if integer { p.trunc() } else { p })
    }

    pub fn equal(lhs: Number, rhs: Number) -> Number {
        Operation::truth(lhs == rhs)
    }

    pub fn not_equal(lhs: Number, rhs: Number) -> Number {
        Operation::truth(lhs != rhs)
    }

    pub fn less(lhs: Number, rhs: Number) -> Number {
        Operation::truth(lhs < rhs)
    }

    pub fn less_equal(lhs: Number, rhs: Number) -> Number {
        Operation::truth(lhs <= rhs)
    }

    pub fn greater(lhs: Number, rhs: Number) -> Number {
        Operation::truth(lhs > rhs)
    }

    pub fn greater_equal(lhs: Number, rhs: Number) -> Number {
        Operation::truth(lhs >= rhs)
    }

    pub fn not(n: Number) -> Result<Number> {
        Ok(!Operation::bits(n)? as Number)
    }

    pub fn and(lhs: Number, rhs: Number) -> Result<Number> {
        Ok((Operation::bits(lhs)? & Operation::bits(rhs)?) as Number)
    }

    pub fn or(lhs: Number, rhs: Number) -> Result<Number> {
        Ok((Operation::bits(lhs)? | Operation::bits(rhs)?) as Number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;

    #[test]
    fn test_divide() {
        assert_eq!(Operation::divide(7.0, 2.0, false).unwrap(), 3.5);
        assert_eq!(Operation::divide(7.0, 2.0, true).unwrap(), 3.0);
        assert_eq!(Operation::divide(-7.0, 2.0, true).unwrap(), -3.0);
        let e = Operation::divide(1.0, 0.0, false).unwrap_err();
        assert!(e.is(ErrorCode::DivisionByZero));
    }

    #[test]
    fn test_overflow() {
        let e = Operation::multiply(1e30, 1e30).unwrap_err();
        assert!(e.is(ErrorCode::Overflow));
        assert!(Operation::and(1e20, 1.0).is_err());
    }

    #[test]
    fn test_logic_is_bitwise() {
        assert_eq!(Operation::not(0.0).unwrap(), TRUE);
        assert_eq!(Operation::not(TRUE).unwrap(), 0.0);
        assert_eq!(Operation::and(TRUE, 6.0).unwrap(), 6.0);
        assert_eq!(Operation::or(4.0, 1.0).unwrap(), 5.0);
        assert_eq!(Operation::less(1.0, 2.0), TRUE);
    }

    #[test]
    fn test_modulus() {
        assert_eq!(Operation::modulus(7.0, 3.0).unwrap(), 1.0);
        assert_eq!(Operation::modulus(-7.0, 3.0).unwrap(), -1.0);
        assert!(Operation::modulus(7.0, 0.5).is_err());
    }
}
