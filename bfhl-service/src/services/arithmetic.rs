//! Pure integer routines behind the arithmetic operations.

use serde::ser::Error as _;
use serde::{Serialize, Serializer};
use serde_json::value::RawValue;
use std::fmt;
use thiserror::Error;

/// Largest sequence length `fibonacci` accepts.
pub const FIBONACCI_MAX_TERMS: u16 = 1000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error("{0} requires at least one value")]
    EmptyInput(&'static str),

    #[error("{0} overflowed a 64-bit integer")]
    Overflow(&'static str),
}

/// Limb radix for [`FibTerm`]: 18 decimal digits, so two limbs plus a carry
/// stay below `u64::MAX`.
const LIMB_BASE: u64 = 1_000_000_000_000_000_000;

/// One Fibonacci term, exact at any index.
///
/// Stored as base-10^18 limbs, least significant first, with no leading zero
/// limbs. Serialises as a JSON integer: a plain `u64` while it fits, a raw
/// digit string beyond that (F(94) onwards).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FibTerm {
    limbs: Vec<u64>,
}

impl FibTerm {
    /// Value as `u64`, if it fits.
    pub fn to_u64(&self) -> Option<u64> {
        match self.limbs.as_slice() {
            [lo] => Some(*lo),
            [lo, hi] => hi.checked_mul(LIMB_BASE)?.checked_add(*lo),
            _ => None,
        }
    }

    fn add(&self, other: &FibTerm) -> FibTerm {
        let len = self.limbs.len().max(other.limbs.len());
        let mut limbs = Vec::with_capacity(len + 1);
        let mut carry = 0;

        for i in 0..len {
            let sum = self.limbs.get(i).copied().unwrap_or(0)
                + other.limbs.get(i).copied().unwrap_or(0)
                + carry;
            limbs.push(sum % LIMB_BASE);
            carry = sum / LIMB_BASE;
        }
        if carry > 0 {
            limbs.push(carry);
        }

        FibTerm { limbs }
    }
}

impl From<u64> for FibTerm {
    fn from(value: u64) -> Self {
        let limbs = if value < LIMB_BASE {
            vec![value]
        } else {
            vec![value % LIMB_BASE, value / LIMB_BASE]
        };
        FibTerm { limbs }
    }
}

impl fmt::Display for FibTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut limbs = self.limbs.iter().rev();
        if let Some(most_significant) = limbs.next() {
            write!(f, "{}", most_significant)?;
        }
        for limb in limbs {
            write!(f, "{:018}", limb)?;
        }
        Ok(())
    }
}

impl Serialize for FibTerm {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.to_u64() {
            Some(value) => serializer.serialize_u64(value),
            None => RawValue::from_string(self.to_string())
                .map_err(S::Error::custom)?
                .serialize(serializer),
        }
    }
}

/// First `n` Fibonacci numbers, starting 0, 1, 1, 2, ...
pub fn fibonacci(n: u16) -> Vec<FibTerm> {
    let mut terms = Vec::with_capacity(n as usize);
    let (mut a, mut b) = (FibTerm::from(0), FibTerm::from(1));

    for _ in 0..n {
        let next = a.add(&b);
        terms.push(std::mem::replace(&mut a, std::mem::replace(&mut b, next)));
    }

    terms
}

pub fn is_prime(x: i64) -> bool {
    if x < 2 {
        return false;
    }

    let mut i = 2;
    // i <= x / i is i * i <= x without the overflow.
    while i <= x / i {
        if x % i == 0 {
            return false;
        }
        i += 1;
    }
    true
}

pub fn filter_primes(values: &[i64]) -> Vec<i64> {
    values.iter().copied().filter(|&v| is_prime(v)).collect()
}

/// Euclid's algorithm with truncating remainder.
///
/// Signs follow the remainder, so `gcd(4, -6)` is `-2`.
pub fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        let r = a.wrapping_rem(b);
        a = b;
        b = r;
    }
    a
}

pub fn hcf(values: &[i64]) -> Result<i64, ArithmeticError> {
    let (&first, rest) = values
        .split_first()
        .ok_or(ArithmeticError::EmptyInput("hcf"))?;

    Ok(rest.iter().fold(first, |acc, &v| gcd(acc, v)))
}

pub fn lcm(values: &[i64]) -> Result<i64, ArithmeticError> {
    let (&first, rest) = values
        .split_first()
        .ok_or(ArithmeticError::EmptyInput("lcm"))?;

    rest.iter().try_fold(first, |acc, &v| {
        let divisor = gcd(acc, v);
        if divisor == 0 {
            return Ok(0);
        }
        // The gcd divides acc, so dividing first only fails when the lcm
        // itself is out of range.
        acc.checked_div(divisor)
            .and_then(|quotient| quotient.checked_mul(v))
            .ok_or(ArithmeticError::Overflow("lcm"))
    })
}
