//! Error types for parsing and field arithmetic.

use thiserror::Error;

/// Errors produced while parsing textual or hexadecimal polynomials.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// A `+`-separated term does not match the monomial grammar.
    #[error("not a valid monomial: {0:?}")]
    InvalidMonomial(String),
    /// Two terms of the same polynomial share a power of `x`.
    #[error("multiple monomials with power {0} specified")]
    DuplicatePower(usize),
    /// The coefficient does not fit in a 32-bit signed integer.
    #[error("coefficient exceeds 32-bit range: {0}")]
    CoefficientOutOfRange(String),
    /// The power does not fit in a 32-bit signed integer.
    #[error("power exceeds 32-bit range: {0}")]
    PowerOutOfRange(String),
    /// The hex digits could not be decoded.
    #[error("invalid hex polynomial: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// Errors produced by field construction and element arithmetic.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("not a valid polynomial: {0}")]
    InvalidPolynomial(#[from] ParseError),
    #[error("degree of modulus must be equal to field's n = {expected}, but is {got:?}")]
    InvalidModulus { expected: usize, got: Option<usize> },
    #[error("leading coefficient {0} of modulus has no inverse modulo the characteristic")]
    ModulusLeadNotInvertible(i64),
    #[error("field characteristic must be in [2, 2^31), got {0}")]
    InvalidCharacteristic(i64),
    #[error("field extension degree must be at least 1")]
    InvalidDegree,
    #[error("field order {p}^{n} does not fit in 64 bits")]
    OrderOverflow { p: i64, n: usize },
    #[error("degree of polynomial is larger than field's n = {max}, got {got}")]
    DegreeTooLarge { max: usize, got: usize },
    #[error("operands are not elements of the same field")]
    FieldMismatch,
    #[error("cannot divide by zero")]
    DivisionByZero,
    /// Only reachable when the modulus is reducible.
    #[error("element is not invertible (modulus is not irreducible)")]
    NotInvertible,
    #[error("hex encoding is only supported in characteristic 2, field has p = {p}")]
    HexUnsupported { p: i64 },
}
