//! Textual and hexadecimal polynomial grammars.
//!
//! A polynomial is a `+`/`-` separated list of monomials, each of the form
//! `[-][coefficient][*][x[^power]]`. Whitespace is ignored anywhere:
//!
//! ```
//! use gfpn::parse_polynomial;
//!
//! let p = parse_polynomial("456 * x ^ 4 + 4x^2").unwrap();
//! assert_eq!(p.coefficients(), &[0, 0, 4, 0, 456]);
//!
//! let q = parse_polynomial("-x^2 - 3x + 1").unwrap();
//! assert_eq!(q.coefficients(), &[1, -3, -1]);
//! ```
//!
//! The hex grammar reads bytes as bit vectors over GF(2): bit `j` of byte `i`
//! is the coefficient of `x^(8i + j)`.

use core::fmt;
use core::str::FromStr;
use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ParseError;
use crate::structures::poly::Polynomial;

static MONOMIAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(-?[0-9]*)(?:\*?(x)(?:\^([0-9]+))?)?$").expect("monomial pattern is valid")
});

/// A single term `coefficient * x^power`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Monomial {
    pub coefficient: i64,
    pub power: usize,
}

impl Monomial {
    pub fn to_polynomial(&self) -> Polynomial {
        Polynomial::monomial(self.coefficient, self.power)
    }
}

impl From<Monomial> for Polynomial {
    fn from(m: Monomial) -> Self {
        m.to_polynomial()
    }
}

impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_polynomial(), f)
    }
}

impl FromStr for Monomial {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_monomial(s)
    }
}

impl FromStr for Polynomial {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_polynomial(s)
    }
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Parse a single monomial such as `456 * x ^ 123`, `-x` or `7`.
///
/// The coefficient defaults to `1` (`-1` after a bare `-`), a missing `x`
/// means power `0` and a bare `x` means power `1`.
pub fn parse_monomial(s: &str) -> Result<Monomial, ParseError> {
    let compact = strip_whitespace(s);
    let caps = MONOMIAL
        .captures(&compact)
        .ok_or_else(|| ParseError::InvalidMonomial(s.to_string()))?;

    let coefficient = caps.get(1).map_or("", |m| m.as_str());
    let has_x = caps.get(2).is_some();

    let coefficient = match coefficient {
        "" | "-" if !has_x => return Err(ParseError::InvalidMonomial(s.to_string())),
        "" => 1,
        "-" => -1,
        digits => {
            let c = digits
                .parse::<i32>()
                .map_err(|_| ParseError::CoefficientOutOfRange(digits.to_string()))?;
            i64::from(c)
        }
    };

    let power = match (has_x, caps.get(3)) {
        (false, _) => 0,
        (true, None) => 1,
        (true, Some(digits)) => {
            let digits = digits.as_str();
            let power = digits
                .parse::<i32>()
                .map_err(|_| ParseError::PowerOutOfRange(digits.to_string()))?;
            power as usize
        }
    };

    Ok(Monomial { coefficient, power })
}

/// Parse a polynomial such as `3x^2 + 4x + 1`.
///
/// # Errors
///
/// `InvalidMonomial` for any term outside the grammar, `DuplicatePower` if
/// two terms share a power.
pub fn parse_polynomial(s: &str) -> Result<Polynomial, ParseError> {
    parse_terms(s).map(from_terms)
}

/// Parse `s` into its terms keyed by power, without building the dense
/// coefficient vector.
pub(crate) fn parse_terms(s: &str) -> Result<BTreeMap<usize, i64>, ParseError> {
    let compact = strip_whitespace(s);
    // Subtraction is addition of a negated term; a leading sign belongs to
    // the first term.
    let signed = match compact.strip_prefix('-') {
        Some(rest) => format!("-{}", rest.replace('-', "+-")),
        None => compact.replace('-', "+-"),
    };

    let mut terms = BTreeMap::new();
    for part in signed.split('+') {
        let m = parse_monomial(part)?;
        if terms.insert(m.power, m.coefficient).is_some() {
            return Err(ParseError::DuplicatePower(m.power));
        }
    }
    Ok(terms)
}

/// Dense polynomial from `(power, coefficient)` pairs. Zero terms do not
/// count towards the allocated length.
pub(crate) fn from_terms<I>(terms: I) -> Polynomial
where
    I: IntoIterator<Item = (usize, i64)>,
{
    let terms: Vec<(usize, i64)> = terms.into_iter().filter(|&(_, c)| c != 0).collect();
    let Some(degree) = terms.iter().map(|&(power, _)| power).max() else {
        return Polynomial::zero();
    };

    let mut coeffs = vec![0i64; degree + 1];
    for (power, c) in terms {
        coeffs[power] = c;
    }
    Polynomial::new(coeffs)
}

/// Parse a hex string (optionally `0x`-prefixed) into a polynomial over GF(2).
///
/// An empty string is the zero polynomial; an odd number of digits is
/// rejected.
///
/// ```
/// use gfpn::parse_polynomial_hex;
///
/// let p = parse_polynomial_hex("0x1b").unwrap();
/// assert_eq!(p.to_string(), "x^4 + x^3 + x + 1");
/// ```
pub fn parse_polynomial_hex(s: &str) -> Result<Polynomial, ParseError> {
    let s = s.trim();
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    let bytes = hex::decode(digits)?;

    let mut coeffs = vec![0i64; bytes.len() * 8];
    for (i, byte) in bytes.iter().enumerate() {
        for j in 0..8 {
            if (byte >> j) & 1 == 1 {
                coeffs[i * 8 + j] = 1;
            }
        }
    }
    Ok(Polynomial::new(coeffs))
}

/// Like [`parse_polynomial`], panicking on malformed input.
pub fn must_parse_polynomial(s: &str) -> Polynomial {
    parse_polynomial(s).unwrap_or_else(|e| panic!("not a valid polynomial: {e}"))
}

/// Like [`parse_polynomial_hex`], panicking on malformed input.
pub fn must_parse_polynomial_hex(s: &str) -> Polynomial {
    parse_polynomial_hex(s).unwrap_or_else(|e| panic!("not a valid polynomial: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mono(coefficient: i64, power: usize) -> Monomial {
        Monomial { coefficient, power }
    }

    #[test]
    fn monomial_valid() {
        let cases = [
            ("0", mono(0, 0)),
            ("1", mono(1, 0)),
            ("123", mono(123, 0)),
            (" 123 ", mono(123, 0)),
            ("-7", mono(-7, 0)),
            ("x^0", mono(1, 0)),
            ("x ^ 0", mono(1, 0)),
            ("x", mono(1, 1)),
            ("-x", mono(-1, 1)),
            ("1x", mono(1, 1)),
            ("123x", mono(123, 1)),
            ("123*x", mono(123, 1)),
            ("123 * x", mono(123, 1)),
            ("x^1", mono(1, 1)),
            ("x^123", mono(1, 123)),
            ("x ^ 123", mono(1, 123)),
            ("456x^123", mono(456, 123)),
            ("456*x^123", mono(456, 123)),
            ("456 * x ^ 123", mono(456, 123)),
        ];
        for (input, expected) in cases {
            assert_eq!(parse_monomial(input), Ok(expected), "input {input:?}");
        }
    }

    #[test]
    fn monomial_invalid() {
        for input in ["", "-", "foo", "2x^2x", "x^", "2^3", "3*", "x^-1"] {
            assert!(
                matches!(parse_monomial(input), Err(ParseError::InvalidMonomial(_))),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn monomial_out_of_range() {
        assert!(matches!(
            parse_monomial("3000000000"),
            Err(ParseError::CoefficientOutOfRange(_))
        ));
        assert!(matches!(
            parse_monomial("x^3000000000"),
            Err(ParseError::PowerOutOfRange(_))
        ));
    }

    #[test]
    fn monomial_display() {
        assert_eq!(mono(3, 2).to_string(), "3x^2");
        assert_eq!(mono(-1, 1).to_string(), "-x");
        assert_eq!(mono(0, 4).to_string(), "0");
    }

    #[test]
    fn polynomial_valid() {
        let cases: [(&str, &[i64]); 21] = [
            ("0", &[]),
            ("1", &[1]),
            ("123", &[123]),
            (" 123 ", &[123]),
            ("x^0", &[1]),
            ("x ^ 0", &[1]),
            ("x", &[0, 1]),
            ("x+1", &[1, 1]),
            ("1x", &[0, 1]),
            ("1*x", &[0, 1]),
            ("1*x + 123", &[123, 1]),
            ("1 * x", &[0, 1]),
            ("123x", &[0, 123]),
            ("x^1", &[0, 1]),
            ("x ^ 1", &[0, 1]),
            ("x^2", &[0, 0, 1]),
            ("456x^4", &[0, 0, 0, 0, 456]),
            ("0x^4", &[]),
            ("456 * x ^ 4", &[0, 0, 0, 0, 456]),
            ("456 * x ^ 4 + 4x^2", &[0, 0, 4, 0, 456]),
            ("4x^2 + 456 * x ^ 4", &[0, 0, 4, 0, 456]),
        ];
        for (input, expected) in cases {
            let p = parse_polynomial(input).unwrap();
            assert_eq!(p.coefficients(), expected, "input {input:?}");
        }
    }

    #[test]
    fn polynomial_negative_terms() {
        assert_eq!(parse_polynomial("-x").unwrap().coefficients(), &[0, -1]);
        assert_eq!(parse_polynomial("x - 1").unwrap().coefficients(), &[-1, 1]);
        assert_eq!(
            parse_polynomial("-2x^3 - x + 5").unwrap().coefficients(),
            &[5, -1, 0, -2]
        );
    }

    #[test]
    fn polynomial_invalid() {
        assert!(matches!(parse_polynomial(""), Err(ParseError::InvalidMonomial(_))));
        assert!(matches!(parse_polynomial("foo"), Err(ParseError::InvalidMonomial(_))));
        assert!(matches!(parse_polynomial("+x"), Err(ParseError::InvalidMonomial(_))));
        assert!(matches!(parse_polynomial("x--1"), Err(ParseError::InvalidMonomial(_))));
    }

    #[test]
    fn polynomial_duplicate_powers() {
        let err = parse_polynomial("1+1").unwrap_err();
        assert!(err.to_string().contains("multiple monomials with power 0"));
        assert_eq!(parse_polynomial("x+x"), Err(ParseError::DuplicatePower(1)));
        assert_eq!(parse_polynomial("x^4+x^4"), Err(ParseError::DuplicatePower(4)));
        assert_eq!(parse_polynomial("0x^4 + x^4"), Err(ParseError::DuplicatePower(4)));
    }

    #[test]
    fn polynomial_from_str() {
        let p: Polynomial = "3x^2 + 4x + 1".parse().unwrap();
        assert_eq!(p.coefficients(), &[1, 4, 3]);
    }

    #[test]
    fn display_round_trip() {
        for input in ["0", "x", "3x^2 + 4x + 1", "-x^2 - 3x + 1", "x^8 + x^4 + x^3 + x + 1", "-7"] {
            let p = parse_polynomial(input).unwrap();
            assert_eq!(p.to_string(), input);
            assert_eq!(parse_polynomial(&p.to_string()).unwrap(), p);
        }
    }

    #[test]
    fn hex_single_byte() {
        assert_eq!(parse_polynomial_hex("a3").unwrap().coefficients(), &[1, 1, 0, 0, 0, 1, 0, 1]);
        assert_eq!(parse_polynomial_hex("0x44").unwrap().coefficients(), &[0, 0, 1, 0, 0, 0, 1]);
        assert_eq!(parse_polynomial_hex("0X01").unwrap(), Polynomial::one());
    }

    #[test]
    fn hex_multiple_bytes() {
        // second byte holds x^8..x^15
        let p = parse_polynomial_hex("0x0102").unwrap();
        assert_eq!(p, Polynomial::new(vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 1]));
    }

    #[test]
    fn hex_empty_and_zero() {
        assert!(parse_polynomial_hex("").unwrap().is_zero());
        assert!(parse_polynomial_hex("0x").unwrap().is_zero());
        assert!(parse_polynomial_hex("00").unwrap().is_zero());
    }

    #[test]
    fn hex_invalid() {
        assert!(matches!(parse_polynomial_hex("abc"), Err(ParseError::InvalidHex(_))));
        assert!(matches!(parse_polynomial_hex("zz"), Err(ParseError::InvalidHex(_))));
    }

    #[test]
    fn zero_terms_do_not_extend_degree() {
        assert_eq!(parse_polynomial("0x^2147483647 + 1").unwrap(), Polynomial::one());
        assert!(parse_polynomial("0x^5 + 0").unwrap().is_zero());
    }

    #[test]
    #[should_panic(expected = "not a valid polynomial")]
    fn must_parse_panics() {
        must_parse_polynomial("x+x");
    }
}
