use core::fmt;
use core::ops::{Add, Mul, Neg, Sub};

use crate::error::FieldError;
use crate::utils::mod_inverse;

/// Polynomial with integer coefficients.
///
/// Coefficients are stored in ascending order of degree:
/// `coeffs[i]` is the coefficient of `x^i`. The highest stored coefficient
/// is always non-zero; the zero polynomial is an empty coefficient vector.
///
/// Plain arithmetic (`+`, `-`, `*`) works over ℤ and performs no modular
/// reduction. The `*_mod` methods work over ℤ_p and are the building blocks
/// of [`Element`](crate::Element) arithmetic.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Polynomial {
    coeffs: Vec<i64>,
}

impl Polynomial {
    /// Create a polynomial from coefficients in ascending order.
    ///
    /// Trailing zeros are removed.
    ///
    /// # Example
    ///
    /// ```
    /// use gfpn::Polynomial;
    ///
    /// // 3 + 2x + x^2
    /// let p = Polynomial::new(vec![3, 2, 1, 0, 0]);
    /// assert_eq!(p.degree(), Some(2));
    /// assert_eq!(p.to_string(), "x^2 + 2x + 3");
    /// ```
    pub fn new(coeffs: Vec<i64>) -> Self {
        let mut poly = Self { coeffs };
        poly.normalize();
        poly
    }

    /// The zero polynomial.
    pub fn zero() -> Self {
        Self { coeffs: Vec::new() }
    }

    /// The constant polynomial `1`.
    pub fn one() -> Self {
        Self { coeffs: vec![1] }
    }

    /// The constant polynomial `c`.
    pub fn constant(c: i64) -> Self {
        Self::monomial(c, 0)
    }

    /// The polynomial `x`.
    pub fn x() -> Self {
        Self::monomial(1, 1)
    }

    /// The single-term polynomial `c * x^n`.
    pub fn monomial(c: i64, n: usize) -> Self {
        if c == 0 {
            return Self::zero();
        }
        let mut coeffs = vec![0; n + 1];
        coeffs[n] = c;
        Self { coeffs }
    }

    /// Trim zero coefficients above the highest non-zero term.
    ///
    /// Works in place and returns `self` for chaining.
    pub fn normalize(&mut self) -> &mut Self {
        while let Some(&0) = self.coeffs.last() {
            self.coeffs.pop();
        }
        self
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    pub fn is_one(&self) -> bool {
        self.coeffs == [1]
    }

    /// Degree of the polynomial.
    ///
    /// Returns `None` for the zero polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    /// Leading coefficient, or `0` for the zero polynomial.
    pub fn lead(&self) -> i64 {
        self.coeffs.last().copied().unwrap_or(0)
    }

    /// Coefficient of `x^i`; zero beyond the degree.
    pub fn coeff(&self, i: usize) -> i64 {
        self.coeffs.get(i).copied().unwrap_or(0)
    }

    /// All coefficients in ascending order of degree.
    pub fn coefficients(&self) -> &[i64] {
        &self.coeffs
    }

    /// Reduce every coefficient into `[0, p)` and trim.
    pub fn reduce_coefficients(&self, p: i64) -> Self {
        Self::new(self.coeffs.iter().map(|c| c.rem_euclid(p)).collect())
    }

    /// Product over ℤ_p.
    ///
    /// Coefficients are reduced before and during the convolution, so any
    /// `p` below 2^31 is free of overflow.
    pub fn mul_mod(&self, rhs: &Self, p: i64) -> Self {
        let a = self.reduce_coefficients(p);
        let b = rhs.reduce_coefficients(p);
        if a.is_zero() || b.is_zero() {
            return Self::zero();
        }

        let mut coeffs = vec![0i64; a.coeffs.len() + b.coeffs.len() - 1];
        for (i, &ai) in a.coeffs.iter().enumerate() {
            for (j, &bj) in b.coeffs.iter().enumerate() {
                coeffs[i + j] = (coeffs[i + j] + ai * bj) % p;
            }
        }

        Self::new(coeffs)
    }

    /// Euclidean division over ℤ_p.
    ///
    /// Returns `(q, r)` with `self ≡ q * divisor + r (mod p)` and
    /// `deg(r) < deg(divisor)`, both reduced into `[0, p)`.
    ///
    /// # Errors
    ///
    /// `DivisionByZero` if `divisor` vanishes mod `p`; `NotInvertible` if
    /// its leading coefficient has no inverse mod `p` (composite `p`).
    ///
    /// # Example
    ///
    /// ```
    /// use gfpn::Polynomial;
    ///
    /// // x^2 + 1 = 2 * (3x^2 + 4x + 1) + (2x + 4)  over ℤ_5
    /// let a = Polynomial::new(vec![1, 0, 1]);
    /// let b = Polynomial::new(vec![1, 4, 3]);
    /// let (q, r) = a.div_rem_mod(&b, 5).unwrap();
    /// assert_eq!(q, Polynomial::constant(2));
    /// assert_eq!(r, Polynomial::new(vec![4, 2]));
    /// ```
    pub fn div_rem_mod(&self, divisor: &Self, p: i64) -> Result<(Self, Self), FieldError> {
        let divisor = divisor.reduce_coefficients(p);
        if divisor.is_zero() {
            return Err(FieldError::DivisionByZero);
        }
        if divisor.is_one() {
            return Ok((self.reduce_coefficients(p), Self::zero()));
        }

        let lead_inv = mod_inverse(divisor.lead(), p).ok_or(FieldError::NotInvertible)?;
        Ok(self.div_rem_with_inverse(&divisor, lead_inv, p))
    }

    /// Schoolbook division over ℤ_p with a precomputed `lead_inv`.
    ///
    /// `divisor` must be non-zero with coefficients in `[0, p)`, and
    /// `lead_inv * divisor.lead() ≡ 1 (mod p)`.
    pub(crate) fn div_rem_with_inverse(&self, divisor: &Self, lead_inv: i64, p: i64) -> (Self, Self) {
        let dividend = self.reduce_coefficients(p);
        let divisor_deg = divisor.coeffs.len() - 1;
        let dividend_deg = match dividend.degree() {
            Some(d) if d >= divisor_deg => d,
            _ => return (Self::zero(), dividend),
        };

        let mut quotient = vec![0i64; dividend_deg - divisor_deg + 1];
        let mut remainder = dividend;

        while let Some(rem_deg) = remainder.degree() {
            if rem_deg < divisor_deg {
                break;
            }

            let shift = rem_deg - divisor_deg;
            let c = (remainder.lead() * lead_inv) % p;
            quotient[shift] = c;

            // remainder -= c * x^shift * divisor
            for (i, &d) in divisor.coeffs.iter().enumerate() {
                let slot = &mut remainder.coeffs[i + shift];
                *slot = (*slot - c * d).rem_euclid(p);
            }
            remainder.normalize();
        }

        (Self::new(quotient), remainder)
    }
}

impl From<Vec<i64>> for Polynomial {
    fn from(coeffs: Vec<i64>) -> Self {
        Self::new(coeffs)
    }
}

/* ---- Arithmetic operators (over ℤ) ---- */

impl Add<&Polynomial> for &Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: &Polynomial) -> Polynomial {
        let len = self.coeffs.len().max(rhs.coeffs.len());
        Polynomial::new((0..len).map(|i| self.coeff(i) + rhs.coeff(i)).collect())
    }
}

impl Add for Polynomial {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        &self + &rhs
    }
}

impl Neg for Polynomial {
    type Output = Self;

    fn neg(self) -> Self {
        let coeffs = self.coeffs.into_iter().map(|c| -c).collect();
        Self { coeffs }
    }
}

impl Sub<&Polynomial> for &Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: &Polynomial) -> Polynomial {
        let len = self.coeffs.len().max(rhs.coeffs.len());
        Polynomial::new((0..len).map(|i| self.coeff(i) - rhs.coeff(i)).collect())
    }
}

impl Sub for Polynomial {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        &self - &rhs
    }
}

impl Mul<&Polynomial> for &Polynomial {
    type Output = Polynomial;

    /// Naive O(n*m) convolution.
    fn mul(self, rhs: &Polynomial) -> Polynomial {
        if self.is_zero() || rhs.is_zero() {
            return Polynomial::zero();
        }

        let mut coeffs = vec![0i64; self.coeffs.len() + rhs.coeffs.len() - 1];
        for (i, &a) in self.coeffs.iter().enumerate() {
            for (j, &b) in rhs.coeffs.iter().enumerate() {
                coeffs[i + j] += a * b;
            }
        }

        Polynomial::new(coeffs)
    }
}

impl Mul for Polynomial {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        &self * &rhs
    }
}

/// Scalar multiplication.
impl Mul<i64> for Polynomial {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self {
        Self::new(self.coeffs.into_iter().map(|c| c * rhs).collect())
    }
}

impl fmt::Display for Polynomial {
    /// Highest power first, e.g. `-x^2 - 3x + 1`. Unit coefficients are
    /// elided before `x`, zero terms are skipped.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }

        let mut first = true;
        for (i, &c) in self.coeffs.iter().enumerate().rev() {
            if c == 0 {
                continue;
            }

            match (first, c < 0) {
                (true, true) => write!(f, "-")?,
                (true, false) => {}
                (false, true) => write!(f, " - ")?,
                (false, false) => write!(f, " + ")?,
            }
            first = false;

            let abs = c.unsigned_abs();
            match i {
                0 => write!(f, "{abs}")?,
                1 if abs == 1 => write!(f, "x")?,
                1 => write!(f, "{abs}x")?,
                _ if abs == 1 => write!(f, "x^{i}")?,
                _ => write!(f, "{abs}x^{i}")?,
            }
        }

        Ok(())
    }
}

impl fmt::Debug for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Polynomial({self})")
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Polynomial {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.coeffs.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Polynomial {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Vec::<i64>::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(coeffs: &[i64]) -> Polynomial {
        Polynomial::new(coeffs.to_vec())
    }

    #[test]
    fn new_normalizes() {
        let p = poly(&[1, 2, 0, 0]);
        assert_eq!(p.degree(), Some(1));
        assert_eq!(p.coefficients(), &[1, 2]);
    }

    #[test]
    fn new_all_zeros() {
        let p = poly(&[0, 0, 0]);
        assert!(p.is_zero());
        assert_eq!(p.degree(), None);
        assert_eq!(p.lead(), 0);
    }

    #[test]
    fn normalize_is_idempotent() {
        let mut p = Polynomial { coeffs: vec![3, 0, 5, 0, 0] };
        let once = p.normalize().clone();
        let twice = p.normalize().clone();
        assert_eq!(once, twice);
        assert_eq!(once.coefficients(), &[3, 0, 5]);
    }

    #[test]
    fn constructors() {
        assert!(Polynomial::zero().is_zero());
        assert!(Polynomial::one().is_one());
        assert!(Polynomial::constant(0).is_zero());
        assert_eq!(Polynomial::x().coefficients(), &[0, 1]);
        assert_eq!(Polynomial::monomial(3, 2).coefficients(), &[0, 0, 3]);
        assert!(Polynomial::monomial(0, 5).is_zero());
    }

    #[test]
    fn lead_and_coeff() {
        let p = poly(&[4, 0, -7]);
        assert_eq!(p.lead(), -7);
        assert_eq!(p.coeff(1), 0);
        assert_eq!(p.coeff(100), 0);
    }

    #[test]
    fn add() {
        assert_eq!(poly(&[]) + poly(&[]), poly(&[]));
        assert_eq!(poly(&[]) + poly(&[1]), poly(&[1]));
        assert_eq!(poly(&[1]) + poly(&[1, 3]), poly(&[2, 3]));
        assert_eq!(poly(&[1, 2]) + poly(&[1, 3]), poly(&[2, 5]));
        assert_eq!(poly(&[3, 0, 2]) + poly(&[5, 4]), poly(&[8, 4, 2]));
    }

    #[test]
    fn add_cancels_leading_terms() {
        let sum = poly(&[1, 2, 3]) + poly(&[0, 0, -3]);
        assert_eq!(sum.degree(), Some(1));
    }

    #[test]
    fn sub() {
        assert_eq!(poly(&[5, 4]) - poly(&[5, 4]), Polynomial::zero());
        assert_eq!(poly(&[1]) - poly(&[0, 1]), poly(&[1, -1]));
        assert_eq!(-poly(&[1, -2]), poly(&[-1, 2]));
    }

    #[test]
    fn multiply() {
        assert_eq!(poly(&[]) * poly(&[]), poly(&[]));
        assert_eq!(poly(&[]) * poly(&[1, 3]), poly(&[]));
        assert_eq!(poly(&[1]) * poly(&[1, 3]), poly(&[1, 3]));
        // (2x + 1)(3x + 1) = 6x^2 + 5x + 1
        assert_eq!(poly(&[1, 2]) * poly(&[1, 3]), poly(&[1, 5, 6]));
        // (2x^2 + 3)(4x + 5) = 8x^3 + 10x^2 + 12x + 15
        assert_eq!(poly(&[3, 0, 2]) * poly(&[5, 4]), poly(&[15, 12, 10, 8]));
        assert_eq!(poly(&[1, 2]) * 3, poly(&[3, 6]));
    }

    #[test]
    fn reduce_coefficients() {
        let p = poly(&[-1, 7, 5]).reduce_coefficients(5);
        assert_eq!(p, poly(&[4, 2]));
    }

    #[test]
    fn mul_mod() {
        // (2x + 1)(3x + 1) = 6x^2 + 5x + 1 = x^2 + 1 over ℤ_5
        assert_eq!(poly(&[1, 2]).mul_mod(&poly(&[1, 3]), 5), poly(&[1, 0, 1]));
        // (x + 1)^2 = x^2 + 1 over ℤ_2
        assert_eq!(poly(&[1, 1]).mul_mod(&poly(&[1, 1]), 2), poly(&[1, 0, 1]));
    }

    #[test]
    fn div_rem_mod_exact() {
        // (x^2 + 2x + 1) / (x + 1) = x + 1 over ℤ_7
        let (q, r) = poly(&[1, 2, 1]).div_rem_mod(&poly(&[1, 1]), 7).unwrap();
        assert_eq!(q, poly(&[1, 1]));
        assert!(r.is_zero());
    }

    #[test]
    fn div_rem_mod_identity() {
        let a = poly(&[3, 1, 4, 1, 5]);
        let b = poly(&[2, 0, 3]);
        let p = 7;
        let (q, r) = a.div_rem_mod(&b, p).unwrap();
        assert!(r.degree() < b.degree());
        let back = (&(&q * &b) + &r).reduce_coefficients(p);
        assert_eq!(back, a.reduce_coefficients(p));
    }

    #[test]
    fn div_rem_mod_small_dividend() {
        let (q, r) = poly(&[1, 1]).div_rem_mod(&poly(&[1, 0, 1]), 5).unwrap();
        assert!(q.is_zero());
        assert_eq!(r, poly(&[1, 1]));
    }

    #[test]
    fn div_rem_mod_by_one() {
        let (q, r) = poly(&[1, 2, 3]).div_rem_mod(&Polynomial::one(), 5).unwrap();
        assert_eq!(q, poly(&[1, 2, 3]));
        assert!(r.is_zero());
    }

    #[test]
    fn div_rem_mod_by_zero() {
        let err = poly(&[1, 2]).div_rem_mod(&poly(&[5, 10]), 5).unwrap_err();
        assert_eq!(err, FieldError::DivisionByZero);
    }

    #[test]
    fn div_rem_mod_non_invertible_lead() {
        // 2 has no inverse mod 4
        let err = poly(&[1, 0, 1]).div_rem_mod(&poly(&[1, 2]), 4).unwrap_err();
        assert_eq!(err, FieldError::NotInvertible);
    }

    #[test]
    fn display() {
        assert_eq!(Polynomial::zero().to_string(), "0");
        assert_eq!(poly(&[1]).to_string(), "1");
        assert_eq!(poly(&[0, 1]).to_string(), "x");
        assert_eq!(poly(&[1, 4, 3]).to_string(), "3x^2 + 4x + 1");
        assert_eq!(poly(&[1, 1, 0, 1, 1, 0, 0, 0, 1]).to_string(), "x^8 + x^4 + x^3 + x + 1");
        assert_eq!(poly(&[1, -3, -1]).to_string(), "-x^2 - 3x + 1");
        assert_eq!(poly(&[-5, 0, 0, 2]).to_string(), "2x^3 - 5");
    }

    #[test]
    fn debug_wraps_display() {
        assert_eq!(format!("{:?}", poly(&[1, 0, 1])), "Polynomial(x^2 + 1)");
    }
}
