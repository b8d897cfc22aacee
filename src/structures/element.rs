use core::fmt;
use core::ops::{Add, Div, Mul, Neg, Sub};

use tracing::{debug, trace};

use crate::error::FieldError;
use crate::structures::field::Field;
use crate::structures::poly::Polynomial;
use crate::utils::mod_inverse;

/// An element of a [`Field`].
///
/// The polynomial is always canonical: coefficients in `[0, p)` and degree
/// below `n`. Every operation returns a new element.
///
/// Two APIs are offered:
/// - checked methods (`try_add`, `divide`, `inverse`, ...) report
///   `FieldMismatch`, `DivisionByZero` and `NotInvertible` as errors;
/// - the operators `+ - * /` assume both operands come from the same field
///   (and a non-zero divisor) and panic otherwise.
///
/// # Example
///
/// ```
/// use gfpn::aes_field;
///
/// let f = aes_field();
/// let a = f.parse_element_hex("53").unwrap();
/// let b = a.inverse().unwrap();
///
/// assert_eq!(b.hex_string().unwrap(), "0xca");
/// assert_eq!(&a * &b, f.one());
/// ```
#[derive(Clone)]
pub struct Element {
    poly: Polynomial,
    field: Field,
}

impl Element {
    /// `poly` must already be reduced mod `p` and mod the field modulus.
    pub(crate) fn from_canonical(poly: Polynomial, field: Field) -> Self {
        Self { poly, field }
    }

    fn with_poly(&self, poly: Polynomial) -> Self {
        Self {
            poly,
            field: self.field.clone(),
        }
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn polynomial(&self) -> &Polynomial {
        &self.poly
    }

    /// Coefficient of `x^i`.
    pub fn coeff(&self, i: usize) -> i64 {
        self.poly.coeff(i)
    }

    pub fn is_zero(&self) -> bool {
        self.poly.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.poly.is_one()
    }

    fn ensure_same_field(&self, other: &Self) -> Result<(), FieldError> {
        if self.field == other.field {
            Ok(())
        } else {
            Err(FieldError::FieldMismatch)
        }
    }

    /// Panics if the operands belong to different fields.
    ///
    /// Runs in both debug and release builds to prevent silent cross-field
    /// mixing.
    fn assert_same_field(&self, other: &Self) {
        assert!(
            self.field == other.field,
            "elements must belong to the same field"
        );
    }

    fn add_unchecked(&self, rhs: &Self) -> Self {
        self.with_poly((&self.poly + &rhs.poly).reduce_coefficients(self.field.p()))
    }

    fn sub_unchecked(&self, rhs: &Self) -> Self {
        self.with_poly((&self.poly - &rhs.poly).reduce_coefficients(self.field.p()))
    }

    fn mul_unchecked(&self, rhs: &Self) -> Self {
        let product = self.poly.mul_mod(&rhs.poly, self.field.p());
        self.with_poly(self.field.reduce(&product))
    }

    /// Sum, or `FieldMismatch`.
    pub fn try_add(&self, rhs: &Self) -> Result<Self, FieldError> {
        self.ensure_same_field(rhs)?;
        Ok(self.add_unchecked(rhs))
    }

    /// Difference, or `FieldMismatch`.
    pub fn try_sub(&self, rhs: &Self) -> Result<Self, FieldError> {
        self.ensure_same_field(rhs)?;
        Ok(self.sub_unchecked(rhs))
    }

    /// Product reduced mod the field modulus, or `FieldMismatch`.
    pub fn try_mul(&self, rhs: &Self) -> Result<Self, FieldError> {
        self.ensure_same_field(rhs)?;
        Ok(self.mul_unchecked(rhs))
    }

    /// Field division `self * rhs^-1`.
    pub fn try_div(&self, rhs: &Self) -> Result<Self, FieldError> {
        self.ensure_same_field(rhs)?;
        Ok(self.mul_unchecked(&rhs.inverse()?))
    }

    /// Polynomial long division of the representatives.
    ///
    /// Returns `(q, r)` with `self = q * rhs + r` over ℤ_p and
    /// `deg(r) < deg(rhs)`. This is division in ℤ_p[x], not field division;
    /// see [`Element::try_div`] for the latter.
    ///
    /// # Errors
    ///
    /// `FieldMismatch`, or `DivisionByZero` if `rhs` is zero.
    pub fn divide(&self, rhs: &Self) -> Result<(Self, Self), FieldError> {
        self.ensure_same_field(rhs)?;
        let (q, r) = self.poly.div_rem_mod(&rhs.poly, self.field.p())?;
        Ok((self.with_poly(q), self.with_poly(r)))
    }

    /// Remainder of [`Element::divide`].
    pub fn modulo(&self, rhs: &Self) -> Result<Self, FieldError> {
        self.divide(rhs).map(|(_, r)| r)
    }

    /// Raise to an integer power.
    ///
    /// The exponent is first reduced modulo the multiplicative group order
    /// `p^n - 1`, so negative exponents are powers of the inverse. Zero raised
    /// to any non-zero exponent is zero.
    pub fn pow(&self, exp: i64) -> Self {
        if self.is_zero() {
            return if exp == 0 {
                self.field.one()
            } else {
                self.clone()
            };
        }

        let order = i128::from(self.field.order());
        let mut e = i128::from(exp).rem_euclid(order) as u64;

        let mut base = self.clone();
        let mut result = self.field.one();
        while e > 0 {
            if e & 1 == 1 {
                result = result.mul_unchecked(&base);
            }
            base = base.mul_unchecked(&base);
            e >>= 1;
        }
        result
    }

    /// Multiplicative order: the smallest `k > 0` with `self^k == 1`.
    ///
    /// Returns `None` for zero, and for zero divisors when the modulus is
    /// reducible. Runs in up to `p^n - 1` multiplications.
    pub fn order(&self) -> Option<u64> {
        if self.is_zero() {
            return None;
        }

        let mut acc = self.clone();
        for k in 1..=self.field.order() {
            if acc.is_one() {
                return Some(k);
            }
            acc = acc.mul_unchecked(self);
        }
        None
    }

    /// Multiplicative inverse via the extended Euclidean algorithm between
    /// the field modulus and `self`.
    ///
    /// # Errors
    ///
    /// `DivisionByZero` for zero; `NotInvertible` if the gcd with the modulus
    /// is not a constant (only possible with a reducible modulus).
    pub fn inverse(&self) -> Result<Self, FieldError> {
        if self.is_zero() {
            return Err(FieldError::DivisionByZero);
        }

        let p = self.field.p();
        let (gcd, _, y) = self.field.extended_gcd(self.field.modulus(), &self.poly)?;
        if gcd.degree() != Some(0) {
            debug!(element = %self, gcd = %gcd, field = %self.field, "element is not invertible");
            return Err(FieldError::NotInvertible);
        }

        // gcd is a non-zero constant c, so c^-1 * y is the inverse
        let scale = mod_inverse(gcd.lead(), p).ok_or(FieldError::NotInvertible)?;
        let inv = self.with_poly(self.field.reduce(&y.mul_mod(&Polynomial::constant(scale), p)));
        trace!(element = %self, inverse = %inv, "inverted element");
        Ok(inv)
    }

    /// Hex encoding of an element of a characteristic-2 field.
    ///
    /// Bit `j` of byte `i` holds the coefficient of `x^(8i + j)`; GF(2^8)
    /// elements print as a single byte such as `0xe7`.
    ///
    /// # Errors
    ///
    /// `HexUnsupported` unless `p == 2`.
    pub fn hex_string(&self) -> Result<String, FieldError> {
        if self.field.p() != 2 {
            return Err(FieldError::HexUnsupported { p: self.field.p() });
        }

        let mut bytes = vec![0u8; (self.field.n() + 7) / 8];
        for (i, &c) in self.poly.coefficients().iter().enumerate() {
            if c == 1 {
                bytes[i / 8] |= 1 << (i % 8);
            }
        }
        Ok(format!("0x{}", hex::encode(bytes)))
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field && self.poly == other.poly
    }
}

impl Eq for Element {}

impl Add for &Element {
    type Output = Element;

    fn add(self, rhs: &Element) -> Element {
        self.assert_same_field(rhs);
        self.add_unchecked(rhs)
    }
}

impl Add for Element {
    type Output = Element;

    fn add(self, rhs: Element) -> Element {
        &self + &rhs
    }
}

impl Sub for &Element {
    type Output = Element;

    fn sub(self, rhs: &Element) -> Element {
        self.assert_same_field(rhs);
        self.sub_unchecked(rhs)
    }
}

impl Sub for Element {
    type Output = Element;

    fn sub(self, rhs: Element) -> Element {
        &self - &rhs
    }
}

impl Neg for &Element {
    type Output = Element;

    fn neg(self) -> Element {
        self.with_poly((-self.poly.clone()).reduce_coefficients(self.field.p()))
    }
}

impl Neg for Element {
    type Output = Element;

    fn neg(self) -> Element {
        -&self
    }
}

impl Mul for &Element {
    type Output = Element;

    fn mul(self, rhs: &Element) -> Element {
        self.assert_same_field(rhs);
        self.mul_unchecked(rhs)
    }
}

impl Mul for Element {
    type Output = Element;

    fn mul(self, rhs: Element) -> Element {
        &self * &rhs
    }
}

impl Div for &Element {
    type Output = Element;

    /// Field division. Panics on mismatched fields or a non-invertible
    /// divisor.
    fn div(self, rhs: &Element) -> Element {
        self.assert_same_field(rhs);
        match rhs.inverse() {
            Ok(inv) => self.mul_unchecked(&inv),
            Err(e) => panic!("cannot divide by {rhs}: {e}"),
        }
    }
}

impl Div for Element {
    type Output = Element;

    fn div(self, rhs: Element) -> Element {
        &self / &rhs
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.poly, f)
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Element({} in {})", self.poly, self.field)
    }
}

// ============================================================================
// Serde implementations
// ============================================================================

/// A self-contained serializable representation of an element and its field.
///
/// Deserializing builds a fresh [`Field`], so elements restored from
/// separate records do not share a field.
#[cfg(feature = "serde")]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ElementWithField {
    pub field: crate::structures::field::FieldSpec,
    pub coeffs: Vec<i64>,
}

#[cfg(feature = "serde")]
impl ElementWithField {
    pub fn from_element(e: &Element) -> Self {
        Self {
            field: e.field().spec(),
            coeffs: e.polynomial().coefficients().to_vec(),
        }
    }

    /// Rebuild the field and bind the coefficients to it.
    pub fn to_element(&self) -> Result<Element, FieldError> {
        let field = Field::from_spec(&self.field)?;
        field.new_element(Polynomial::new(self.coeffs.clone()))
    }
}

/// Serialize an element as its coefficient vector only.
///
/// `Element` implements `Serialize` but not `Deserialize`: the field cannot
/// be recovered from the coefficients. Use [`ElementWithField`] for a full
/// round trip.
#[cfg(feature = "serde")]
impl serde::Serialize for Element {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.poly.serialize(serializer)
    }
}
