//! Galois field descriptors GF(p^n).
//!
//! This module provides:
//! - The `Field` handle: characteristic `p`, extension degree `n` and the
//!   modulus polynomial defining ℤ_p[x]/(modulus)
//! - The `FieldSpec` configuration record a field can be built from
//! - The process-wide AES field GF(2^8)

use core::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::{debug, warn};

use crate::error::FieldError;
use crate::parse::{from_terms, parse_polynomial_hex, parse_terms};
use crate::structures::element::Element;
use crate::structures::poly::Polynomial;
use crate::utils::{is_prime, mod_inverse};

/// Modulus of the AES field: x^8 + x^4 + x^3 + x + 1.
pub const AES_MODULUS: &str = "x^8 + x^4 + x^3 + x + 1";

static AES_FIELD: Lazy<Field> = Lazy::new(|| {
    // 0x11b, lowest power first
    let modulus = Polynomial::new(vec![1, 1, 0, 1, 1, 0, 0, 0, 1]);
    Field::assemble(2, 8, 255, modulus, 1)
});

static NEXT_FIELD_ID: AtomicU64 = AtomicU64::new(0);

/// The AES field GF(2^8), built on first use and shared by the whole process.
///
/// ```
/// let f = gfpn::aes_field();
/// let a = f.parse_element_hex("a3").unwrap();
/// let b = f.parse_element_hex("44").unwrap();
/// assert_eq!((&a + &b).hex_string().unwrap(), "0xe7");
/// ```
pub fn aes_field() -> &'static Field {
    &AES_FIELD
}

/// Identity of a constructed field. Two separately constructed fields never
/// share an id, even with identical parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldId(u64);

/// Plain description of a field, e.g. loaded from a configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldSpec {
    /// Characteristic.
    pub p: i64,
    /// Extension degree.
    pub n: usize,
    /// Modulus polynomial in the textual grammar.
    pub modulus: String,
}

struct FieldInner {
    id: FieldId,
    p: i64,
    n: usize,
    order: u64,
    modulus: Polynomial,
    lead_inv: i64,
}

/// A finite field GF(p^n) represented as ℤ_p[x]/(modulus).
///
/// `Field` is an immutable, cheaply clonable handle. Elements keep a handle
/// to the field they were created in and arithmetic between elements of
/// different fields is rejected.
///
/// Neither the primality of `p` nor the irreducibility of the modulus is
/// enforced: a composite `p` or a reducible modulus yields a ring in which
/// some elements have no inverse.
///
/// # Example
///
/// ```
/// use gfpn::Field;
///
/// let f = Field::new(5, 2, "x^2 + 2").unwrap();
/// let a = f.parse_element("2x + 1").unwrap();
/// let b = f.parse_element("3x + 1").unwrap();
///
/// // (2x + 1)(3x + 1) = x^2 + 1 = 4, since x^2 = -2
/// assert_eq!((&a * &b).to_string(), "4");
/// assert_eq!(&a * &a.inverse().unwrap(), f.one());
/// ```
#[derive(Clone)]
pub struct Field {
    inner: Arc<FieldInner>,
}

impl Field {
    /// Build GF(p^n) from a textual modulus.
    ///
    /// # Errors
    ///
    /// `InvalidPolynomial` if `modulus` does not parse, `InvalidModulus` if
    /// its degree (after reduction mod `p`) is not `n`, plus the parameter
    /// errors of [`Field::with_modulus`].
    pub fn new(p: i64, n: usize, modulus: &str) -> Result<Self, FieldError> {
        let terms = parse_terms(modulus)?;
        check_parameters(p, n)?;

        let terms: Vec<(usize, i64)> = terms
            .into_iter()
            .map(|(power, c)| (power, c.rem_euclid(p)))
            .filter(|&(_, c)| c != 0)
            .collect();
        let degree = terms.last().map(|&(power, _)| power);
        if degree.map_or(false, |d| d > n) {
            return Err(FieldError::InvalidModulus {
                expected: n,
                got: degree,
            });
        }
        Self::with_modulus(p, n, from_terms(terms))
    }

    /// Build GF(p^n) from an already parsed modulus.
    ///
    /// # Errors
    ///
    /// - `InvalidCharacteristic` unless `2 <= p < 2^31`
    /// - `InvalidDegree` if `n == 0`
    /// - `OrderOverflow` if `p^n` does not fit in a `u64`
    /// - `InvalidModulus` if the modulus does not have degree `n` mod `p`
    /// - `ModulusLeadNotInvertible` if the leading coefficient is not a unit
    pub fn with_modulus(p: i64, n: usize, modulus: Polynomial) -> Result<Self, FieldError> {
        let order = check_parameters(p, n)?;

        let modulus = modulus.reduce_coefficients(p);
        if modulus.degree() != Some(n) {
            return Err(FieldError::InvalidModulus {
                expected: n,
                got: modulus.degree(),
            });
        }
        let lead_inv = mod_inverse(modulus.lead(), p)
            .ok_or(FieldError::ModulusLeadNotInvertible(modulus.lead()))?;

        if !is_prime(p as u64) {
            warn!(p, "field characteristic is not prime, arithmetic forms a ring");
        }

        let field = Self::assemble(p, n, order, modulus, lead_inv);
        debug!(p, n, modulus = %field.modulus(), id = field.id().0, "constructed field");
        Ok(field)
    }

    /// Like [`Field::new`], panicking on invalid parameters.
    pub fn must_new(p: i64, n: usize, modulus: &str) -> Self {
        Self::new(p, n, modulus).unwrap_or_else(|e| panic!("not a valid field: {e}"))
    }

    /// Build the field described by `spec`.
    pub fn from_spec(spec: &FieldSpec) -> Result<Self, FieldError> {
        Self::new(spec.p, spec.n, &spec.modulus)
    }

    /// Describe this field; building from the result yields an equivalent
    /// (but distinct) field.
    pub fn spec(&self) -> FieldSpec {
        FieldSpec {
            p: self.p(),
            n: self.n(),
            modulus: self.modulus().to_string(),
        }
    }

    fn assemble(p: i64, n: usize, order: u64, modulus: Polynomial, lead_inv: i64) -> Self {
        let id = FieldId(NEXT_FIELD_ID.fetch_add(1, Ordering::Relaxed));
        Self {
            inner: Arc::new(FieldInner {
                id,
                p,
                n,
                order,
                modulus,
                lead_inv,
            }),
        }
    }

    pub fn id(&self) -> FieldId {
        self.inner.id
    }

    /// Characteristic `p`.
    pub fn p(&self) -> i64 {
        self.inner.p
    }

    /// Extension degree `n`.
    pub fn n(&self) -> usize {
        self.inner.n
    }

    /// The modulus polynomial, coefficients in `[0, p)`.
    pub fn modulus(&self) -> &Polynomial {
        &self.inner.modulus
    }

    /// Order of the multiplicative group, `p^n - 1`.
    pub fn order(&self) -> u64 {
        self.inner.order
    }

    /// The additive identity.
    pub fn zero(&self) -> Element {
        Element::from_canonical(Polynomial::zero(), self.clone())
    }

    /// The multiplicative identity.
    pub fn one(&self) -> Element {
        Element::from_canonical(Polynomial::one(), self.clone())
    }

    /// Bind a polynomial to this field, reducing it mod `p` and mod the
    /// modulus.
    ///
    /// # Errors
    ///
    /// `DegreeTooLarge` if `poly` has degree greater than `n` once its
    /// coefficients are reduced mod `p`.
    pub fn new_element(&self, poly: Polynomial) -> Result<Element, FieldError> {
        let poly = poly.reduce_coefficients(self.p());
        self.check_degree(poly.degree())?;
        Ok(Element::from_canonical(self.reduce(&poly), self.clone()))
    }

    fn check_degree(&self, degree: Option<usize>) -> Result<(), FieldError> {
        match degree {
            Some(got) if got > self.n() => Err(FieldError::DegreeTooLarge {
                max: self.n(),
                got,
            }),
            _ => Ok(()),
        }
    }

    /// Like [`Field::new_element`], panicking on invalid input.
    pub fn must_new_element(&self, poly: Polynomial) -> Element {
        self.new_element(poly)
            .unwrap_or_else(|e| panic!("not a valid element: {e}"))
    }

    /// Parse an element in the textual polynomial grammar.
    ///
    /// The degree is checked on the sparse terms, so a huge power is
    /// rejected without allocating a coefficient vector for it.
    pub fn parse_element(&self, s: &str) -> Result<Element, FieldError> {
        let p = self.p();
        let terms: Vec<(usize, i64)> = parse_terms(s)?
            .into_iter()
            .map(|(power, c)| (power, c.rem_euclid(p)))
            .filter(|&(_, c)| c != 0)
            .collect();
        self.check_degree(terms.last().map(|&(power, _)| power))?;
        self.new_element(from_terms(terms))
    }

    /// Parse an element from hex bytes (see [`parse_polynomial_hex`]).
    pub fn parse_element_hex(&self, s: &str) -> Result<Element, FieldError> {
        self.new_element(parse_polynomial_hex(s)?)
    }

    pub fn must_parse_element(&self, s: &str) -> Element {
        self.parse_element(s)
            .unwrap_or_else(|e| panic!("not a valid element: {e}"))
    }

    pub fn must_parse_element_hex(&self, s: &str) -> Element {
        self.parse_element_hex(s)
            .unwrap_or_else(|e| panic!("not a valid element: {e}"))
    }

    /// Iterate over all `p^n` elements, counting upwards in base `p` with the
    /// constant coefficient as the lowest digit.
    pub fn elements(&self) -> impl Iterator<Item = Element> + '_ {
        let p = self.p() as u64;
        (0..=self.order()).map(move |mut k| {
            let mut coeffs = Vec::with_capacity(self.n());
            for _ in 0..self.n() {
                coeffs.push((k % p) as i64);
                k /= p;
            }
            Element::from_canonical(Polynomial::new(coeffs), self.clone())
        })
    }

    /// Sample a uniformly random element.
    #[cfg(feature = "rand")]
    pub fn random_element<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> Element {
        let coeffs = (0..self.n()).map(|_| rng.gen_range(0..self.p())).collect();
        Element::from_canonical(Polynomial::new(coeffs), self.clone())
    }

    /// Extended Euclidean algorithm in ℤ_p[x].
    ///
    /// Returns `(g, x, y)` with `g ≡ x*a + y*b (mod p)`, where `g` is a gcd
    /// of `a` and `b` (not made monic). Inputs of any degree are accepted and
    /// reduced mod `p` first.
    ///
    /// # Errors
    ///
    /// `NotInvertible` if a remainder's leading coefficient is not a unit,
    /// which requires a composite `p`.
    pub fn extended_gcd(
        &self,
        a: &Polynomial,
        b: &Polynomial,
    ) -> Result<(Polynomial, Polynomial, Polynomial), FieldError> {
        let p = self.p();
        let mut a = a.reduce_coefficients(p);
        let mut b = b.reduce_coefficients(p);
        let (mut x0, mut x1) = (Polynomial::one(), Polynomial::zero());
        let (mut y0, mut y1) = (Polynomial::zero(), Polynomial::one());

        while !b.is_zero() {
            let (q, r) = a.div_rem_mod(&b, p)?;
            a = std::mem::replace(&mut b, r);

            let x2 = (&x0 - &q.mul_mod(&x1, p)).reduce_coefficients(p);
            x0 = std::mem::replace(&mut x1, x2);

            let y2 = (&y0 - &q.mul_mod(&y1, p)).reduce_coefficients(p);
            y0 = std::mem::replace(&mut y1, y2);
        }

        Ok((a, x0, y0))
    }

    /// Reduce `poly` mod `p` and mod the field modulus.
    pub(crate) fn reduce(&self, poly: &Polynomial) -> Polynomial {
        let (_, r) = poly.div_rem_with_inverse(self.modulus(), self.inner.lead_inv, self.p());
        r
    }
}

/// Validate `p` and `n`, returning the multiplicative group order `p^n - 1`.
fn check_parameters(p: i64, n: usize) -> Result<u64, FieldError> {
    if !(2..=i64::from(i32::MAX)).contains(&p) {
        return Err(FieldError::InvalidCharacteristic(p));
    }
    if n == 0 {
        return Err(FieldError::InvalidDegree);
    }
    u32::try_from(n)
        .ok()
        .and_then(|exp| (p as u64).checked_pow(exp))
        .map(|size| size - 1)
        .ok_or(FieldError::OrderOverflow { p, n })
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Field {}

impl TryFrom<FieldSpec> for Field {
    type Error = FieldError;

    fn try_from(spec: FieldSpec) -> Result<Self, Self::Error> {
        Self::from_spec(&spec)
    }
}

impl TryFrom<&FieldSpec> for Field {
    type Error = FieldError;

    fn try_from(spec: &FieldSpec) -> Result<Self, Self::Error> {
        Self::from_spec(spec)
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("id", &self.id().0)
            .field("p", &self.p())
            .field("n", &self.n())
            .field("modulus", &format_args!("{}", self.modulus()))
            .finish()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GF({}^{}) mod {}", self.p(), self.n(), self.modulus())
    }
}
