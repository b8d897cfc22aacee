//! Arithmetic in Galois fields GF(p^n).
//!
//! Fields are quotient rings ℤ_p[x]/(m) for a degree-`n` modulus `m`,
//! built from a textual description of the modulus:
//!
//! ```
//! use gfpn::Field;
//!
//! let f = Field::new(5, 2, "x^2 + 2").unwrap();
//! let a = f.parse_element("2x + 3").unwrap();
//!
//! assert_eq!(a.pow(24), f.one());
//! assert_eq!(&a * &a.inverse().unwrap(), f.one());
//! ```

pub mod error;
pub mod parse;
pub mod structures;
pub mod utils;

pub use error::{FieldError, ParseError};
pub use parse::{
    must_parse_polynomial, must_parse_polynomial_hex, parse_monomial, parse_polynomial,
    parse_polynomial_hex, Monomial,
};
pub use structures::element::Element;
#[cfg(feature = "serde")]
pub use structures::element::ElementWithField;
pub use structures::field::{aes_field, Field, FieldId, FieldSpec, AES_MODULUS};
pub use structures::poly::Polynomial;
pub use utils::{extended_gcd, gcd, is_prime, mod_inverse};
