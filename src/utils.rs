//! Integer helpers used by the polynomial arithmetic.

/// Greatest common divisor of two integers (always non-negative).
///
/// `gcd(a, 0) == |a|` and `gcd(0, 0) == 0`.
pub const fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a.abs()
}

/// Extended Euclidean algorithm over the integers.
///
/// Returns `(g, x, y)` with `g = gcd(a, b) >= 0` and `g = x*a + y*b`.
/// If `g == 1`, `y` is the inverse of `b` modulo `a`.
///
/// # Example
///
/// ```
/// use gfpn::extended_gcd;
///
/// assert_eq!(extended_gcd(15, 26), (1, 7, -4));
/// ```
pub const fn extended_gcd(a: i64, b: i64) -> (i64, i64, i64) {
    let (mut a, mut b) = (a, b);
    let (mut x0, mut x1) = (1i64, 0i64);
    let (mut y0, mut y1) = (0i64, 1i64);

    while b != 0 {
        let q = a / b;
        let r = a - q * b;
        a = b;
        b = r;

        let x = x0 - q * x1;
        x0 = x1;
        x1 = x;

        let y = y0 - q * y1;
        y0 = y1;
        y1 = y;
    }

    if a < 0 {
        (-a, -x0, -y0)
    } else {
        (a, x0, y0)
    }
}

/// Multiplicative inverse of `a` modulo `m`, as a representative in `[0, m)`.
///
/// Returns `None` when `m < 2` or `gcd(a, m) != 1`.
pub const fn mod_inverse(a: i64, m: i64) -> Option<i64> {
    if m < 2 {
        return None;
    }
    let (g, _, y) = extended_gcd(m, a.rem_euclid(m));
    if g != 1 {
        return None;
    }
    Some(y.rem_euclid(m))
}

/// Check if `n` is a prime number.
///
/// Trial division up to sqrt(n). Only used to flag suspicious field
/// characteristics at construction time.
pub const fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }

    let mut i = 3;
    while i * i <= n {
        if n % i == 0 {
            return false;
        }
        i += 2;
    }
    true
}
