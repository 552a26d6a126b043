//! Scalar-vector helpers shared by the range proof and inner-product
//! argument: polynomial evaluation for `t(X) = <l(X), r(X)>`, inner products,
//! and the geometric-sequence iterator used for `y^0, y^1, ..., y^{n-1}` and
//! `2^0, 2^1, ..., 2^{n-1}`.

use alloc::vec;
use alloc::vec::Vec;
use curve25519_dalek::scalar::Scalar;

/// Represents a degree-1 vector polynomial `\vec{a} + \vec{b}\cdot x`.
pub struct VecPoly1(pub Vec<Scalar>, pub Vec<Scalar>);

/// Represents a degree-2 scalar polynomial `a + b\cdot x + c \cdot x^2`.
pub struct Poly2(pub Scalar, pub Scalar, pub Scalar);

/// Provides an iterator over the powers of a `Scalar`.
///
/// This struct is created by the `exp_iter` function.
pub struct ScalarExp {
    x: Scalar,
    next_exp_x: Scalar,
}

impl Iterator for ScalarExp {
    type Item = Scalar;

    fn next(&mut self) -> Option<Scalar> {
        let exp_x = self.next_exp_x;
        self.next_exp_x *= self.x;
        Some(exp_x)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

/// Return an iterator of the powers of `x`: `1, x, x^2, x^3, ...`.
pub fn exp_iter(x: Scalar) -> ScalarExp {
    let next_exp_x = Scalar::ONE;
    ScalarExp { x, next_exp_x }
}

/// Elementwise addition of two scalar vectors of equal length.
pub fn add_vec(a: &[Scalar], b: &[Scalar]) -> Vec<Scalar> {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(l, r)| l + r).collect()
}

impl VecPoly1 {
    pub fn zero(n: usize) -> Self {
        VecPoly1(vec![Scalar::ZERO; n], vec![Scalar::ZERO; n])
    }

    /// Computes the inner product of two degree-1 vector polynomials as a
    /// degree-2 scalar polynomial, using Karatsuba's trick so that only
    /// three inner products (not four) are needed.
    pub fn inner_product(&self, rhs: &VecPoly1) -> Poly2 {
        let l = self;
        let r = rhs;

        let t0 = inner_product(&l.0, &r.0);
        let t2 = inner_product(&l.1, &r.1);

        let l0_plus_l1 = add_vec(&l.0, &l.1);
        let r0_plus_r1 = add_vec(&r.0, &r.1);

        let t1 = inner_product(&l0_plus_l1, &r0_plus_r1) - t0 - t2;

        Poly2(t0, t1, t2)
    }

    /// Evaluate `self` at `x`, producing the explicit vector `l(x)` (or `r(x)`).
    pub fn eval(&self, x: Scalar) -> Vec<Scalar> {
        let n = self.0.len();
        let mut out = vec![Scalar::ZERO; n];
        #[allow(clippy::needless_range_loop)]
        for i in 0..n {
            out[i] = self.0[i] + self.1[i] * x;
        }
        out
    }
}

impl Poly2 {
    pub fn eval(&self, x: Scalar) -> Scalar {
        self.0 + x * (self.1 + x * self.2)
    }
}

/// Computes an inner product of two vectors.
///
/// \\[
///    {\langle {\mathbf{a}}, {\mathbf{b}} \rangle} = \sum\_{i=0}^{n-1} a\_i \cdot b\_i.
/// \\]
///
/// Panics if the lengths of \\(\mathbf{a}\\) and \\(\mathbf{b}\\) are not equal.
pub fn inner_product(a: &[Scalar], b: &[Scalar]) -> Scalar {
    let mut out = Scalar::ZERO;
    if a.len() != b.len() {
        panic!("inner_product(a,b): lengths of vectors do not match");
    }
    for i in 0..a.len() {
        out += a[i] * b[i];
    }
    out
}

/// `true` iff `n` is a power of two (and nonzero).
pub fn is_power_of_two(n: usize) -> bool {
    n != 0 && (n & (n - 1)) == 0
}
