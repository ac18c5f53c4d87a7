//! Scalar abstractions shared by the real and complex decompositions
//!
//! Every kernel in this crate is written once against [`Scalar`]. Complex
//! arithmetic follows the conjugate-linear convention `x^H y`, and every
//! Householder gain stays in [`Scalar::Real`].

use num_complex::Complex;
use num_traits::{Float, One, Zero};
use std::fmt::Debug;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// Single precision complex number
#[allow(non_camel_case_types)]
pub type c32 = Complex<f32>;

/// Double precision complex number
#[allow(non_camel_case_types)]
pub type c64 = Complex<f64>;

/// Element type of a dense matrix handled by the decompositions
pub trait Scalar:
    Copy
    + Clone
    + Debug
    + Send
    + Sync
    + 'static
    + PartialEq
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + Zero
    + One
{
    /// Underlying real type (`Self` for real scalars)
    type Real: RealScalar;

    /// True for `f32`/`f64`
    const IS_REAL: bool;

    /// Embed a real number
    fn from_real(re: Self::Real) -> Self;

    /// Real part
    fn real_part(self) -> Self::Real;

    /// Complex conjugate (identity for real scalars)
    fn conjugate(self) -> Self;

    /// Absolute value or complex modulus
    fn magnitude(self) -> Self::Real;

    /// Squared absolute value, `|x|^2`
    fn magnitude2(self) -> Self::Real;

    /// Multiply by a real factor
    #[inline]
    fn scale(self, factor: Self::Real) -> Self {
        self * Self::from_real(factor)
    }

    /// Divide by a real divisor
    #[inline]
    fn unscale(self, divisor: Self::Real) -> Self {
        self / Self::from_real(divisor)
    }
}

/// Real floating point scalar
pub trait RealScalar: Scalar<Real = Self> + Float {
    /// Convert from an `f64` constant
    fn from_f64(value: f64) -> Self;

    /// Convert a dimension into a real value
    #[inline]
    fn from_usize(value: usize) -> Self {
        Self::from_f64(value as f64)
    }
}

macro_rules! impl_real_scalar {
    ($t:ty) => {
        impl Scalar for $t {
            type Real = $t;
            const IS_REAL: bool = true;

            #[inline]
            fn from_real(re: $t) -> Self {
                re
            }

            #[inline]
            fn real_part(self) -> $t {
                self
            }

            #[inline]
            fn conjugate(self) -> Self {
                self
            }

            #[inline]
            fn magnitude(self) -> $t {
                <$t>::abs(self)
            }

            #[inline]
            fn magnitude2(self) -> $t {
                self * self
            }

            #[inline]
            fn scale(self, factor: $t) -> Self {
                self * factor
            }

            #[inline]
            fn unscale(self, divisor: $t) -> Self {
                self / divisor
            }
        }

        impl RealScalar for $t {
            #[inline]
            fn from_f64(value: f64) -> Self {
                value as $t
            }
        }
    };
}

impl_real_scalar!(f32);
impl_real_scalar!(f64);

macro_rules! impl_complex_scalar {
    ($t:ty) => {
        impl Scalar for Complex<$t> {
            type Real = $t;
            const IS_REAL: bool = false;

            #[inline]
            fn from_real(re: $t) -> Self {
                Complex::new(re, <$t as Zero>::zero())
            }

            #[inline]
            fn real_part(self) -> $t {
                self.re
            }

            #[inline]
            fn conjugate(self) -> Self {
                self.conj()
            }

            #[inline]
            fn magnitude(self) -> $t {
                self.norm()
            }

            #[inline]
            fn magnitude2(self) -> $t {
                self.norm_sqr()
            }

            #[inline]
            fn scale(self, factor: $t) -> Self {
                Complex::new(self.re * factor, self.im * factor)
            }

            #[inline]
            fn unscale(self, divisor: $t) -> Self {
                Complex::new(self.re / divisor, self.im / divisor)
            }
        }
    };
}

impl_complex_scalar!(f32);
impl_complex_scalar!(f64);
