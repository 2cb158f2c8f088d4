//! Ratio of two polynomials with lightweight cancellation.
//!
//! Construction normalizes: a zero denominator is an error, numeric
//! content of the denominator moves into the numerator, and any
//! monomial dividing every term of both sides is cancelled. That covers
//! the cancellations substitution actually produces (`x*t / t` and the
//! like) without a full multivariate gcd.

use crate::error::EngineError;
use crate::poly::Poly;
use num_rational::BigRational;
use num_traits::One;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatFunc {
    pub num: Poly,
    pub den: Poly,
}

impl RatFunc {
    pub fn new(num: Poly, den: Poly) -> Result<Self, EngineError> {
        if den.is_zero() {
            return Err(EngineError::ZeroDenominator);
        }
        if num.is_zero() {
            return Ok(Self {
                num,
                den: Poly::one(),
            });
        }
        // Pull the denominator's rational content into the numerator so
        // equal fractions share one representation.
        let content = den.content();
        let inv = BigRational::one() / &content;
        let mut num = num.scale(&inv);
        let mut den = den.scale(&inv);
        let g = num.mono_gcd().gcd(&den.mono_gcd());
        if !g.is_unit() {
            num = num.div_mono(&g);
            den = den.div_mono(&g);
        }
        Ok(Self { num, den })
    }

    pub fn from_poly(p: Poly) -> Self {
        Self {
            num: p,
            den: Poly::one(),
        }
    }

    pub fn constant(c: BigRational) -> Self {
        Self::from_poly(Poly::constant(c))
    }

    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    /// The value when numerator and denominator are both constants.
    pub fn as_constant(&self) -> Option<BigRational> {
        let n = self.num.as_constant()?;
        let d = self.den.as_constant()?;
        Some(n / d)
    }

    /// Whether the denominator is the constant 1.
    pub fn is_polynomial(&self) -> bool {
        self.den.as_constant().map_or(false, |c| c.is_one())
    }

    pub fn add(&self, other: &RatFunc) -> Result<RatFunc, EngineError> {
        let num = self
            .num
            .mul(&other.den)
            .add(&other.num.mul(&self.den));
        RatFunc::new(num, self.den.mul(&other.den))
    }

    pub fn sub(&self, other: &RatFunc) -> Result<RatFunc, EngineError> {
        let num = self
            .num
            .mul(&other.den)
            .sub(&other.num.mul(&self.den));
        RatFunc::new(num, self.den.mul(&other.den))
    }

    pub fn neg(&self) -> RatFunc {
        Self {
            num: self.num.neg(),
            den: self.den.clone(),
        }
    }

    pub fn mul(&self, other: &RatFunc) -> Result<RatFunc, EngineError> {
        RatFunc::new(self.num.mul(&other.num), self.den.mul(&other.den))
    }

    pub fn div(&self, other: &RatFunc) -> Result<RatFunc, EngineError> {
        RatFunc::new(self.num.mul(&other.den), self.den.mul(&other.num))
    }

    /// Integer power, negative exponents invert first.
    pub fn pow_i(&self, exp: i64) -> Result<RatFunc, EngineError> {
        let mag = exp.unsigned_abs() as u32;
        if exp >= 0 {
            RatFunc::new(self.num.pow(mag), self.den.pow(mag))
        } else {
            RatFunc::new(self.den.pow(mag), self.num.pow(mag))
        }
    }
}
