/*
    Elements of the secp256k1 base field.
*/

use crate::{
    curve::field_prime,
    error::{Error, Result},
};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use std::ops::{Add, Mul, Neg, Sub};

/// An integer in [0, p)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldElement(BigUint);

impl FieldElement {
    /// Checked constructor, fails if value >= p
    pub fn new(value: BigUint) -> Result<Self> {
        if &value >= field_prime() {
            return Err(Error::InvalidFieldElement);
        }
        Ok(Self(value))
    }

    /// Reduces any integer into the field
    pub fn from_reduced(value: BigUint) -> Self {
        Self(value % field_prime())
    }

    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self> {
        Self::new(BigUint::from_bytes_be(bytes))
    }

    pub fn from_u64(value: u64) -> Self {
        Self::from_reduced(BigUint::from(value))
    }

    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    pub fn one() -> Self {
        Self(BigUint::one())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_even(&self) -> bool {
        !self.0.bit(0)
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// 32 byte big endian encoding
    pub fn to_bytes(&self) -> [u8; 32] {
        to_32_bytes(&self.0)
    }

    pub fn square(&self) -> Self {
        self * self
    }

    pub fn pow(&self, exponent: &BigUint) -> Self {
        Self(self.0.modpow(exponent, field_prime()))
    }

    /// Multiplicative inverse by Fermat's little theorem, x^(p-2)
    pub fn inverse(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(Error::InvalidFieldElement);
        }
        let exponent = field_prime() - 2u8;
        Ok(self.pow(&exponent))
    }

    /**
        Square root of self, x^((p+1)/4).
        p = 3 mod 4 so a root exists only if the result squares back to self.
    */
    pub fn sqrt(&self) -> Option<Self> {
        let exponent = (field_prime() + 1u8) >> 2u32;
        let candidate = self.pow(&exponent);
        if candidate.square() == *self {
            Some(candidate)
        } else {
            None
        }
    }
}

/// Left pads a big endian integer into 32 bytes
pub(crate) fn to_32_bytes(value: &BigUint) -> [u8; 32] {
    let bytes = value.to_bytes_be();
    let mut out = [0u8; 32];
    let start = 32usize.saturating_sub(bytes.len());
    let skip = bytes.len().saturating_sub(32);
    out[start..].copy_from_slice(&bytes[skip..]);
    out
}

impl<'a> Add<&'a FieldElement> for &'a FieldElement {
    type Output = FieldElement;

    fn add(self, rhs: &'a FieldElement) -> FieldElement {
        let sum = &self.0 + &rhs.0;
        if &sum >= field_prime() {
            FieldElement(sum - field_prime())
        } else {
            FieldElement(sum)
        }
    }
}

impl<'a> Sub<&'a FieldElement> for &'a FieldElement {
    type Output = FieldElement;

    fn sub(self, rhs: &'a FieldElement) -> FieldElement {
        if self.0 >= rhs.0 {
            FieldElement(&self.0 - &rhs.0)
        } else {
            FieldElement(field_prime() - &rhs.0 + &self.0)
        }
    }
}

impl<'a> Mul<&'a FieldElement> for &'a FieldElement {
    type Output = FieldElement;

    fn mul(self, rhs: &'a FieldElement) -> FieldElement {
        FieldElement((&self.0 * &rhs.0) % field_prime())
    }
}

impl Neg for &FieldElement {
    type Output = FieldElement;

    fn neg(self) -> FieldElement {
        if self.is_zero() {
            FieldElement::zero()
        } else {
            FieldElement(field_prime() - &self.0)
        }
    }
}
