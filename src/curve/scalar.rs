/*
    Integers modulo the group order n.
*/

use crate::{
    curve::{field::to_32_bytes, group_order},
    error::{Error, Result},
};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use std::ops::{Add, Mul, Neg, Sub};

/// An integer in [0, n)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Scalar(BigUint);

impl Scalar {
    /// Checked constructor, fails if value >= n
    pub fn new(value: BigUint) -> Result<Self> {
        if &value >= group_order() {
            return Err(Error::InvalidPrivateKey);
        }
        Ok(Self(value))
    }

    pub fn from_reduced(value: BigUint) -> Self {
        Self(value % group_order())
    }

    /// Interprets 32 bytes as an integer mod n, as done for message digests and tagged hashes
    pub fn from_bytes_reduced(bytes: &[u8]) -> Self {
        Self::from_reduced(BigUint::from_bytes_be(bytes))
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

    /// True if self is in the upper half of the group, n/2 < self
    pub fn is_high(&self) -> bool {
        self.0 > (group_order() >> 1u32)
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        to_32_bytes(&self.0)
    }

    pub fn inverse(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(Error::InvalidPrivateKey);
        }
        let exponent = group_order() - 2u8;
        Ok(Self(self.0.modpow(&exponent, group_order())))
    }
}

impl<'a> Add<&'a Scalar> for &'a Scalar {
    type Output = Scalar;

    fn add(self, rhs: &'a Scalar) -> Scalar {
        Scalar((&self.0 + &rhs.0) % group_order())
    }
}

impl<'a> Sub<&'a Scalar> for &'a Scalar {
    type Output = Scalar;

    fn sub(self, rhs: &'a Scalar) -> Scalar {
        if self.0 >= rhs.0 {
            Scalar(&self.0 - &rhs.0)
        } else {
            Scalar(group_order() - &rhs.0 + &self.0)
        }
    }
}

impl<'a> Mul<&'a Scalar> for &'a Scalar {
    type Output = Scalar;

    fn mul(self, rhs: &'a Scalar) -> Scalar {
        Scalar((&self.0 * &rhs.0) % group_order())
    }
}

impl Neg for &Scalar {
    type Output = Scalar;

    fn neg(self) -> Scalar {
        if self.is_zero() {
            Scalar::zero()
        } else {
            Scalar(group_order() - &self.0)
        }
    }
}
