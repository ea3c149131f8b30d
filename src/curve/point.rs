/*
    Points on secp256k1.

    Points are exposed in affine form. Scalar multiplication runs
    in Jacobian coordinates (X, Y, Z) <-> (X/Z^2, Y/Z^3) and only
    converts back to affine once, at the end.
*/

use crate::{
    curve::field::FieldElement,
    error::{Error, Result},
};
use num_bigint::BigUint;
use num_traits::Zero;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Point {
    Infinity,
    Affine { x: FieldElement, y: FieldElement },
}

impl Point {
    /**
        Creates a point from affine coordinates.
        Fails if the coordinates do not satisfy y^2 = x^3 + 7.
    */
    pub fn new(x: FieldElement, y: FieldElement) -> Result<Self> {
        let point = Self::from_affine_unchecked(x, y);
        if !point.is_on_curve() {
            return Err(Error::NotOnCurve);
        }
        Ok(point)
    }

    pub(crate) fn from_affine_unchecked(x: FieldElement, y: FieldElement) -> Self {
        Point::Affine { x, y }
    }

    /**
        Returns the point with the given x coordinate and an even y coordinate.
        Fails if x^3 + 7 has no square root.
    */
    pub fn lift_x(x: &FieldElement) -> Result<Self> {
        let rhs = curve_rhs(x);
        let y = rhs.sqrt().ok_or(Error::InvalidXCoordinate)?;
        let y = if y.is_even() { y } else { -&y };
        Ok(Point::Affine { x: x.clone(), y })
    }

    pub fn is_infinity(&self) -> bool {
        matches!(self, Point::Infinity)
    }

    pub fn is_on_curve(&self) -> bool {
        match self {
            Point::Infinity => true,
            Point::Affine { x, y } => y.square() == curve_rhs(x),
        }
    }

    pub fn x(&self) -> Option<&FieldElement> {
        match self {
            Point::Infinity => None,
            Point::Affine { x, .. } => Some(x),
        }
    }

    pub fn y(&self) -> Option<&FieldElement> {
        match self {
            Point::Infinity => None,
            Point::Affine { y, .. } => Some(y),
        }
    }

    /// Infinity is treated as having no even y
    pub fn has_even_y(&self) -> bool {
        self.y().map(FieldElement::is_even).unwrap_or(false)
    }

    pub fn negate(&self) -> Self {
        match self {
            Point::Infinity => Point::Infinity,
            Point::Affine { x, y } => Point::Affine { x: x.clone(), y: -y },
        }
    }

    pub fn add(&self, other: &Point) -> Self {
        Jacobian::from(self).add(&Jacobian::from(other)).to_affine()
    }

    pub fn double(&self) -> Self {
        Jacobian::from(self).double().to_affine()
    }

    /// Double and add, most significant bit first
    pub fn mul(&self, k: &BigUint) -> Self {
        if k.is_zero() || self.is_infinity() {
            return Point::Infinity;
        }

        let base = Jacobian::from(self);
        let mut acc = Jacobian::infinity();
        for i in (0..k.bits()).rev() {
            acc = acc.double();
            if k.bit(i) {
                acc = acc.add(&base);
            }
        }
        acc.to_affine()
    }

    /// SEC1 compressed encoding, 0x02 or 0x03 followed by x
    pub fn serialize_compressed(&self) -> Result<[u8; 33]> {
        match self {
            Point::Infinity => Err(Error::PointAtInfinity),
            Point::Affine { x, y } => {
                let mut out = [0u8; 33];
                out[0] = if y.is_even() { 0x02 } else { 0x03 };
                out[1..].copy_from_slice(&x.to_bytes());
                Ok(out)
            }
        }
    }

    /// SEC1 uncompressed encoding, 0x04 followed by x and y
    pub fn serialize_uncompressed(&self) -> Result<[u8; 65]> {
        match self {
            Point::Infinity => Err(Error::PointAtInfinity),
            Point::Affine { x, y } => {
                let mut out = [0u8; 65];
                out[0] = 0x04;
                out[1..33].copy_from_slice(&x.to_bytes());
                out[33..].copy_from_slice(&y.to_bytes());
                Ok(out)
            }
        }
    }

    /// Parses a compressed or uncompressed SEC1 encoded point
    pub fn from_sec(bytes: &[u8]) -> Result<Self> {
        match (bytes.len(), bytes.first()) {
            (33, Some(prefix @ (0x02 | 0x03))) => {
                let x = FieldElement::from_bytes(&read_32(&bytes[1..33]))?;
                let point = Point::lift_x(&x)?;
                if *prefix == 0x02 {
                    Ok(point)
                } else {
                    Ok(point.negate())
                }
            }
            (65, Some(0x04)) => {
                let x = FieldElement::from_bytes(&read_32(&bytes[1..33]))?;
                let y = FieldElement::from_bytes(&read_32(&bytes[33..65]))?;
                Point::new(x, y)
            }
            _ => Err(Error::InvalidPublicKey),
        }
    }
}

fn curve_rhs(x: &FieldElement) -> FieldElement {
    &(&x.square() * x) + &FieldElement::from_u64(7)
}

fn read_32(slice: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(slice);
    out
}

/// Jacobian projective coordinates, Z = 0 is the point at infinity
#[derive(Debug, Clone)]
struct Jacobian {
    x: FieldElement,
    y: FieldElement,
    z: FieldElement,
}

impl Jacobian {
    fn infinity() -> Self {
        Self {
            x: FieldElement::one(),
            y: FieldElement::one(),
            z: FieldElement::zero(),
        }
    }

    fn is_infinity(&self) -> bool {
        self.z.is_zero()
    }

    fn double(&self) -> Self {
        if self.is_infinity() || self.y.is_zero() {
            return Self::infinity();
        }

        let y2 = self.y.square();
        let s = &(&self.x * &y2) * &FieldElement::from_u64(4);
        let m = &self.x.square() * &FieldElement::from_u64(3);
        let x3 = &m.square() - &(&s + &s);
        let y4_8 = &y2.square() * &FieldElement::from_u64(8);
        let y3 = &(&m * &(&s - &x3)) - &y4_8;
        let z3 = &(&self.y * &self.z) * &FieldElement::from_u64(2);

        Self { x: x3, y: y3, z: z3 }
    }

    fn add(&self, other: &Jacobian) -> Self {
        if self.is_infinity() {
            return other.clone();
        }
        if other.is_infinity() {
            return self.clone();
        }

        let z1z1 = self.z.square();
        let z2z2 = other.z.square();
        let u1 = &self.x * &z2z2;
        let u2 = &other.x * &z1z1;
        let s1 = &(&self.y * &other.z) * &z2z2;
        let s2 = &(&other.y * &self.z) * &z1z1;

        let h = &u2 - &u1;
        let r = &s2 - &s1;

        if h.is_zero() {
            return if r.is_zero() {
                self.double()
            } else {
                Self::infinity()
            };
        }

        let h2 = h.square();
        let h3 = &h2 * &h;
        let u1h2 = &u1 * &h2;

        let x3 = &(&r.square() - &h3) - &(&u1h2 + &u1h2);
        let y3 = &(&r * &(&u1h2 - &x3)) - &(&s1 * &h3);
        let z3 = &(&h * &self.z) * &other.z;

        Self { x: x3, y: y3, z: z3 }
    }

    fn to_affine(&self) -> Point {
        //z is nonzero outside of infinity so the inverse always exists
        let z_inv = match self.z.inverse() {
            Ok(z_inv) => z_inv,
            Err(_) => return Point::Infinity,
        };
        let z_inv2 = z_inv.square();
        let z_inv3 = &z_inv2 * &z_inv;
        Point::Affine {
            x: &self.x * &z_inv2,
            y: &self.y * &z_inv3,
        }
    }
}

impl From<&Point> for Jacobian {
    fn from(point: &Point) -> Self {
        match point {
            Point::Infinity => Jacobian::infinity(),
            Point::Affine { x, y } => Jacobian {
                x: x.clone(),
                y: y.clone(),
                z: FieldElement::one(),
            },
        }
    }
}
