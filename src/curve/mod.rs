/*
    secp256k1 curve arithmetic implemented over big integers.

    y^2 = x^3 + 7 over the prime field p = 2^256 - 2^32 - 977,
    with a generator G of prime order n.

    The constants are built once, lazily, and shared by reference.
    The prime and the order live in their own statics so that field
    and scalar arithmetic never has to touch the full curve value
    while the generator point is being constructed.
*/

pub mod field;
pub mod point;
pub mod scalar;

pub use field::FieldElement;
pub use point::Point;
pub use scalar::Scalar;

use num_bigint::BigUint;
use std::sync::LazyLock;

const P_BYTES: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe, 0xff, 0xff, 0xfc, 0x2f,
];

const N_BYTES: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

const GX_BYTES: [u8; 32] = [
    0x79, 0xbe, 0x66, 0x7e, 0xf9, 0xdc, 0xbb, 0xac, 0x55, 0xa0, 0x62, 0x95, 0xce, 0x87, 0x0b, 0x07,
    0x02, 0x9b, 0xfc, 0xdb, 0x2d, 0xce, 0x28, 0xd9, 0x59, 0xf2, 0x81, 0x5b, 0x16, 0xf8, 0x17, 0x98,
];

const GY_BYTES: [u8; 32] = [
    0x48, 0x3a, 0xda, 0x77, 0x26, 0xa3, 0xc4, 0x65, 0x5d, 0xa4, 0xfb, 0xfc, 0x0e, 0x11, 0x08, 0xa8,
    0xfd, 0x17, 0xb4, 0x48, 0xa6, 0x85, 0x54, 0x19, 0x9c, 0x47, 0xd0, 0x8f, 0xfb, 0x10, 0xd4, 0xb8,
];

static FIELD_PRIME: LazyLock<BigUint> = LazyLock::new(|| BigUint::from_bytes_be(&P_BYTES));
static GROUP_ORDER: LazyLock<BigUint> = LazyLock::new(|| BigUint::from_bytes_be(&N_BYTES));
static CURVE: LazyLock<Secp256k1> = LazyLock::new(Secp256k1::new);

/// The field prime p
pub fn field_prime() -> &'static BigUint {
    &FIELD_PRIME
}

/// The group order n
pub fn group_order() -> &'static BigUint {
    &GROUP_ORDER
}

/// Shared curve parameters
pub fn secp256k1() -> &'static Secp256k1 {
    &CURVE
}

#[derive(Debug, Clone)]
pub struct Secp256k1 {
    pub p: BigUint,
    pub n: BigUint,
    /// floor(n / 2), the upper bound for low-S signatures
    pub half_n: BigUint,
    pub g: Point,
}

impl Secp256k1 {
    fn new() -> Self {
        let n = group_order().clone();
        let half_n = &n >> 1u32;

        //G is a known curve point so it is built without the curve check
        let g = Point::from_affine_unchecked(
            FieldElement::from_reduced(BigUint::from_bytes_be(&GX_BYTES)),
            FieldElement::from_reduced(BigUint::from_bytes_be(&GY_BYTES)),
        );

        Self {
            p: field_prime().clone(),
            n,
            half_n,
            g,
        }
    }

    /// k·G
    pub fn mul_g(&self, k: &Scalar) -> Point {
        self.g.mul(k.as_biguint())
    }
}
