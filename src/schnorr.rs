/*
    BIP340 Schnorr signatures.

    Keys are x-only: signing negates the secret when its point has an
    odd y, so that the signature verifies against the even-y point
    with the same x coordinate.

    Reference:
        https://github.com/bitcoin/bips/blob/master/bip-0340.mediawiki
*/

use crate::{
    curve::{field_prime, secp256k1, FieldElement, Point, Scalar},
    error::{Error, Result},
    hash::tagged_hash,
    key::{PrivKey, SchnorrPublicKey}
};
use num_bigint::BigUint;
use rand::{rngs::OsRng, CryptoRng, RngCore};
use std::fmt;
use tracing::error;

const AUX_TAG: &str = "BIP0340/aux";
const NONCE_TAG: &str = "BIP0340/nonce";
const CHALLENGE_TAG: &str = "BIP0340/challenge";

/// 64 byte signature, R.x || s
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchnorrSignature([u8; 64]);

impl SchnorrSignature {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; 64] = bytes.try_into()
            .map_err(|_| Error::InvalidSignature(format!("expected 64 bytes, found {}", bytes.len())))?;
        Ok(Self(bytes))
    }

    pub fn to_bytes(&self) -> [u8; 64] {
        self.0
    }

    fn r_bytes(&self) -> [u8; 32] {
        let mut r = [0u8; 32];
        r.copy_from_slice(&self.0[..32]);
        r
    }

    fn s_bytes(&self) -> [u8; 32] {
        let mut s = [0u8; 32];
        s.copy_from_slice(&self.0[32..]);
        s
    }
}

impl fmt::Debug for SchnorrSignature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SchnorrSignature({})", hex::encode(self.0))
    }
}

fn challenge(r_x: &[u8; 32], p_x: &[u8; 32], message: &[u8; 32]) -> Scalar {
    let data = [&r_x[..], &p_x[..], &message[..]].concat();
    Scalar::from_bytes_reduced(&tagged_hash(CHALLENGE_TAG, &data))
}

/**
    Sign a 32 byte message with caller supplied auxiliary randomness.
    The result is verified before it is returned.
*/
pub fn sign(key: &PrivKey, message: &[u8; 32], aux_rand: &[u8; 32]) -> Result<SchnorrSignature> {
    let curve = secp256k1();
    let public = key.public_key();
    let p_x = public.schnorr().to_bytes();

    let d = if public.has_even_y() { key.secret().clone() } else { -key.secret() };

    //t = bytes(d) xor hash_aux(a)
    let mut t = d.to_bytes();
    t.iter_mut()
        .zip(tagged_hash(AUX_TAG, aux_rand))
        .for_each(|(byte, mask)| *byte ^= mask);

    let nonce_data = [&t[..], &p_x[..], &message[..]].concat();
    let k = Scalar::from_bytes_reduced(&tagged_hash(NONCE_TAG, &nonce_data));
    if k.is_zero() {
        return Err(Error::ZeroNonce)
    }

    let big_r = curve.mul_g(&k);
    let k = if big_r.has_even_y() { k } else { -&k };
    let r_x = match big_r.x() {
        Some(x) => x.to_bytes(),
        None => return Err(Error::ZeroNonce)
    };

    let e = challenge(&r_x, &p_x, message);
    let s = &k + &(&e * &d);

    let mut bytes = [0u8; 64];
    bytes[..32].copy_from_slice(&r_x);
    bytes[32..].copy_from_slice(&s.to_bytes());
    let signature = SchnorrSignature(bytes);

    if !verify(&public.schnorr(), message, &signature) {
        error!("schnorr signature failed verification against its own key");
        return Err(Error::SignatureSelfCheckFailed)
    }

    Ok(signature)
}

/// Sign with auxiliary randomness drawn from the given generator
pub fn sign_with_rng<R: RngCore + CryptoRng>(key: &PrivKey, message: &[u8; 32], rng: &mut R) -> Result<SchnorrSignature> {
    let mut aux_rand = [0u8; 32];
    rng.fill_bytes(&mut aux_rand);
    sign(key, message, &aux_rand)
}

/// Sign with auxiliary randomness from the operating system
pub fn sign_random(key: &PrivKey, message: &[u8; 32]) -> Result<SchnorrSignature> {
    sign_with_rng(key, message, &mut OsRng)
}

/**
    Verify a signature against an x-only public key.

    R' = s*G - e*P must be a finite point with even y and x equal to r.
*/
pub fn verify(public_key: &SchnorrPublicKey, message: &[u8; 32], signature: &SchnorrSignature) -> bool {
    let r_bytes = signature.r_bytes();
    let r = BigUint::from_bytes_be(&r_bytes);
    if &r >= field_prime() {
        return false
    }
    let s = match Scalar::from_bytes(&signature.s_bytes()) {
        Ok(s) => s,
        Err(_) => return false
    };
    let p: Point = match public_key.to_point() {
        Ok(p) => p,
        Err(_) => return false
    };

    let e = challenge(&r_bytes, &public_key.to_bytes(), message);
    let big_r = secp256k1().mul_g(&s).add(&p.mul((-&e).as_biguint()));

    match big_r.x() {
        Some(x) if big_r.has_even_y() => x == &FieldElement::from_reduced(r),
        _ => false
    }
}
