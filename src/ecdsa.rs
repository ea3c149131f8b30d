/*
    ECDSA over secp256k1 with deterministic nonces.

    Nonces follow RFC6979 with HMAC-SHA256, producing the same
    signatures as libsecp256k1. Signatures are always normalised
    to low-S and are DER encoded for use in scripts.
*/

use crate::{
    curve::{secp256k1, Scalar},
    error::{Error, Result},
    hash::hmac_sha256,
    key::{PrivKey, PubKey}
};
use num_bigint::BigUint;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub r: Scalar,
    pub s: Scalar
}

impl Signature {
    /// Fails unless both r and s are in [1, n-1]
    pub fn new(r: Scalar, s: Scalar) -> Result<Self> {
        if r.is_zero() || s.is_zero() {
            return Err(Error::InvalidSignature("r and s must be nonzero".to_string()))
        }
        Ok(Self { r, s })
    }

    /**
        DER encoding.
        0x30 [len] 0x02 [len r] [r] 0x02 [len s] [s]
    */
    pub fn der(&self) -> Vec<u8> {
        let r = der_integer(&self.r);
        let s = der_integer(&self.s);

        let mut out = vec![0x30, (r.len() + s.len()) as u8];
        out.extend_from_slice(&r);
        out.extend_from_slice(&s);
        out
    }

    /// Strict DER parse of a signature without a sighash byte
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let bad = |why: &str| Error::InvalidSignature(why.to_string());

        if der.len() < 8 || der[0] != 0x30 {
            return Err(bad("not a DER sequence"))
        }
        if der[1] as usize != der.len() - 2 {
            return Err(bad("sequence length mismatch"))
        }

        let (r, rest) = read_der_integer(&der[2..])?;
        let (s, rest) = read_der_integer(rest)?;
        if !rest.is_empty() {
            return Err(bad("trailing bytes"))
        }

        Signature::new(r, s)
    }

    pub fn is_low_s(&self) -> bool {
        !self.s.is_high()
    }
}

fn der_integer(value: &Scalar) -> Vec<u8> {
    let mut bytes = value.as_biguint().to_bytes_be();
    //Positive integers with the high bit set get a zero byte prefix
    if bytes[0] & 0x80 != 0 {
        bytes.insert(0, 0x00);
    }

    let mut out = vec![0x02, bytes.len() as u8];
    out.extend_from_slice(&bytes);
    out
}

fn read_der_integer(data: &[u8]) -> Result<(Scalar, &[u8])> {
    let bad = |why: &str| Error::InvalidSignature(why.to_string());

    if data.len() < 2 || data[0] != 0x02 {
        return Err(bad("expected an integer"))
    }
    let len = data[1] as usize;
    if len == 0 || len > 33 || data.len() < 2 + len {
        return Err(bad("bad integer length"))
    }

    let bytes = &data[2..2 + len];
    if bytes[0] & 0x80 != 0 {
        return Err(bad("negative integer"))
    }
    if len > 1 && bytes[0] == 0x00 && bytes[1] & 0x80 == 0 {
        return Err(bad("integer is not minimally encoded"))
    }

    let value = Scalar::new(BigUint::from_bytes_be(bytes))
        .map_err(|_| bad("integer is not below the group order"))?;
    Ok((value, &data[2 + len..]))
}

/**
    RFC6979 nonce generator for a key and message digest.

    Yields successive candidates in [1, n-1]. A candidate that
    produces a zero r or s is discarded by asking for the next one.
*/
pub struct Rfc6979 {
    k: [u8; 32],
    v: [u8; 32],
    first: bool
}

impl Rfc6979 {
    pub fn new(secret: &Scalar, digest: &[u8; 32]) -> Self {
        let x = secret.to_bytes();
        let h1 = Scalar::from_bytes_reduced(digest).to_bytes();

        let mut v = [0x01u8; 32];
        let mut k = [0x00u8; 32];

        k = hmac_sha256(&[&v[..], &[0x00], &x, &h1].concat(), &k);
        v = hmac_sha256(&v, &k);
        k = hmac_sha256(&[&v[..], &[0x01], &x, &h1].concat(), &k);
        v = hmac_sha256(&v, &k);

        Self { k, v, first: true }
    }

    pub fn next_nonce(&mut self) -> Scalar {
        loop {
            if !self.first {
                self.k = hmac_sha256(&[&self.v[..], &[0x00]].concat(), &self.k);
                self.v = hmac_sha256(&self.v, &self.k);
            }
            self.first = false;

            self.v = hmac_sha256(&self.v, &self.k);
            match Scalar::from_bytes(&self.v) {
                Ok(k) if !k.is_zero() => return k,
                _ => warn!("rfc6979 candidate out of range, retrying")
            }
        }
    }
}

/**
    Sign a 32 byte digest.

    s = k^-1 (z + r*d) mod n, negated into the lower half of the group.
*/
pub fn sign(key: &PrivKey, digest: &[u8; 32]) -> Result<Signature> {
    let d = key.secret();
    let z = Scalar::from_bytes_reduced(digest);
    let mut nonces = Rfc6979::new(d, digest);

    loop {
        let k = nonces.next_nonce();
        match sign_with_nonce(d, &z, &k) {
            Ok(signature) => return Ok(signature),
            Err(Error::ZeroNonce) => {
                warn!("ecdsa nonce produced a zero component, retrying");
                continue
            },
            Err(e) => return Err(e)
        }
    }
}

fn sign_with_nonce(d: &Scalar, z: &Scalar, k: &Scalar) -> Result<Signature> {
    if k.is_zero() {
        return Err(Error::ZeroNonce)
    }

    let big_r = secp256k1().mul_g(k);
    let r = match big_r.x() {
        Some(x) => Scalar::from_reduced(x.as_biguint().clone()),
        None => return Err(Error::ZeroNonce)
    };
    if r.is_zero() {
        return Err(Error::ZeroNonce)
    }

    let k_inv = k.inverse().map_err(|_| Error::ZeroNonce)?;
    let mut s = &k_inv * &(z + &(&r * d));
    if s.is_zero() {
        return Err(Error::ZeroNonce)
    }
    if s.is_high() {
        s = -&s;
    }

    Ok(Signature { r, s })
}

/**
    Verify a signature over a 32 byte digest.
    Accepts iff (u*G + v*P).x mod n == r with u = z/s and v = r/s.
*/
pub fn verify(key: &PubKey, digest: &[u8; 32], signature: &Signature) -> bool {
    if signature.r.is_zero() || signature.s.is_zero() {
        return false
    }

    let curve = secp256k1();
    let z = Scalar::from_bytes_reduced(digest);
    let s_inv = match signature.s.inverse() {
        Ok(s_inv) => s_inv,
        Err(_) => return false
    };
    let u = &z * &s_inv;
    let v = &signature.r * &s_inv;

    let total = curve.mul_g(&u).add(&key.point().mul(v.as_biguint()));
    match total.x() {
        Some(x) => Scalar::from_reduced(x.as_biguint().clone()) == signature.r,
        None => false
    }
}
