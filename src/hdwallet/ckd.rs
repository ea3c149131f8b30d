/*
    This module implements child key deriveration
    from parent extended private and public keys
    under the BIP32 standard.

    If a child index produces an invalid key (IL >= n, or a zero
    or infinite child) derivation moves on to the next index.
*/

use crate::{
    curve::{secp256k1, Scalar},
    error::{Error, Result},
    hash::hmac_sha512,
    hdwallet::{Xprv, Xpub},
    key::{PrivKey, PubKey},
};
use tracing::{trace, warn};

pub const HARDENED_OFFSET: u32 = 1 << 31;

/**
    Enum to pattern match child key deriveration options.
    The wrapped value is the index without the hardened offset.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildOptions {
    Normal(u32),
    Hardened(u32)
}

impl ChildOptions {
    /// Builds the option from a full 32 bit child index
    pub fn from_index(index: u32) -> Self {
        if index >= HARDENED_OFFSET {
            ChildOptions::Hardened(index - HARDENED_OFFSET)
        } else {
            ChildOptions::Normal(index)
        }
    }

    /// The serialized child index, with the hardened offset applied
    pub fn index(&self) -> Result<u32> {
        match *self {
            ChildOptions::Normal(x) if x < HARDENED_OFFSET => Ok(x),
            ChildOptions::Hardened(x) if x < HARDENED_OFFSET => Ok(x + HARDENED_OFFSET),
            ChildOptions::Normal(x) | ChildOptions::Hardened(x) => Err(Error::InvalidChildIndex(x))
        }
    }

    pub fn is_hardened(&self) -> bool {
        matches!(self, ChildOptions::Hardened(_))
    }

    //The following index of the same kind, if there is one
    fn next(&self) -> Option<Self> {
        match *self {
            ChildOptions::Normal(x) if x + 1 < HARDENED_OFFSET => Some(ChildOptions::Normal(x + 1)),
            ChildOptions::Hardened(x) if x + 1 < HARDENED_OFFSET => Some(ChildOptions::Hardened(x + 1)),
            _ => None
        }
    }
}

/**
    Splits HMAC-SHA512(chaincode, data) into the tweak IL and the child chaincode IR.
    IL is None when it is not below the group order.
*/
fn child_hash(chaincode: &[u8; 32], data: &[u8]) -> (Option<Scalar>, [u8; 32]) {
    let hash: [u8; 64] = hmac_sha512(data, chaincode);

    let mut left = [0u8; 32];
    let mut child_chaincode = [0u8; 32];
    left.copy_from_slice(&hash[..32]);
    child_chaincode.copy_from_slice(&hash[32..]);

    (Scalar::from_bytes(&left).ok(), child_chaincode)
}

fn child_depth(parent_depth: u8) -> Result<u8> {
    parent_depth.checked_add(1).ok_or(Error::DepthOverflow)
}

/**
    Function to derive new child xprv keys from parent xprv keys.
    Hardened children commit to the parent private key, normal children
    to the parent public key.
*/
pub fn derive_xprv(parent: &Xprv, options: ChildOptions) -> Result<Xprv> {
    let depth = child_depth(parent.depth)?;
    let mut options = options;

    loop {
        let index = options.index()?;

        //Hardened: 0x00 || parent key || index, normal: parent pubkey || index
        let mut data: Vec<u8> = Vec::with_capacity(37);
        if options.is_hardened() {
            data.push(0x00);
            data.extend_from_slice(&parent.key().to_bytes());
        } else {
            data.extend_from_slice(&parent.get_pub().compressed_bytes());
        }
        data.extend_from_slice(&index.to_be_bytes());

        let (tweak, chaincode) = child_hash(&parent.chaincode(), &data);
        let child = tweak.and_then(|t| PrivKey::from_scalar(&t + parent.key().secret()).ok());

        match child {
            Some(key) => {
                trace!(depth, index, "derived private child");
                return Ok(Xprv::construct(key, chaincode, depth, parent.fingerprint(), index)
                    .with_prefix(parent.version()))
            },
            None => {
                warn!(index, "child index gives an invalid key, skipping to the next index");
                options = options.next().ok_or(Error::InvalidChildKey)?;
            }
        }
    }
}

/**
    Function to derive new child xpub keys from parent xpub keys.
    Only normal children can be derived from a public key.
*/
pub fn derive_xpub(parent: &Xpub, options: ChildOptions) -> Result<Xpub> {
    if options.is_hardened() {
        return Err(Error::CannotDeriveFromPublic)
    }
    let depth = child_depth(parent.depth)?;
    let mut options = options;

    loop {
        let index = options.index()?;

        let mut data: Vec<u8> = parent.get_pub().compressed_bytes().to_vec();
        data.extend_from_slice(&index.to_be_bytes());

        let (tweak, chaincode) = child_hash(&parent.chaincode(), &data);
        //IL*G + parent point
        let child = tweak.and_then(|t| {
            PubKey::from_point(secp256k1().mul_g(&t).add(parent.get_pub().point())).ok()
        });

        match child {
            Some(key) => {
                trace!(depth, index, "derived public child");
                return Ok(Xpub::construct(key, chaincode, depth, parent.fingerprint(), index)
                    .with_prefix(parent.version()))
            },
            None => {
                warn!(index, "child index gives an invalid key, skipping to the next index");
                options = options.next().ok_or(Error::InvalidChildKey)?;
            }
        }
    }
}
