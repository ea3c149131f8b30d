/*
    This module implements taproot key tweaking and the tagged
    hashes used for taproot outputs and signature hashes.

    Only key path spending is supported. A script tree can still
    be committed to by passing its merkle root to the tweak.

    Reference:
        https://github.com/bitcoin/bips/blob/master/bip-0341.mediawiki
*/

use crate::{
    curve::{secp256k1, Point, Scalar},
    error::{Error, Result},
    hash::tagged_hash,
    key::{PrivKey, PubKey, SchnorrPublicKey}
};

pub trait TaprootTaggedHash {
    fn from_slice(slice: &[u8]) -> [u8; 32];
}

/// Macro to create tagged hash types
macro_rules! taproot_tagged_hashes {
    ($name: ident, $tag: expr) => {
        pub struct $name;

        impl TaprootTaggedHash for $name {
            fn from_slice(slice: &[u8]) -> [u8; 32] {
                tagged_hash($tag, slice)
            }
        }
    }
}

taproot_tagged_hashes!(TapTweakHash, "TapTweak");     // Used for the output key tweak
taproot_tagged_hashes!(TapSighashHash, "TapSighash"); // Used for the BIP341 signature message

impl TapTweakHash {
    /// Create the TapTweakHash from an internal key and an optional script tree merkle root.
    pub fn from_key_and_tweak(key: &SchnorrPublicKey, merkle_root: Option<[u8; 32]>) -> [u8; 32] {
        let mut data = key.to_bytes().to_vec();
        if let Some(root) = merkle_root {
            data.extend_from_slice(&root);
        }
        TapTweakHash::from_slice(&data)
    }

    /// The tweak as a scalar, fails in the negligible case where it is not below n
    pub fn scalar(key: &SchnorrPublicKey, merkle_root: Option<[u8; 32]>) -> Result<Scalar> {
        Scalar::from_bytes(&Self::from_key_and_tweak(key, merkle_root))
            .map_err(|_| Error::InvalidTweak)
    }
}

/**
    Keys that can be tweaked into a taproot output key.
    Q = lift_x(P) + t*G where t = TapTweak(P.x || merkle_root)
*/
pub trait TapTweak {
    type Tweaked;

    fn tap_tweak(&self, merkle_root: Option<[u8; 32]>) -> Result<Self::Tweaked>;
}

impl TapTweak for SchnorrPublicKey {
    type Tweaked = SchnorrPublicKey;

    fn tap_tweak(&self, merkle_root: Option<[u8; 32]>) -> Result<SchnorrPublicKey> {
        let t = TapTweakHash::scalar(self, merkle_root)?;
        let q: Point = self.to_point()?.add(&secp256k1().mul_g(&t));
        Ok(PubKey::from_point(q).map_err(|_| Error::InvalidTweak)?.schnorr())
    }
}

impl TapTweak for PrivKey {
    type Tweaked = PrivKey;

    /**
        Tweaks the secret so that it signs for the output key.
        The secret is first negated if its point has an odd y.
    */
    fn tap_tweak(&self, merkle_root: Option<[u8; 32]>) -> Result<PrivKey> {
        let public = self.public_key();
        let t = TapTweakHash::scalar(&public.schnorr(), merkle_root)?;
        let d = if public.has_even_y() { self.secret().clone() } else { -self.secret() };

        PrivKey::from_scalar(&d + &t).map_err(|_| Error::InvalidTweak)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Key;
    use std::str::FromStr;

    #[test]
    fn key_path_output_keys() -> Result<()> {
        //Internal keys with no script tree, outputs taken from bc1p addresses
        let vectors = [
            ("cc8a4bc64d897bddc5fbc2f670f7a8ba0b386779106cf1223c6fc5d7cd6fc115", "a60869f0dbcf1dc659c9cecbaf8050135ea9e8cdc487053f1dc6880949dc684c"),
            ("83dfe85a3151d2517290da461fe2815591ef69f2b18a2ce63f01697a8b313145", "a82f29944d65b86ae6b5e5cc75e294ead6c59391a1edc5e016e3498c67fc7bbb"),
            ("399f1b2f4393f29a18c937859c5dd8a77350103157eb880f02e8c08214277cef", "882d74e5d0572d5a816cef0041a96b6c1de832f6f9676d9605c44d5e9a97d3dc"),
        ];

        for (internal, output) in vectors {
            let internal = SchnorrPublicKey::from_str(internal)?;
            assert_eq!(internal.tap_tweak(None)?.hex(), output);
        }
        Ok(())
    }

    #[test]
    fn tweak_with_merkle_root() -> Result<()> {
        //Two leaf example from btcdeb's tapscript walkthrough
        let internal = SchnorrPublicKey::from_str("5bf08d58a430f8c222bffaf9127249c5cdff70a2d68b2b45637eb662b6b88eb5")?;
        let root: [u8; 32] = hex::decode("41646f8c1fe2a96ddad7f5471bc4fee7da98794ef8c45a4f4fc6a559d60c9f6b")
            .unwrap()
            .try_into()
            .unwrap();

        assert_eq!(
            internal.tap_tweak(Some(root))?.hex(),
            "f128a8a8a636e19f00a80169550fedfc26b6f5dd04d935ec452894aad938ef0c"
        );
        Ok(())
    }

    #[test]
    fn private_and_public_tweaks_agree() -> Result<()> {
        for _ in 0..3 {
            let key = PrivKey::new_rand();
            let tweaked_secret = key.tap_tweak(None)?;
            let tweaked_public = key.public_key().schnorr().tap_tweak(None)?;
            assert_eq!(tweaked_secret.public_key().schnorr(), tweaked_public);
        }
        Ok(())
    }
}
