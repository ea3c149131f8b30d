/*
    Private and public keys on secp256k1.

    A private key owns its scalar and the public key derived from it
    at construction time. Neither is mutated afterwards, tweaking
    returns a new key.
*/

use crate::{
    curve::{secp256k1, FieldElement, Point, Scalar},
    encoding::{bs58check, VersionPrefix},
    error::{Error, Result},
    hash,
    util::{try_into, Network}
};
use rand::{rngs::OsRng, RngCore};
use std::{fmt, str::FromStr};

/// Common byte level access shared by the key types
pub trait Key {
    fn as_bytes(&self) -> Vec<u8>;

    fn hex(&self) -> String {
        hex::encode(self.as_bytes())
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct PrivKey {
    secret: Scalar,
    public: PubKey
}

impl PrivKey {
    /**
        Generates a random private key from the operating system's entropy source.
    */
    pub fn new_rand() -> Self {
        let mut bytes = [0u8; 32];
        loop {
            OsRng.fill_bytes(&mut bytes);
            if let Ok(key) = Self::from_slice(&bytes) {
                return key
            }
        }
    }

    /**
        Use a predefined 32 byte array as a secret key.
        Fails unless the value is in [1, n-1].
    */
    pub fn from_slice(byte_array: &[u8]) -> Result<Self> {
        let bytes: [u8; 32] = try_into(byte_array, Error::InvalidPrivateKey)?;
        Self::from_scalar(Scalar::from_bytes(&bytes)?)
    }

    pub fn from_scalar(secret: Scalar) -> Result<Self> {
        if secret.is_zero() {
            return Err(Error::InvalidPrivateKey)
        }
        let public = PubKey::from_point(secp256k1().mul_g(&secret))?;
        Ok(Self { secret, public })
    }

    pub fn from_u64(secret: u64) -> Result<Self> {
        Self::from_scalar(Scalar::from_u64(secret))
    }

    pub fn secret(&self) -> &Scalar {
        &self.secret
    }

    pub fn public_key(&self) -> &PubKey {
        &self.public
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.secret.to_bytes()
    }

    /**
        Export the private key in wallet-import-format (Base58Check encoded with prefix)
        * Use the compressed parameter to append the compression byte.
    */
    pub fn export_as_wif(&self, compressed: bool, network: Network) -> String {
        let mut key: Vec<u8> = self.to_bytes().to_vec();
        if compressed {
            key.push(0x01);
        }

        bs58check::check_encode(network.wif_prefix(), &key)
    }

    /**
        Import a WIF private key.
        Returns the key, whether it signals a compressed public key, and its network.
    */
    pub fn from_wif(wif: &str) -> Result<(Self, bool, Network)> {
        let payload = bs58check::check_decode(wif)?;
        let network = match payload.first().map(|b| VersionPrefix::from_int(*b as u32)) {
            Some(Ok(VersionPrefix::PrivateKeyWIF)) => Network::Bitcoin,
            Some(Ok(VersionPrefix::TestNetPrivateKeyWIF)) => Network::Testnet,
            _ => return Err(Error::BadPrefix(payload.iter().take(1).copied().collect()))
        };

        match payload.len() {
            33 => Ok((Self::from_slice(&payload[1..33])?, false, network)),
            34 if payload[33] == 0x01 => Ok((Self::from_slice(&payload[1..33])?, true, network)),
            _ => Err(Error::InvalidPrivateKey)
        }
    }
}

impl Key for PrivKey {
    fn as_bytes(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }
}

//Only the public half is printed
impl fmt::Debug for PrivKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PrivKey").field("public", &self.public).finish_non_exhaustive()
    }
}

/// A point on the curve other than infinity
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PubKey(Point);

impl PubKey {
    pub fn from_point(point: Point) -> Result<Self> {
        if point.is_infinity() {
            return Err(Error::PointAtInfinity)
        }
        Ok(Self(point))
    }

    /**
        Use a predefined byte array as a public key.
        Accepts the 33 byte compressed and 65 byte uncompressed encodings.
    */
    pub fn from_slice(byte_array: &[u8]) -> Result<Self> {
        Self::from_point(Point::from_sec(byte_array)?)
    }

    pub fn point(&self) -> &Point {
        &self.0
    }

    /**
        Returns the compressed public key as a byte array.
    */
    pub fn compressed_bytes(&self) -> [u8; 33] {
        self.0.serialize_compressed().unwrap_or([0u8; 33])
    }

    /**
        Returns the uncompressed public key (0x04 || x || y).
    */
    pub fn decompressed_bytes(&self) -> [u8; 65] {
        self.0.serialize_uncompressed().unwrap_or([0u8; 65])
    }

    /// hash160 of the compressed encoding
    pub fn hash160(&self) -> [u8; 20] {
        hash::hash160(self.compressed_bytes())
    }

    pub fn has_even_y(&self) -> bool {
        self.0.has_even_y()
    }

    /// The x-only key used by BIP340 and taproot
    pub fn schnorr(&self) -> SchnorrPublicKey {
        SchnorrPublicKey(self.0.x().map(FieldElement::to_bytes).unwrap_or([0u8; 32]))
    }
}

impl Key for PubKey {
    fn as_bytes(&self) -> Vec<u8> {
        self.compressed_bytes().to_vec()
    }
}

impl fmt::Debug for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PubKey({})", self.hex())
    }
}

impl fmt::Display for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.hex())
    }
}

impl FromStr for PubKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|_| Error::InvalidPublicKey)?;
        Self::from_slice(&bytes)
    }
}

/**
    32 byte x-only public key.
    Always refers to the point with the even y coordinate.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchnorrPublicKey([u8; 32]);

impl SchnorrPublicKey {
    /// Fails if the bytes are not the x coordinate of a curve point
    pub fn from_slice(byte_array: &[u8]) -> Result<Self> {
        let bytes: [u8; 32] = try_into(byte_array, Error::InvalidPublicKey)?;
        let key = Self(bytes);
        key.to_point()?;
        Ok(key)
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// lift_x of the stored coordinate
    pub fn to_point(&self) -> Result<Point> {
        Point::lift_x(&FieldElement::from_bytes(&self.0)?)
    }
}

impl Key for SchnorrPublicKey {
    fn as_bytes(&self) -> Vec<u8> {
        self.0.to_vec()
    }
}

impl FromStr for SchnorrPublicKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|_| Error::InvalidPublicKey)?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Display for SchnorrPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.hex())
    }
}
