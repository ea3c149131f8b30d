/*
    This module implements extended keys that are
    used in BIP32 hierarchal deterministic wallets.

    Serialized extended keys are 78 bytes before Base58Check:
    version(4) || depth(1) || parent fingerprint(4) || index(4) || chaincode(32) || key(33)

    Private keys are padded with a leading 0x00 in the key field.
*/

use crate::{
    address::Address,
    encoding::{bs58check, ToVersionPrefix, VersionPrefix},
    error::{Error, Result},
    hash,
    hdwallet::{
        ckd::{derive_xprv, derive_xpub},
        ChildOptions, KeyKind, Path, WalletType
    },
    key::{PrivKey, PubKey},
    util::{try_into, Network}
};
use std::str::FromStr;
use tracing::trace;

const SEED_KEY: &[u8] = b"Bitcoin seed";
const SERIALIZED_LEN: usize = 78;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Xprv {
    key: PrivKey,
    chaincode: [u8; 32],
    pub depth: u8,
    pub parent_fingerprint: [u8; 4],
    pub index: u32,
    version: VersionPrefix
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Xpub {
    key: PubKey,
    chaincode: [u8; 32],
    pub depth: u8,
    pub parent_fingerprint: [u8; 4],
    pub index: u32,
    version: VersionPrefix
}

/**
    An extended key of either kind.
    Public keys can only derive normal public children.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtendedKey {
    Private(Xprv),
    Public(Xpub)
}

//Fields shared by both kinds after Base58Check decoding
struct Decoded {
    version: VersionPrefix,
    depth: u8,
    parent_fingerprint: [u8; 4],
    index: u32,
    chaincode: [u8; 32],
    key_data: [u8; 33]
}

fn decode(key: &str) -> Result<Decoded> {
    let bytes = bs58check::check_decode(key)?;
    if bytes.len() != SERIALIZED_LEN {
        return Err(Error::InvalidExtendedKey(format!("payload is {} bytes, expected {}", bytes.len(), SERIALIZED_LEN)))
    }
    let bad = || Error::InvalidExtendedKey(key.to_string());

    let version = VersionPrefix::from_extended_bytes(&try_into(&bytes[0..4], bad())?)?;
    let depth = bytes[4];
    let parent_fingerprint: [u8; 4] = try_into(&bytes[5..9], bad())?;
    let index = u32::from_be_bytes(try_into(&bytes[9..13], bad())?);

    if depth == 0 && (parent_fingerprint != [0u8; 4] || index != 0) {
        return Err(Error::InvalidExtendedKey("master key with a parent fingerprint or index".to_string()))
    }

    Ok(Decoded {
        version,
        depth,
        parent_fingerprint,
        index,
        chaincode: try_into(&bytes[13..45], bad())?,
        key_data: try_into(&bytes[45..78], bad())?
    })
}

fn encode(version: VersionPrefix, depth: u8, pf: &[u8; 4], index: u32, chaincode: &[u8; 32], key_data: &[u8]) -> String {
    let mut payload: Vec<u8> = Vec::with_capacity(SERIALIZED_LEN - 4);
    payload.push(depth);
    payload.extend_from_slice(pf);
    payload.extend_from_slice(&index.to_be_bytes());
    payload.extend_from_slice(chaincode);
    payload.extend_from_slice(key_data);

    bs58check::check_encode(version, &payload)
}

/**
    Converts a public key to an address of the given wallet type.
*/
fn address_of(key: &PubKey, wallet_type: &WalletType, network: Network) -> Result<String> {
    let address = match wallet_type {
        WalletType::P2PKH => Address::p2pkh(key, true, network),
        WalletType::P2WPKH => Address::p2wpkh(key, network),
        WalletType::P2SH_P2WPKH => Address::p2sh_p2wpkh(key, network),
        //Tweaking with no script tree
        WalletType::P2TR => Address::p2tr(&key.schnorr(), None, network)?
    };
    Ok(address.to_string())
}

fn check_version(version: VersionPrefix, private: bool) -> Result<VersionPrefix> {
    match version.is_private_extended() {
        Some(p) if p == private => Ok(version),
        _ => Err(Error::BadPrefix(version.to_bytes()))
    }
}

impl Xprv {
    /**
        Constructs the extended key.
        The version defaults to xprv, see with_version.
    */
    pub fn construct(key: PrivKey, chaincode: [u8; 32], depth: u8, pf: [u8; 4], index: u32) -> Self {
        Self {
            key,
            chaincode,
            depth,
            parent_fingerprint: pf,
            index,
            version: VersionPrefix::Xprv
        }
    }

    /**
        Master key from a seed.
        I = HMAC-SHA512(key = "Bitcoin seed", data = seed)
    */
    pub fn from_seed(seed: &[u8]) -> Result<Self> {
        if seed.len() < 16 || seed.len() > 64 {
            return Err(Error::InvalidExtendedKey(format!("seed of {} bytes", seed.len())))
        }
        let hash: [u8; 64] = hash::hmac_sha512(seed, SEED_KEY);
        let key = PrivKey::from_slice(&hash[..32])
            .map_err(|_| Error::InvalidExtendedKey("seed gives an invalid master key".to_string()))?;

        Ok(Self::construct(key, try_into(&hash[32..], Error::InvalidPrivateKey)?, 0, [0u8; 4], 0))
    }

    /// Master key with the version prefix of a wallet type
    pub fn master(seed: &[u8], wallet_type: &WalletType, network: Network) -> Result<Self> {
        Ok(Self::from_seed(seed)?.with_prefix(wallet_type.private_version_prefix(network)))
    }

    /// Changes the serialization prefix, which must be for private keys
    pub fn with_version(self, version: VersionPrefix) -> Result<Self> {
        Ok(self.with_prefix(check_version(version, true)?))
    }

    pub(crate) fn with_prefix(mut self, version: VersionPrefix) -> Self {
        self.version = version;
        self
    }

    pub fn key(&self) -> &PrivKey {
        &self.key
    }

    pub fn chaincode(&self) -> [u8; 32] {
        self.chaincode
    }

    pub fn version(&self) -> VersionPrefix {
        self.version
    }

    pub fn network(&self) -> Network {
        self.version.network()
    }

    /**
        Return the non extended public key of self.
    */
    pub fn get_pub(&self) -> &PubKey {
        self.key.public_key()
    }

    /**
        Find the corresponding xpub for a xprv.
        The version becomes the public counterpart of the private version.
    */
    pub fn get_xpub(&self) -> Xpub {
        Xpub::construct(
            self.get_pub().clone(),
            self.chaincode,
            self.depth,
            self.parent_fingerprint,
            self.index
        )
        .with_prefix(self.version.counterpart().unwrap_or(VersionPrefix::Xpub))
    }

    /// First 4 bytes of the hash160 of the public key
    pub fn fingerprint(&self) -> [u8; 4] {
        fingerprint(self.get_pub())
    }

    /**
        Derives the child key of self
    */
    pub fn get_xchild(&self, options: ChildOptions) -> Result<Xprv> {
        derive_xprv(self, options)
    }

    /**
        Derive the key at the given path.
        eg. m/44'/0'/0'/0
    */
    pub fn derive_from_path(&self, path: &Path) -> Result<Xprv> {
        trace!(%path, "deriving private key at path");
        path.children.iter().try_fold(self.clone(), |key, child| key.get_xchild(*child))
    }

    pub fn serialize(&self) -> String {
        let mut key_data = vec![0x00];
        key_data.extend_from_slice(&self.key.to_bytes());
        encode(self.version, self.depth, &self.parent_fingerprint, self.index, &self.chaincode, &key_data)
    }

    /**
        Converts the key to an address.
    */
    pub fn get_address(&self, wallet_type: &WalletType, network: Network) -> Result<String> {
        address_of(self.get_pub(), wallet_type, network)
    }
}

impl FromStr for Xprv {
    type Err = Error;

    /**
        Import a extended private key from a string.
        "xprv[...]", "yprv[...]", "zprv[...]" and the testnet and SLIP-132 forms.
    */
    fn from_str(key: &str) -> Result<Self> {
        let decoded = decode(key)?;
        check_version(decoded.version, true)?;
        if decoded.key_data[0] != 0x00 {
            return Err(Error::InvalidExtendedKey("private key data must start with 0x00".to_string()))
        }

        Ok(Self::construct(
            PrivKey::from_slice(&decoded.key_data[1..])?,
            decoded.chaincode,
            decoded.depth,
            decoded.parent_fingerprint,
            decoded.index
        )
        .with_prefix(decoded.version))
    }
}

impl Xpub {
    pub fn construct(key: PubKey, chaincode: [u8; 32], depth: u8, pf: [u8; 4], index: u32) -> Self {
        Self {
            key,
            chaincode,
            depth,
            parent_fingerprint: pf,
            index,
            version: VersionPrefix::Xpub
        }
    }

    /// Changes the serialization prefix, which must be for public keys
    pub fn with_version(self, version: VersionPrefix) -> Result<Self> {
        Ok(self.with_prefix(check_version(version, false)?))
    }

    pub(crate) fn with_prefix(mut self, version: VersionPrefix) -> Self {
        self.version = version;
        self
    }

    pub fn get_pub(&self) -> &PubKey {
        &self.key
    }

    pub fn chaincode(&self) -> [u8; 32] {
        self.chaincode
    }

    pub fn version(&self) -> VersionPrefix {
        self.version
    }

    pub fn network(&self) -> Network {
        self.version.network()
    }

    pub fn fingerprint(&self) -> [u8; 4] {
        fingerprint(&self.key)
    }

    pub fn get_xchild(&self, options: ChildOptions) -> Result<Xpub> {
        derive_xpub(self, options)
    }

    pub fn derive_from_path(&self, path: &Path) -> Result<Xpub> {
        trace!(%path, "deriving public key at path");
        path.children.iter().try_fold(self.clone(), |key, child| key.get_xchild(*child))
    }

    pub fn serialize(&self) -> String {
        encode(self.version, self.depth, &self.parent_fingerprint, self.index, &self.chaincode, &self.key.compressed_bytes())
    }

    pub fn get_address(&self, wallet_type: &WalletType, network: Network) -> Result<String> {
        address_of(&self.key, wallet_type, network)
    }
}

impl FromStr for Xpub {
    type Err = Error;

    fn from_str(key: &str) -> Result<Self> {
        let decoded = decode(key)?;
        check_version(decoded.version, false)?;

        Ok(Self::construct(
            PubKey::from_slice(&decoded.key_data)?,
            decoded.chaincode,
            decoded.depth,
            decoded.parent_fingerprint,
            decoded.index
        )
        .with_prefix(decoded.version))
    }
}

fn fingerprint(key: &PubKey) -> [u8; 4] {
    let hash = key.hash160();
    [hash[0], hash[1], hash[2], hash[3]]
}

impl ExtendedKey {
    pub fn derive_child(&self, options: ChildOptions) -> Result<ExtendedKey> {
        match self {
            ExtendedKey::Private(xprv) => Ok(ExtendedKey::Private(xprv.get_xchild(options)?)),
            ExtendedKey::Public(xpub) => Ok(ExtendedKey::Public(xpub.get_xchild(options)?))
        }
    }

    /**
        Derives along the path, then returns the kind of key asked for.
        A public key can neither derive hardened children nor return a private key.
    */
    pub fn derive_path(&self, path: &Path, kind: KeyKind) -> Result<ExtendedKey> {
        match (self, kind) {
            (ExtendedKey::Private(xprv), KeyKind::Private) => Ok(ExtendedKey::Private(xprv.derive_from_path(path)?)),
            (ExtendedKey::Private(xprv), KeyKind::Public) => Ok(ExtendedKey::Public(xprv.derive_from_path(path)?.get_xpub())),
            (ExtendedKey::Public(xpub), KeyKind::Public) => Ok(ExtendedKey::Public(xpub.derive_from_path(path)?)),
            (ExtendedKey::Public(_), KeyKind::Private) => Err(Error::CannotDeriveFromPublic)
        }
    }

    pub fn serialize(&self) -> String {
        match self {
            ExtendedKey::Private(xprv) => xprv.serialize(),
            ExtendedKey::Public(xpub) => xpub.serialize()
        }
    }

    pub fn to_public_key(&self) -> PubKey {
        match self {
            ExtendedKey::Private(xprv) => xprv.get_pub().clone(),
            ExtendedKey::Public(xpub) => xpub.get_pub().clone()
        }
    }

    /// The public form of the key, a no-op for public keys
    pub fn neuter(&self) -> Xpub {
        match self {
            ExtendedKey::Private(xprv) => xprv.get_xpub(),
            ExtendedKey::Public(xpub) => xpub.clone()
        }
    }

    pub fn depth(&self) -> u8 {
        match self {
            ExtendedKey::Private(xprv) => xprv.depth,
            ExtendedKey::Public(xpub) => xpub.depth
        }
    }

    pub fn fingerprint(&self) -> [u8; 4] {
        fingerprint(&self.to_public_key())
    }

    pub fn get_address(&self, wallet_type: &WalletType, network: Network) -> Result<String> {
        address_of(&self.to_public_key(), wallet_type, network)
    }
}

impl FromStr for ExtendedKey {
    type Err = Error;

    fn from_str(key: &str) -> Result<Self> {
        match decode(key)?.version.is_private_extended() {
            Some(true) => Ok(ExtendedKey::Private(Xprv::from_str(key)?)),
            _ => Ok(ExtendedKey::Public(Xpub::from_str(key)?))
        }
    }
}
