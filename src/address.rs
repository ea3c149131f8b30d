/*
    Address strings for the supported output types.

    Legacy outputs (P2PKH, P2SH) are Base58Check encoded with a one
    byte network prefix. Segwit outputs use Bech32 for version 0 and
    Bech32m for taproot. Every address maps back to the scriptPubKey
    it pays to.
*/

use crate::{
    encoding::{bech32, bs58check, VersionPrefix},
    error::{Error, Result},
    hash,
    key::{PubKey, SchnorrPublicKey},
    script::Script,
    taproot::TapTweak,
    util::{try_into, Network}
};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Address {
    P2PKH { hash: [u8; 20], network: Network },
    P2SH { hash: [u8; 20], network: Network },
    P2WPKH { hash: [u8; 20], network: Network },
    P2WSH { hash: [u8; 32], network: Network },
    P2TR { output_key: SchnorrPublicKey, network: Network }
}

impl Address {
    /**
        Creates a wallet address from a public key.
        * Base58Check( Riped160( Sha256( Public Key ) ) )
    */
    pub fn p2pkh(pk: &PubKey, compressed: bool, network: Network) -> Self {
        let hash = if compressed { pk.hash160() } else { hash::hash160(pk.decompressed_bytes()) };
        Address::P2PKH { hash, network }
    }

    /**
        Creates a P2SH address from a redeem script
    */
    pub fn p2sh(redeem_script: &Script, network: Network) -> Self {
        Address::P2SH { hash: redeem_script.hash160(), network }
    }

    /**
        Create a P2WPKH address from a public key
    */
    pub fn p2wpkh(pk: &PubKey, network: Network) -> Self {
        Address::P2WPKH { hash: pk.hash160(), network }
    }

    /**
        P2WPKH nested in P2SH (BIP49).
        The redeem script is the P2WPKH output script of the key.
    */
    pub fn p2sh_p2wpkh(pk: &PubKey, network: Network) -> Self {
        Self::p2sh(&Script::p2wpkh(&pk.hash160()), network)
    }

    /**
        Create a P2WSH address from a witness script
    */
    pub fn p2wsh(witness_script: &Script, network: Network) -> Self {
        Address::P2WSH { hash: witness_script.sha256(), network }
    }

    /**
        Create a taproot address from an internal key.
        The key is tweaked with the optional script tree root before encoding.
    */
    pub fn p2tr(internal_key: &SchnorrPublicKey, merkle_root: Option<[u8; 32]>, network: Network) -> Result<Self> {
        Ok(Address::P2TR { output_key: internal_key.tap_tweak(merkle_root)?, network })
    }

    pub fn network(&self) -> Network {
        match self {
            Address::P2PKH { network, .. }
            | Address::P2SH { network, .. }
            | Address::P2WPKH { network, .. }
            | Address::P2WSH { network, .. }
            | Address::P2TR { network, .. } => *network
        }
    }

    /// The output script paying to this address
    pub fn script_pubkey(&self) -> Script {
        match self {
            Address::P2PKH { hash, .. } => Script::p2pkh(hash),
            Address::P2SH { hash, .. } => Script::p2sh(hash),
            Address::P2WPKH { hash, .. } => Script::p2wpkh(hash),
            Address::P2WSH { hash, .. } => Script::p2wsh(hash),
            Address::P2TR { output_key, .. } => Script::p2tr(output_key)
        }
    }

    /**
        Recovers the address of a standard output script.
        Fails for scripts that have no address form.
    */
    pub fn from_script(script_pubkey: &Script, network: Network) -> Result<Self> {
        let unsupported = || Error::InvalidAddress("script has no address form".to_string());

        let (version, program) = match script_pubkey.witness_program() {
            Some(witness) => witness,
            None => return match script_pubkey.raw_serialize().as_slice() {
                [0x76, 0xa9, 0x14, hash @ .., 0x88, 0xac] => Ok(Address::P2PKH { hash: try_into(hash, unsupported())?, network }),
                [0xa9, 0x14, hash @ .., 0x87] => Ok(Address::P2SH { hash: try_into(hash, unsupported())?, network }),
                _ => Err(unsupported())
            }
        };

        match (version, program.len()) {
            (0, 20) => Ok(Address::P2WPKH { hash: try_into(program, unsupported())?, network }),
            (0, 32) => Ok(Address::P2WSH { hash: try_into(program, unsupported())?, network }),
            (1, 32) => Ok(Address::P2TR { output_key: SchnorrPublicKey::from_slice(program)?, network }),
            _ => Err(unsupported())
        }
    }

    /**
        Verifies that an address is valid by checking the payload and checksum
    */
    pub fn is_valid(address: &str) -> bool {
        Address::from_str(address).is_ok()
    }

    fn decode_base58(address: &str) -> Result<Self> {
        let payload = bs58check::check_decode(address)?;
        if payload.len() != 21 {
            return Err(Error::InvalidAddress(format!("payload of {} bytes", payload.len())))
        }
        let hash: [u8; 20] = try_into(&payload[1..], Error::InvalidAddress(address.to_string()))?;

        match VersionPrefix::from_int(payload[0] as u32)? {
            VersionPrefix::BTCAddress => Ok(Address::P2PKH { hash, network: Network::Bitcoin }),
            VersionPrefix::BTCTestNetAddress => Ok(Address::P2PKH { hash, network: Network::Testnet }),
            VersionPrefix::P2ScriptAddress => Ok(Address::P2SH { hash, network: Network::Bitcoin }),
            VersionPrefix::TestnetP2SHAddress => Ok(Address::P2SH { hash, network: Network::Testnet }),
            _ => Err(Error::BadPrefix(vec![payload[0]]))
        }
    }

    fn decode_segwit(address: &str) -> Result<Self> {
        let (network, version, program) = bech32::decode(address)?;
        let invalid = || Error::InvalidAddress(address.to_string());

        match (version, program.len()) {
            (0, 20) => Ok(Address::P2WPKH { hash: try_into(&program, invalid())?, network }),
            (0, 32) => Ok(Address::P2WSH { hash: try_into(&program, invalid())?, network }),
            (1, 32) => Ok(Address::P2TR { output_key: SchnorrPublicKey::from_slice(&program)?, network }),
            _ => Err(Error::InvalidAddress(format!("unsupported witness version {}", version)))
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let encoded = match self {
            Address::P2PKH { hash, network } => bs58check::check_encode(network.p2pkh_prefix(), hash),
            Address::P2SH { hash, network } => bs58check::check_encode(network.p2sh_prefix(), hash),
            Address::P2WPKH { hash, network } => bech32::encode(0, hash, *network).map_err(|_| fmt::Error)?,
            Address::P2WSH { hash, network } => bech32::encode(0, hash, *network).map_err(|_| fmt::Error)?,
            Address::P2TR { output_key, network } => bech32::encode(1, &output_key.to_bytes(), *network).map_err(|_| fmt::Error)?
        };
        write!(f, "{}", encoded)
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.to_lowercase();
        if lower.starts_with("bc1") || lower.starts_with("tb1") {
            Self::decode_segwit(s)
        } else {
            Self::decode_base58(s)
        }
    }
}
