/*
    This module implements hierarchical deterministic wallets
    under the BIP 32 standard.

    Extended keys are either private or public. Both carry a chain
    code and the metadata needed to serialize them: depth, parent
    fingerprint, child index and version prefix.

    Reference:
        https://github.com/bitcoin/bips/blob/master/bip-0032.mediawiki
*/

pub mod ckd;
pub mod extended_keys;
pub mod path;

pub use ckd::ChildOptions;
pub use extended_keys::{ExtendedKey, Xprv, Xpub};
pub use path::Path;

use crate::{
    encoding::{ToVersionPrefix, VersionPrefix},
    util::Network
};

/// Whether a path derivation should end in a private or public key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Private,
    Public
}

/**
    Script family that addresses of a key are created for.
    Each family has its own extended key version prefixes.
*/
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletType {
    P2PKH,
    P2WPKH,
    P2SH_P2WPKH,
    P2TR
}

impl WalletType {
    /// The wallet type implied by an extended key version
    pub fn from_prefix(prefix: VersionPrefix) -> Option<Self> {
        match prefix {
            VersionPrefix::Xprv | VersionPrefix::Xpub |
            VersionPrefix::Tprv | VersionPrefix::Tpub => Some(WalletType::P2PKH),
            VersionPrefix::Zprv | VersionPrefix::Zpub |
            VersionPrefix::Vprv | VersionPrefix::Vpub => Some(WalletType::P2WPKH),
            VersionPrefix::Yprv | VersionPrefix::Ypub |
            VersionPrefix::Uprv | VersionPrefix::Upub => Some(WalletType::P2SH_P2WPKH),
            _ => None
        }
    }
}

impl ToVersionPrefix for WalletType {
    fn public_version_prefix(&self, network: Network) -> VersionPrefix {
        match (self, network) {
            (WalletType::P2PKH | WalletType::P2TR, Network::Bitcoin) => VersionPrefix::Xpub,
            (WalletType::P2PKH | WalletType::P2TR, Network::Testnet) => VersionPrefix::Tpub,
            (WalletType::P2WPKH, Network::Bitcoin) => VersionPrefix::Zpub,
            (WalletType::P2WPKH, Network::Testnet) => VersionPrefix::Vpub,
            (WalletType::P2SH_P2WPKH, Network::Bitcoin) => VersionPrefix::Ypub,
            (WalletType::P2SH_P2WPKH, Network::Testnet) => VersionPrefix::Upub
        }
    }

    fn private_version_prefix(&self, network: Network) -> VersionPrefix {
        match (self, network) {
            (WalletType::P2PKH | WalletType::P2TR, Network::Bitcoin) => VersionPrefix::Xprv,
            (WalletType::P2PKH | WalletType::P2TR, Network::Testnet) => VersionPrefix::Tprv,
            (WalletType::P2WPKH, Network::Bitcoin) => VersionPrefix::Zprv,
            (WalletType::P2WPKH, Network::Testnet) => VersionPrefix::Vprv,
            (WalletType::P2SH_P2WPKH, Network::Bitcoin) => VersionPrefix::Yprv,
            (WalletType::P2SH_P2WPKH, Network::Testnet) => VersionPrefix::Uprv
        }
    }
}
