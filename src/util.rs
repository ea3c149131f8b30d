use crate::{
    encoding::version_prefix::VersionPrefix,
    error::{Error, Result},
};

/// Network selection for addresses, WIF keys and extended keys
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Network {
    Bitcoin,
    Testnet
}

impl Network {
    /// Version prefix of Base58 P2PKH addresses
    pub fn p2pkh_prefix(&self) -> VersionPrefix {
        match self {
            Network::Bitcoin => VersionPrefix::BTCAddress,
            Network::Testnet => VersionPrefix::BTCTestNetAddress
        }
    }

    /// Version prefix of Base58 P2SH addresses
    pub fn p2sh_prefix(&self) -> VersionPrefix {
        match self {
            Network::Bitcoin => VersionPrefix::P2ScriptAddress,
            Network::Testnet => VersionPrefix::TestnetP2SHAddress
        }
    }

    pub fn wif_prefix(&self) -> VersionPrefix {
        match self {
            Network::Bitcoin => VersionPrefix::PrivateKeyWIF,
            Network::Testnet => VersionPrefix::TestNetPrivateKeyWIF
        }
    }

    /// Human readable part of segwit addresses
    pub fn bech32_hrp(&self) -> &'static str {
        match self {
            Network::Bitcoin => "bc",
            Network::Testnet => "tb"
        }
    }

    pub fn from_bech32_hrp(hrp: &str) -> Result<Self> {
        match hrp {
            "bc" => Ok(Network::Bitcoin),
            "tb" => Ok(Network::Testnet),
            _ => Err(Error::InvalidAddress(format!("unknown hrp {}", hrp)))
        }
    }
}

/**
    Copies a slice into a fixed size array.
    Fails with the given error if the lengths differ.
*/
pub fn try_into<const N: usize>(slice: &[u8], err: Error) -> Result<[u8; N]> {
    slice.try_into().map_err(|_| err)
}

//Converts a big endian byte array to int
pub fn as_u32_be(array: &[u8; 4]) -> u32 {
    u32::from_be_bytes(*array)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_prefixes() {
        assert_eq!(Network::Bitcoin.p2pkh_prefix().to_bytes(), vec![0x00]);
        assert_eq!(Network::Testnet.p2sh_prefix().to_bytes(), vec![0xc4]);
        assert_eq!(Network::Testnet.wif_prefix().to_bytes(), vec![0xef]);
        assert_eq!(Network::from_bech32_hrp("tb"), Ok(Network::Testnet));
        assert!(Network::from_bech32_hrp("ltc").is_err());
    }

    #[test]
    fn fixed_size_copy() {
        let bytes = [1u8, 2, 3, 4];
        assert_eq!(as_u32_be(&try_into::<4>(&bytes, Error::InvalidPublicKey).unwrap()), 0x01020304);
        assert_eq!(try_into::<3>(&bytes, Error::InvalidPublicKey), Err(Error::InvalidPublicKey));
    }
}
