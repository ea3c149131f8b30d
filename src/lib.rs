/*
    Library to sign Bitcoin transactions from first principles.

    Covers secp256k1 arithmetic, ECDSA (RFC6979, low-S) and BIP340 Schnorr
    signatures, BIP32 hierarchical keys, the transaction wire format and the
    legacy, BIP143 and BIP341 signature hashes, and signers for P2PKH,
    P2SH multisig, P2WPKH, P2SH-P2WPKH, P2WSH multisig and P2TR key path
    inputs.

    Not for use with the bitcoin main network.

    References:
        - The Bitcoin Book (https://github.com/bitcoinbook/bitcoinbook/)
            most of the general concepts come from here

        - learn me a bitcoin (https://learnmeabitcoin.com/)
            for great visualisation of the concepts inroduced in the book

        - BIPs 32, 67, 143, 340 and 341 (https://github.com/bitcoin/bips)
*/

//Outward facing modules
pub mod key;
pub mod ecdsa;
pub mod schnorr;
pub mod taproot;
pub mod address;
pub mod hdwallet;
pub mod script;
pub mod transaction;
pub mod signer;
pub mod prelude;

//Building blocks
pub mod curve;
pub mod encoding;
pub mod error;
pub mod hash;
pub mod util;

pub use error::{Error, Result};
