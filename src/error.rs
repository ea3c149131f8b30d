/*
    Error type shared by every module of the library.

    Errors are raised where a value is constructed or parsed.
    Only a zero nonce and an invalid BIP32 child are recovered
    from internally, by moving on to the next candidate.
*/

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("value is not a valid field element")]
    InvalidFieldElement,

    #[error("x coordinate is not on the curve")]
    InvalidXCoordinate,

    #[error("point is not on the curve")]
    NotOnCurve,

    #[error("operation is undefined for the point at infinity")]
    PointAtInfinity,

    #[error("nonce is zero")]
    ZeroNonce,

    #[error("produced signature failed verification")]
    SignatureSelfCheckFailed,

    #[error("invalid private key")]
    InvalidPrivateKey,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("invalid signature encoding: {0}")]
    InvalidSignature(String),

    #[error("tweak is out of range")]
    InvalidTweak,

    #[error("no valid child key exists past this index")]
    InvalidChildKey,

    #[error("cannot derive a private or hardened child from a public key")]
    CannotDeriveFromPublic,

    #[error("maximum derivation depth reached")]
    DepthOverflow,

    #[error("child index {0} is out of range")]
    InvalidChildIndex(u32),

    #[error("bad derivation path: {0}")]
    BadPath(String),

    #[error("invalid extended key: {0}")]
    InvalidExtendedKey(String),

    #[error("unknown version prefix {0:02x?}")]
    BadPrefix(Vec<u8>),

    #[error("base58 decode error: {0}")]
    Base58(String),

    #[error("checksum mismatch")]
    ChecksumMismatch,

    #[error("bech32 error: {0}")]
    Bech32(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("malformed script: {0}")]
    MalformedScript(String),

    #[error("malformed transaction: {0}")]
    MalformedTransaction(String),

    #[error("input index {0} is out of range")]
    InputIndexOutOfRange(usize),

    #[error("expected {expected} spent outputs, found {found}")]
    PrevoutCountMismatch { expected: usize, found: usize },

    #[error("multisig needs {required} signatures, found {found}")]
    IncompleteMultisig { required: usize, found: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::MalformedTransaction(e.to_string())
    }
}

impl From<bs58::decode::Error> for Error {
    fn from(e: bs58::decode::Error) -> Self {
        Error::Base58(e.to_string())
    }
}

impl From<bech32::Error> for Error {
    fn from(e: bech32::Error) -> Self {
        match e {
            bech32::Error::InvalidChecksum => Error::ChecksumMismatch,
            e => Error::Bech32(e.to_string()),
        }
    }
}
