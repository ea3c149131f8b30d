/*
    Base58Check encoding.

    Base58( prefix || payload || dsha256(prefix || payload)[0..4] )
*/

use crate::{
    encoding::version_prefix::VersionPrefix,
    error::{Error, Result},
    hash
};

/**
    Returns the Base58Check encoded value of the input data.
    * Prefix is based on use case as defined in the VersionPrefix enum
*/
pub fn check_encode(prefix: VersionPrefix, data: &[u8]) -> String {
    let mut payload = prefix.to_bytes();
    payload.extend_from_slice(data);
    check_encode_raw(&payload)
}

/// Base58Check without a version prefix, the payload carries its own
pub fn check_encode_raw(payload: &[u8]) -> String {
    let mut data = payload.to_vec();
    let checksum = hash::double_sha256(&data);
    data.extend_from_slice(&checksum[0..4]);
    bs58::encode(data).into_string()
}

/**
    Decodes a Base58Check string and verifies its checksum.
    Returns the payload including the version prefix.
*/
pub fn check_decode(encoded: &str) -> Result<Vec<u8>> {
    let mut bytes = bs58::decode(encoded).into_vec()?;
    if bytes.len() < 4 {
        return Err(Error::Base58(format!("{} bytes is too short for a checksum", bytes.len())));
    }

    let checksum_at = bytes.len() - 4;
    let derived = hash::double_sha256(&bytes[..checksum_at]);
    if derived[0..4] != bytes[checksum_at..] {
        return Err(Error::ChecksumMismatch);
    }

    bytes.truncate(checksum_at);
    Ok(bytes)
}
