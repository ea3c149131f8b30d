/*
    Module that bundles together the various encoding schemes used in Bitcoin
*/

pub mod bech32;
pub mod bs58check;
pub mod varint;
pub mod version_prefix;
pub use version_prefix::{ToVersionPrefix, VersionPrefix};
