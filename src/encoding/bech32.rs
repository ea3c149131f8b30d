/*
    Segwit address encoding (BIP173 and BIP350).

    Version 0 witness programs use Bech32, version 1 and up use Bech32m.
*/

use crate::{
    error::{Error, Result},
    util::Network
};
use bech32::{u5, FromBase32, ToBase32, Variant};

fn variant_for(witness_version: u8) -> Variant {
    if witness_version == 0 { Variant::Bech32 } else { Variant::Bech32m }
}

fn check_program(witness_version: u8, program: &[u8]) -> Result<()> {
    if witness_version > 16 {
        return Err(Error::InvalidAddress(format!("witness version {} is out of range", witness_version)))
    }
    if program.len() < 2 || program.len() > 40 {
        return Err(Error::InvalidAddress(format!("witness program of {} bytes", program.len())))
    }
    if witness_version == 0 && program.len() != 20 && program.len() != 32 {
        return Err(Error::InvalidAddress(format!("v0 witness program of {} bytes", program.len())))
    }
    Ok(())
}

/**
    Encodes a witness program as a segwit address.

    The program is a pubkey hash (p2wpkh), a script hash (p2wsh)
    or a tweaked x-only key (p2tr).
*/
pub fn encode(witness_version: u8, program: &[u8], network: Network) -> Result<String> {
    check_program(witness_version, program)?;

    let mut data = vec![u5::try_from_u8(witness_version)?];
    data.extend(program.to_base32());

    Ok(bech32::encode(network.bech32_hrp(), data, variant_for(witness_version))?)
}

/**
    Decodes a segwit address into its network, witness version and program.
*/
pub fn decode(address: &str) -> Result<(Network, u8, Vec<u8>)> {
    let (hrp, data, variant) = bech32::decode(address)?;
    let network = Network::from_bech32_hrp(&hrp)?;

    let (version, program) = match data.split_first() {
        Some((version, program)) => (version.to_u8(), Vec::<u8>::from_base32(program)?),
        None => return Err(Error::InvalidAddress("empty data part".to_string()))
    };

    if variant != variant_for(version) {
        return Err(Error::InvalidAddress(format!("wrong checksum variant for witness version {}", version)))
    }
    check_program(version, &program)?;

    Ok((network, version, program))
}
