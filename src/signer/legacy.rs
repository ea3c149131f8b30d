/*
    Signers for inputs spending P2PKH and P2SH multisig outputs.
    Both commit to the legacy sighash.
*/

use crate::{
    error::{Error, Result},
    hash::hash160,
    key::PrivKey,
    script::{opcodes, Command, Script},
    signer::{generate_signature, required_signatures},
    transaction::{legacy_sighash, Transaction}
};
use tracing::debug;

/// P2PKH unlock script, <sig> <pubkey>
pub fn create_unlock_script(sig: &[u8], public_key: &[u8]) -> Script {
    let mut script = Script::empty();
    script.push_data(sig);
    script.push_data(public_key);
    script
}

/**
    Signs an input spending a P2PKH output.
    `compressed` selects the public key encoding the output's hash was built from.
*/
pub fn sign_p2pkh(tx: &mut Transaction, index: usize, key: &PrivKey, compressed: bool) -> Result<()> {
    let public_key = if compressed {
        key.public_key().compressed_bytes().to_vec()
    } else {
        key.public_key().decompressed_bytes().to_vec()
    };

    let sighash = legacy_sighash(tx, index, &Script::p2pkh(&hash160(&public_key)))?;
    let signature = generate_signature(key, &sighash)?;

    tx.input_mut(index)?.script_sig = create_unlock_script(&signature, &public_key);
    debug!(index, "signed p2pkh input");
    Ok(())
}

/**
    Adds one signature to an input spending a P2SH multisig output.
    The first signature is preceded by the OP_0 that CHECKMULTISIG pops.
*/
pub fn partial_sign_p2sh(tx: &mut Transaction, index: usize, key: &PrivKey, redeem_script: &Script) -> Result<()> {
    required_signatures(redeem_script)?;

    let sighash = legacy_sighash(tx, index, redeem_script)?;
    let signature = generate_signature(key, &sighash)?;

    let script_sig = &mut tx.input_mut(index)?.script_sig;
    if script_sig.is_empty() {
        script_sig.push_opcode(opcodes::OP_0);
    }
    script_sig.push_data(&signature);

    debug!(index, "added p2sh multisig signature");
    Ok(())
}

/// Closes a P2SH multisig script sig with the redeem script
pub fn append_redeem_script(tx: &mut Transaction, index: usize, redeem_script: &Script) -> Result<()> {
    let required = required_signatures(redeem_script)?;

    let script_sig = &mut tx.input_mut(index)?.script_sig;
    let raw = redeem_script.raw_serialize();
    if matches!(script_sig.commands().last(), Some(Command::Data(last)) if *last == raw) {
        return Err(Error::MalformedScript("redeem script already appended".to_string()))
    }
    let found = script_sig.commands().iter()
        .filter(|command| matches!(command, Command::Data(_)))
        .count();
    if found < required {
        return Err(Error::IncompleteMultisig { required, found })
    }

    script_sig.push_data(&raw);
    debug!(index, signatures = found, "appended redeem script");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        address::Address,
        transaction::{OutPoint, TransactionInput, TransactionOutput}
    };
    use std::str::FromStr;

    //Pads a short secret to a full 32 byte key
    fn key(secret: &str) -> PrivKey {
        let bytes = hex::decode(secret).unwrap();
        let mut padded = [0u8; 32];
        padded[32 - bytes.len()..].copy_from_slice(&bytes);
        PrivKey::from_slice(&padded).unwrap()
    }

    #[test]
    fn p2pkh() -> Result<()> {
        let mut tx = Transaction::from_hex("010000000199a24308080ab26e6fb65c4eccfadf76749bb5bfa8cb08f291320b3c21e56f0d0d00000000ffffffff02408af701000000001976a914d52ad7ca9b3d096a38e752c2018e6fbc40cdf26f88ac80969800000000001976a914507b27411ccf7f16f10297de6cef3f291623eddf88ac00000000")?;
        sign_p2pkh(&mut tx, 0, &PrivKey::from_u64(8675309)?, true)?;

        assert_eq!(
            tx.to_hex(),
            "010000000199a24308080ab26e6fb65c4eccfadf76749bb5bfa8cb08f291320b3c21e56f0d0d0000006b4830450221008ed46aa2cf12d6d81065bfabe903670165b538f65ee9a3385e6327d80c66d3b502203124f804410527497329ec4715e18558082d489b218677bd029e7fa306a72236012103935581e52c354cd2f484fe8ed83af7a3097005b2f9c60bff71d35bd795f54b67ffffffff02408af701000000001976a914d52ad7ca9b3d096a38e752c2018e6fbc40cdf26f88ac80969800000000001976a914507b27411ccf7f16f10297de6cef3f291623eddf88ac00000000"
        );
        assert_eq!(sign_p2pkh(&mut tx, 1, &PrivKey::from_u64(8675309)?, true), Err(Error::InputIndexOutOfRange(1)));
        Ok(())
    }

    #[test]
    fn p2pkh_uncompressed() -> Result<()> {
        let mut tx = Transaction::from_hex("010000000199a24308080ab26e6fb65c4eccfadf76749bb5bfa8cb08f291320b3c21e56f0d0d00000000ffffffff02408af701000000001976a914d52ad7ca9b3d096a38e752c2018e6fbc40cdf26f88ac80969800000000001976a914507b27411ccf7f16f10297de6cef3f291623eddf88ac00000000")?;
        sign_p2pkh(&mut tx, 0, &PrivKey::from_u64(8675309)?, false)?;

        match tx.inputs[0].script_sig.commands() {
            [Command::Data(_), Command::Data(public_key)] => assert_eq!(public_key.len(), 65),
            commands => panic!("unexpected script sig {:?}", commands)
        }
        Ok(())
    }

    #[test]
    fn one_of_two() -> Result<()> {
        let key1 = key("909f2d6fc6564407b73743b6871b70d9");
        let key2 = key("3ab974f2e02e4275beb4e2440794d1ec");
        let redeem_script = Script::multisig(1, &[key1.public_key().clone(), key2.public_key().clone()])?;

        let input = TransactionInput::new(
            OutPoint::from_hex("0f0e64bc96a42058e7fc0c172de37f12bdae1c276c16647a316adcf39248b850", 0)?,
            0xffffffff
        );
        let destination = Address::from_str("tb1q63rv8027mnhszkmf0f5qkxhk48r9tcyk0n6m8l")?;
        let output = TransactionOutput::new(55_000, destination.script_pubkey());
        let mut tx = Transaction::new(1, vec![input], vec![output], 0, false);

        partial_sign_p2sh(&mut tx, 0, &key1, &redeem_script)?;
        append_redeem_script(&mut tx, 0, &redeem_script)?;

        assert_eq!(
            tx.to_hex(),
            "010000000150b84892f3dc6a317a64166c271caebd127fe32d170cfce75820a496bc640e0f000000009200483045022100a3b4c518ecdb0efd35bad65bb996c8840af7e503591e82acfc43c532c0fa2ccb02201f40a76927313f3b5d15404929631074cd95c5d2e1885a65604864658b649f6701475121032fb2f3c4acd2e02679d5c0e0222755da7651581b021aa338a34746b7315a2ead2102e589e0d78882525b40186bed65b3c8285e649bbb05321c4e8e2deae0adf085ce52aeffffffff01d8d6000000000000160014d446c3bd5edcef015b697a680b1af6a9c655e09600000000"
        );
        Ok(())
    }

    const TWO_OF_TWO_SIGNED: &str = "0100000001e3fa96238b5e17c5092cf6be70379472bbaf2f1f47312a0e0a23f90ddc243b0900000000da00473044022007de61705591da6a052eb0f8d81c6aaa7f6f9e3221f02888385a97dddfec54a702201890610422899a7256bd152ed3587c1905ba84bd3e91a9babd31be2d311fb9d001483045022100bec53fff656f7a7f5c37c88cb520d3bfd20ad9ec91b39a11bbee820dbda2fa1302205a31a2599fadeb456f08990373364e7bf18be303ad36a42a7b4c3df6f19e3bcd0147522103180f6fd4ef4f0af7031d26112c58cd5d9afb6ced783c51dc10f4ec5ef16345322102f80764440872c6d3e7cd81e41082ac53d2c8e4beb5b6dc8f98584024f75eb8f552aeffffffff0180bb000000000000160014d446c3bd5edcef015b697a680b1af6a9c655e09600000000";

    fn two_of_two() -> Result<(PrivKey, PrivKey, Script)> {
        let key1 = key("f06812134dcf4ce5bb0dabd7718b1528");
        let key2 = key("ad7abc3d183d499392cc43a12561c924");
        let redeem_script = Script::multisig(2, &[key1.public_key().clone(), key2.public_key().clone()])?;
        Ok((key1, key2, redeem_script))
    }

    #[test]
    fn two_of_two_from_unsigned() -> Result<()> {
        let (key1, key2, redeem_script) = two_of_two()?;
        let mut tx = Transaction::from_hex("0100000001e3fa96238b5e17c5092cf6be70379472bbaf2f1f47312a0e0a23f90ddc243b090000000000ffffffff0180bb000000000000160014d446c3bd5edcef015b697a680b1af6a9c655e09600000000")?;

        partial_sign_p2sh(&mut tx, 0, &key1, &redeem_script)?;
        assert_eq!(
            append_redeem_script(&mut tx.clone(), 0, &redeem_script),
            Err(Error::IncompleteMultisig { required: 2, found: 1 })
        );
        partial_sign_p2sh(&mut tx, 0, &key2, &redeem_script)?;
        append_redeem_script(&mut tx, 0, &redeem_script)?;

        assert_eq!(tx.to_hex(), TWO_OF_TWO_SIGNED);
        assert!(matches!(append_redeem_script(&mut tx, 0, &redeem_script), Err(Error::MalformedScript(_))));
        assert_eq!(tx.to_hex(), TWO_OF_TWO_SIGNED);
        Ok(())
    }

    #[test]
    fn two_of_two_from_partially_signed() -> Result<()> {
        //Already carries the first key's signature
        let (_, key2, redeem_script) = two_of_two()?;
        let mut tx = Transaction::from_hex("0100000001e3fa96238b5e17c5092cf6be70379472bbaf2f1f47312a0e0a23f90ddc243b09000000004900473044022007de61705591da6a052eb0f8d81c6aaa7f6f9e3221f02888385a97dddfec54a702201890610422899a7256bd152ed3587c1905ba84bd3e91a9babd31be2d311fb9d001ffffffff0180bb000000000000160014d446c3bd5edcef015b697a680b1af6a9c655e09600000000")?;

        partial_sign_p2sh(&mut tx, 0, &key2, &redeem_script)?;
        append_redeem_script(&mut tx, 0, &redeem_script)?;

        assert_eq!(tx.to_hex(), TWO_OF_TWO_SIGNED);
        Ok(())
    }

    #[test]
    fn redeem_script_must_be_multisig() -> Result<()> {
        let mut tx = Transaction::from_hex("0100000001e3fa96238b5e17c5092cf6be70379472bbaf2f1f47312a0e0a23f90ddc243b090000000000ffffffff0180bb000000000000160014d446c3bd5edcef015b697a680b1af6a9c655e09600000000")?;
        let not_multisig = Script::p2pkh(&[1u8; 20]);

        assert!(partial_sign_p2sh(&mut tx, 0, &PrivKey::from_u64(5)?, &not_multisig).is_err());
        assert!(tx.inputs[0].script_sig.is_empty());
        Ok(())
    }
}
