/*
    Signers for each spendable output type.

    A signer computes the sighash an input commits to, signs it, and writes
    the signature into the input's script sig or witness:

        P2PKH           script sig  <sig> <pubkey>
        P2SH multisig   script sig  OP_0 <sig>... <redeem script>
        P2WPKH          witness     <sig> <pubkey>
        P2SH-P2WPKH     script sig  <0014{hash}>, witness <sig> <pubkey>
        P2WSH multisig  witness     <> <sig>... <witness script>
        P2TR key path   witness     <schnorr sig>

    ECDSA signatures are DER encoded with the SIGHASH_ALL byte appended.
    Multisig inputs are signed one key at a time, in the order the keys
    appear in the script, and closed by appending the script once enough
    signatures are present.
*/

pub mod legacy;
pub mod segwit;
pub mod taproot;

pub use legacy::{append_redeem_script, partial_sign_p2sh, sign_p2pkh};
pub use segwit::{append_witness_script, partial_sign_p2wsh, sign_p2sh_p2wpkh, sign_p2wpkh};
pub use taproot::{sign_p2tr, sign_p2tr_with_aux};

use crate::{
    ecdsa,
    error::{Error, Result},
    key::PrivKey,
    script::Script,
    transaction::SIGHASH_ALL
};

/// Signs a sighash and encodes it the way script sigs and witnesses carry it
pub fn generate_signature(key: &PrivKey, sighash: &[u8; 32]) -> Result<Vec<u8>> {
    let signature = ecdsa::sign(key, sighash)?;
    let mut der = signature.der();
    der.push(SIGHASH_ALL);
    Ok(der)
}

/// Signatures needed by a multisig script
fn required_signatures(script: &Script) -> Result<usize> {
    script.multisig_threshold()
        .map(|(m, _)| m)
        .ok_or_else(|| Error::MalformedScript("not a multisig script".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_carries_sighash_type() -> Result<()> {
        let key = PrivKey::from_u64(8675309)?;
        let sighash = [7u8; 32];
        let signature = generate_signature(&key, &sighash)?;

        assert_eq!(signature.last(), Some(&SIGHASH_ALL));
        let parsed = ecdsa::Signature::from_der(&signature[..signature.len() - 1])?;
        assert!(ecdsa::verify(key.public_key(), &sighash, &parsed));
        Ok(())
    }

    #[test]
    fn threshold_of_non_multisig() {
        let script = Script::p2pkh(&[0u8; 20]);
        assert!(matches!(required_signatures(&script), Err(Error::MalformedScript(_))));
    }
}
