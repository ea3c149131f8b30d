/*
    Key path signer for P2TR inputs.

    The output key commits to the internal key with no script tree, so
    the internal private key is tweaked before signing. The witness is the
    bare 64 byte signature, SIGHASH_DEFAULT adds no type byte.
*/

use crate::{
    error::Result,
    key::PrivKey,
    schnorr::{self, SchnorrSignature},
    taproot::TapTweak,
    transaction::{TaprootContext, Transaction, Witness}
};
use tracing::debug;

/// Signs a P2TR input with auxiliary randomness from the operating system
pub fn sign_p2tr(tx: &mut Transaction, context: &TaprootContext, index: usize, internal_key: &PrivKey) -> Result<()> {
    sign_with(tx, context, index, internal_key, schnorr::sign_random)
}

/// Signs a P2TR input with caller supplied auxiliary randomness, for reproducible signatures
pub fn sign_p2tr_with_aux(
    tx: &mut Transaction,
    context: &TaprootContext,
    index: usize,
    internal_key: &PrivKey,
    aux_rand: &[u8; 32]
) -> Result<()> {
    sign_with(tx, context, index, internal_key, |key, sighash| schnorr::sign(key, sighash, aux_rand))
}

fn sign_with<F>(tx: &mut Transaction, context: &TaprootContext, index: usize, internal_key: &PrivKey, sign: F) -> Result<()>
where F: FnOnce(&PrivKey, &[u8; 32]) -> Result<SchnorrSignature>
{
    let sighash = context.key_path_sighash(tx, index)?;
    let tweaked = internal_key.tap_tweak(None)?;
    let signature = sign(&tweaked, &sighash)?;

    tx.input_mut(index)?.witness = Witness::from_items(vec![signature.to_bytes().to_vec()]);
    tx.segwit = true;
    debug!(index, "signed p2tr key path input");
    Ok(())
}
