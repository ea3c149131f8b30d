/*
    Signers for segwit version 0 inputs: P2WPKH, P2WPKH nested in P2SH,
    and P2WSH multisig. All commit to the BIP143 sighash, so the amount
    of the spent output must be supplied.
*/

use crate::{
    error::{Error, Result},
    key::PrivKey,
    script::Script,
    signer::{generate_signature, required_signatures},
    transaction::{SegwitV0Context, Transaction, Witness}
};
use tracing::debug;

/// Witness <sig> <pubkey> over the P2PKH script code of the key
fn key_hash_witness(
    tx: &Transaction,
    context: &SegwitV0Context,
    index: usize,
    key: &PrivKey,
    amount: u64
) -> Result<Witness> {
    let public_key = key.public_key();
    let script_code = Script::p2pkh(&public_key.hash160());
    let sighash = context.sighash(tx, index, &script_code, amount)?;
    let signature = generate_signature(key, &sighash)?;

    Ok(Witness::from_items(vec![signature, public_key.compressed_bytes().to_vec()]))
}

/// Signs an input spending a P2WPKH output of `amount` satoshis
pub fn sign_p2wpkh(
    tx: &mut Transaction,
    context: &SegwitV0Context,
    index: usize,
    key: &PrivKey,
    amount: u64
) -> Result<()> {
    let witness = key_hash_witness(tx, context, index, key, amount)?;

    tx.input_mut(index)?.witness = witness;
    tx.segwit = true;
    debug!(index, "signed p2wpkh input");
    Ok(())
}

/**
    Signs an input spending a P2SH-P2WPKH output. The script sig pushes the
    0014{hash160} redeem script and the witness is the same as for P2WPKH.
*/
pub fn sign_p2sh_p2wpkh(
    tx: &mut Transaction,
    context: &SegwitV0Context,
    index: usize,
    key: &PrivKey,
    amount: u64
) -> Result<()> {
    let witness = key_hash_witness(tx, context, index, key, amount)?;
    let redeem_script = Script::p2wpkh(&key.public_key().hash160());

    let input = tx.input_mut(index)?;
    input.script_sig = Script::empty();
    input.script_sig.push_data(&redeem_script.raw_serialize());
    input.witness = witness;
    tx.segwit = true;
    debug!(index, "signed p2sh-p2wpkh input");
    Ok(())
}

/**
    Adds one signature to an input spending a P2WSH multisig output.
    The first signature is preceded by an empty item for CHECKMULTISIG to pop.
*/
pub fn partial_sign_p2wsh(
    tx: &mut Transaction,
    context: &SegwitV0Context,
    index: usize,
    key: &PrivKey,
    witness_script: &Script,
    amount: u64
) -> Result<()> {
    required_signatures(witness_script)?;

    let sighash = context.sighash(tx, index, witness_script, amount)?;
    let signature = generate_signature(key, &sighash)?;

    let witness = &mut tx.input_mut(index)?.witness;
    if witness.is_empty() {
        witness.push(&[]);
    }
    witness.push(&signature);
    tx.segwit = true;

    debug!(index, "added p2wsh multisig signature");
    Ok(())
}

/// Closes a P2WSH multisig witness with the witness script
pub fn append_witness_script(tx: &mut Transaction, index: usize, witness_script: &Script) -> Result<()> {
    let required = required_signatures(witness_script)?;

    let witness = &mut tx.input_mut(index)?.witness;
    let raw = witness_script.raw_serialize();
    if witness.items().last() == Some(&raw) {
        return Err(Error::MalformedScript("witness script already appended".to_string()))
    }
    let found = witness.items().iter().filter(|item| !item.is_empty()).count();
    if found < required {
        return Err(Error::IncompleteMultisig { required, found })
    }

    witness.push(&raw);
    tx.segwit = true;
    debug!(index, signatures = found, "appended witness script");
    Ok(())
}
