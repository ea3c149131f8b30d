/*
    Signature hash algorithms.

    Three generations are supported, each committing to a different view of
    the spending transaction:
        - legacy, for P2PKH and bare/P2SH scripts
        - BIP143, for segwit version 0 outputs
        - BIP341, for taproot key path spends

    Only SIGHASH_ALL (and for taproot SIGHASH_DEFAULT) is implemented.
    The per-transaction intermediates of BIP143 and BIP341 are computed once
    into immutable contexts that can be shared across inputs and threads.
    A context is only valid while the inputs and outputs it was built from
    are left unchanged.
*/

use crate::{
    error::{Error, Result},
    hash::{double_sha256, sha256},
    script::Script,
    taproot::{TapSighashHash, TaprootTaggedHash},
    transaction::{Serializable, Transaction, TransactionOutput}
};
use byteorder::{LittleEndian, WriteBytesExt};

/// Signs all inputs and outputs.
pub const SIGHASH_ALL: u8 = 0x01;
/// Taproot only, signs the same data as SIGHASH_ALL without a trailing type byte.
pub const SIGHASH_DEFAULT: u8 = 0x00;

const TAPROOT_EPOCH: u8 = 0x00;
const KEY_PATH_SPEND: u8 = 0x00;

/**
    Legacy sighash of an input.

    The transaction is copied with the script sig of the signed input
    replaced by the script code and every other script sig emptied, then
    double hashed with the 4 byte sighash type appended.
*/
pub fn legacy_sighash(tx: &Transaction, index: usize, script_code: &Script) -> Result<[u8; 32]> {
    tx.input(index)?;

    let mut copy = tx.clone();
    copy.segwit = false;
    for (i, input) in copy.inputs.iter_mut().enumerate() {
        input.script_sig = if i == index { script_code.clone() } else { Script::empty() };
    }

    let mut preimage = copy.serialize_legacy();
    preimage.write_u32::<LittleEndian>(SIGHASH_ALL as u32)?;
    Ok(double_sha256(preimage))
}

/// BIP143 intermediates of a transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegwitV0Context {
    hash_prevouts: [u8; 32],
    hash_sequence: [u8; 32],
    hash_outputs: [u8; 32]
}

impl SegwitV0Context {
    pub fn new(tx: &Transaction) -> Self {
        let mut prevouts = Vec::with_capacity(36 * tx.inputs.len());
        let mut sequences = Vec::with_capacity(4 * tx.inputs.len());
        for input in &tx.inputs {
            prevouts.extend_from_slice(&input.prev_out.to_bytes());
            sequences.extend_from_slice(&input.sequence.to_le_bytes());
        }
        let outputs: Vec<u8> = tx.outputs.iter().flat_map(TransactionOutput::serialize).collect();

        Self {
            hash_prevouts: double_sha256(prevouts),
            hash_sequence: double_sha256(sequences),
            hash_outputs: double_sha256(outputs)
        }
    }

    /**
        BIP143 sighash of an input spending `amount` satoshis.
        For P2WPKH the script code is the P2PKH script of the key hash,
        for P2WSH it is the witness script.
    */
    pub fn sighash(&self, tx: &Transaction, index: usize, script_code: &Script, amount: u64) -> Result<[u8; 32]> {
        let input = tx.input(index)?;

        let mut s = Vec::with_capacity(200);
        s.write_u32::<LittleEndian>(tx.version)?;
        s.extend_from_slice(&self.hash_prevouts);
        s.extend_from_slice(&self.hash_sequence);
        input.prev_out.write(&mut s)?;
        s.extend_from_slice(&script_code.serialize());
        s.write_u64::<LittleEndian>(amount)?;
        s.write_u32::<LittleEndian>(input.sequence)?;
        s.extend_from_slice(&self.hash_outputs);
        s.write_u32::<LittleEndian>(tx.locktime)?;
        s.write_u32::<LittleEndian>(SIGHASH_ALL as u32)?;

        Ok(double_sha256(s))
    }
}

/**
    BIP341 intermediates of a transaction. Unlike segwit v0, taproot
    signatures commit to the amount and script pubkey of every spent output,
    so they must be supplied for all inputs in order.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaprootContext {
    sha_prevouts: [u8; 32],
    sha_amounts: [u8; 32],
    sha_scriptpubkeys: [u8; 32],
    sha_sequences: [u8; 32],
    sha_outputs: [u8; 32]
}

impl TaprootContext {
    pub fn new(tx: &Transaction, spent: &[TransactionOutput]) -> Result<Self> {
        if spent.len() != tx.inputs.len() {
            return Err(Error::PrevoutCountMismatch { expected: tx.inputs.len(), found: spent.len() })
        }

        let mut prevouts = vec![];
        let mut sequences = vec![];
        for input in &tx.inputs {
            prevouts.extend_from_slice(&input.prev_out.to_bytes());
            sequences.extend_from_slice(&input.sequence.to_le_bytes());
        }
        let mut amounts = vec![];
        let mut scriptpubkeys = vec![];
        for output in spent {
            amounts.extend_from_slice(&output.amount.to_le_bytes());
            scriptpubkeys.extend_from_slice(&output.script_pubkey.serialize());
        }
        let outputs: Vec<u8> = tx.outputs.iter().flat_map(TransactionOutput::serialize).collect();

        Ok(Self {
            sha_prevouts: sha256(prevouts),
            sha_amounts: sha256(amounts),
            sha_scriptpubkeys: sha256(scriptpubkeys),
            sha_sequences: sha256(sequences),
            sha_outputs: sha256(outputs)
        })
    }

    /// SIGHASH_DEFAULT key path sighash of an input, without an annex
    pub fn key_path_sighash(&self, tx: &Transaction, index: usize) -> Result<[u8; 32]> {
        tx.input(index)?;
        let index = u32::try_from(index).map_err(|_| Error::InputIndexOutOfRange(index))?;

        let mut m = Vec::with_capacity(175);
        m.write_u8(TAPROOT_EPOCH)?;
        m.write_u8(SIGHASH_DEFAULT)?;
        m.write_u32::<LittleEndian>(tx.version)?;
        m.write_u32::<LittleEndian>(tx.locktime)?;
        m.extend_from_slice(&self.sha_prevouts);
        m.extend_from_slice(&self.sha_amounts);
        m.extend_from_slice(&self.sha_scriptpubkeys);
        m.extend_from_slice(&self.sha_sequences);
        m.extend_from_slice(&self.sha_outputs);
        m.write_u8(KEY_PATH_SPEND)?;
        m.write_u32::<LittleEndian>(index)?;

        Ok(TapSighashHash::from_slice(&m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        key::SchnorrPublicKey,
        transaction::{OutPoint, TransactionInput}
    };
    use std::str::FromStr;

    #[test]
    fn legacy() -> Result<()> {
        let tx = Transaction::from_hex("0100000001813f79011acb80925dfe69b3def355fe914bd1d96a3f5f71bf8303c6a989c7d1000000006b483045022100ed81ff192e75a3fd2304004dcadb746fa5e24c5031ccfcf21320b0277457c98f02207a986d955c6e0cb35d446a89d3f56100f4d7f67801c31967743a9c8e10615bed01210349fc4e631e3624a545de3f89f5d8684c7b8138bd94bdd531d2e213bf016b278afeffffff02a135ef01000000001976a914bc3b654dca7e56b04dca18f2566cdaf02e8d9ada88ac99c39800000000001976a9141c4bc762dd5423e332166702cb75f40df79fea1288ac19430600")?;
        let script_code = Script::parse(&hex::decode("76a914a802fc56c704ce87c42d7c92eb75e7896bdc41ae88ac").unwrap())?;

        assert_eq!(
            hex::encode(legacy_sighash(&tx, 0, &script_code)?),
            "27e0c5994dec7824e56dec6b2fcb342eb7cdb0d0957c2fce9882f715e85d81a6"
        );
        assert_eq!(legacy_sighash(&tx, 1, &script_code), Err(Error::InputIndexOutOfRange(1)));
        Ok(())
    }

    #[test]
    fn segwit_v0() -> Result<()> {
        let tx = Transaction::from_hex("0100000002fff7f7881a8099afa6940d42d1e7f6362bec38171ea3edf433541db4e4ad969f0000000000eeffffffef51e1b804cc89d182d279655c3aa89e815b1b309fe287d9b2b55d57b90ec68a0100000000ffffffff02202cb206000000001976a9148280b37df378db99f66f85c95a783a76ac7a6d5988ac9093510d000000001976a9143bde42dbee7e4dbe6a21b2d50ce2f0167faa815988ac11000000")?;
        let mut hash = [0u8; 20];
        hash.copy_from_slice(&hex::decode("1d0f172a0ecb48aee1be1f2687d2963ae33f71a1").unwrap());

        let context = SegwitV0Context::new(&tx);
        assert_eq!(
            hex::encode(context.sighash(&tx, 1, &Script::p2pkh(&hash), 600_000_000)?),
            "c37af31116d1b27caf68aae9e3ac82f1477929014d5b917657d0eb49478cb670"
        );
        assert_eq!(
            context.sighash(&tx, 2, &Script::p2pkh(&hash), 600_000_000),
            Err(Error::InputIndexOutOfRange(2))
        );
        Ok(())
    }

    fn taproot_spk() -> Script {
        Script::p2tr(&SchnorrPublicKey::from_str("86cd6839f231f3ca3614206f080892ea1d4e2158ca851a49fbb1c8bb72778a55").unwrap())
    }

    fn taproot_tx(version: u32, vouts: &[u32], sequence: u32) -> Transaction {
        let inputs = vouts.iter()
            .map(|&vout| TransactionInput::new(
                OutPoint::from_hex("37f67076d3da37ed0997056f8dde7a971248a68373b67e48095eda5457b77657", vout).unwrap(),
                sequence
            ))
            .collect();
        Transaction::new(version, inputs, vec![TransactionOutput::new(4_000, taproot_spk())], 0, true)
    }

    #[test]
    fn taproot_key_path() -> Result<()> {
        let tx = taproot_tx(1, &[0], 0xffffffff);
        let context = TaprootContext::new(&tx, &[TransactionOutput::new(5_000, taproot_spk())])?;
        assert_eq!(
            hex::encode(context.key_path_sighash(&tx, 0)?),
            "bda2bb6ca7c9502f260e7d8ae8a1ac7f364bc45b4fef4ce7ebf3de8557ea47c9"
        );
        assert_eq!(context.key_path_sighash(&tx, 1), Err(Error::InputIndexOutOfRange(1)));
        Ok(())
    }

    #[test]
    fn taproot_commits_to_input_index() -> Result<()> {
        let tx = taproot_tx(2, &[0, 1], 0xfffffffd);
        let spent = [
            TransactionOutput::new(5_000, taproot_spk()),
            TransactionOutput::new(6_000, taproot_spk())
        ];
        let context = TaprootContext::new(&tx, &spent)?;

        assert_eq!(
            hex::encode(context.key_path_sighash(&tx, 0)?),
            "3942e4e793af089899a8b42ad34dda52aee3483e1f09524411b34abc5700d863"
        );
        assert_eq!(
            hex::encode(context.key_path_sighash(&tx, 1)?),
            "825112a02a0b9ea2aeeb6b89e28805d48a2a9c42735ebb284be9259085c23b0c"
        );
        Ok(())
    }

    #[test]
    fn taproot_needs_every_spent_output() {
        let tx = taproot_tx(2, &[0, 1], 0xfffffffd);
        assert_eq!(
            TaprootContext::new(&tx, &[TransactionOutput::new(5_000, taproot_spk())]),
            Err(Error::PrevoutCountMismatch { expected: 2, found: 1 })
        );
    }

    #[test]
    fn contexts_are_shareable() {
        fn shareable<T: Send + Sync>() {}
        shareable::<SegwitV0Context>();
        shareable::<TaprootContext>();
    }

    #[test]
    fn signing_does_not_change_sighash() -> Result<()> {
        //Script sigs and witnesses are not committed to
        let tx = taproot_tx(2, &[0, 1], 0xfffffffd);
        let mut signed = tx.clone();
        signed.inputs[0].witness.push(&[0xaa; 64]);
        signed.inputs[1].script_sig.push_data(&[0xbb; 10]);

        let code = taproot_spk();
        assert_eq!(
            SegwitV0Context::new(&tx).sighash(&tx, 1, &code, 6_000)?,
            SegwitV0Context::new(&signed).sighash(&signed, 1, &code, 6_000)?
        );
        assert_eq!(legacy_sighash(&tx, 0, &code)?, legacy_sighash(&signed, 0, &code)?);
        Ok(())
    }
}
