/*
    Bitcoin transactions and their consensus wire format.

    A transaction is built (or parsed) once and then only mutated by the
    signers in crate::signer attaching script sigs and witnesses.
*/

pub mod input;
pub mod output;
pub mod sighash;
pub mod witness;

pub use input::{OutPoint, TransactionInput};
pub use output::TransactionOutput;
pub use sighash::{legacy_sighash, SegwitV0Context, TaprootContext, SIGHASH_ALL, SIGHASH_DEFAULT};
pub use witness::Witness;

use crate::{
    encoding::varint,
    error::{Error, Result},
    hash::double_sha256
};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Cursor, Read, Write};

const SEGWIT_MARKER: u8 = 0x00;
const SEGWIT_FLAG: u8 = 0x01;

/// Reads and writes an object from a byte stream
pub trait Serializable<T> {
    /// Reads the object from serialized form
    fn read(reader: &mut dyn Read) -> Result<T>;

    /// Writes the object to serialized form
    fn write(&self, writer: &mut dyn Write) -> io::Result<()>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    pub version: u32,
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    pub locktime: u32,
    /// Serialize with the segwit marker and witness stacks
    pub segwit: bool
}

impl Transaction {
    pub fn new(version: u32, inputs: Vec<TransactionInput>, outputs: Vec<TransactionOutput>, locktime: u32, segwit: bool) -> Self {
        Self { version, inputs, outputs, locktime, segwit }
    }

    /**
        Parses a complete transaction. Bytes left over after the
        locktime are rejected.
    */
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(bytes);
        let tx = Self::read(&mut cursor)?;
        if cursor.position() as usize != bytes.len() {
            return Err(Error::MalformedTransaction(format!(
                "{} trailing bytes", bytes.len() - cursor.position() as usize
            )))
        }

        Ok(tx)
    }

    pub fn from_hex(tx_hex: &str) -> Result<Self> {
        let bytes = hex::decode(tx_hex).map_err(|e| Error::MalformedTransaction(e.to_string()))?;
        Self::parse(&bytes)
    }

    /// Wire serialization, including witness data when the segwit flag is set
    pub fn serialize(&self) -> Vec<u8> {
        self.to_bytes(self.segwit)
    }

    /// Wire serialization without the marker, flag and witnesses
    pub fn serialize_legacy(&self) -> Vec<u8> {
        self.to_bytes(false)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.serialize())
    }

    /**
        The transaction id: double SHA256 of the legacy serialization,
        byte reversed into the order block explorers display.
    */
    pub fn txid(&self) -> [u8; 32] {
        let mut id = double_sha256(self.serialize_legacy());
        id.reverse();
        id
    }

    pub fn input(&self, index: usize) -> Result<&TransactionInput> {
        self.inputs.get(index).ok_or(Error::InputIndexOutOfRange(index))
    }

    pub fn input_mut(&mut self, index: usize) -> Result<&mut TransactionInput> {
        self.inputs.get_mut(index).ok_or(Error::InputIndexOutOfRange(index))
    }

    fn to_bytes(&self, with_witness: bool) -> Vec<u8> {
        let mut bytes = vec![];
        //Writing into a vector does not fail
        let _ = self.write_with(&mut bytes, with_witness);
        bytes
    }

    fn write_with(&self, writer: &mut dyn Write, with_witness: bool) -> io::Result<()> {
        writer.write_u32::<LittleEndian>(self.version)?;
        if with_witness {
            writer.write_u8(SEGWIT_MARKER)?;
            writer.write_u8(SEGWIT_FLAG)?;
        }
        varint::write(self.inputs.len() as u64, writer)?;
        for input in &self.inputs {
            input.write(writer)?;
        }
        varint::write(self.outputs.len() as u64, writer)?;
        for output in &self.outputs {
            output.write(writer)?;
        }
        if with_witness {
            for input in &self.inputs {
                input.witness.write(writer)?;
            }
        }
        writer.write_u32::<LittleEndian>(self.locktime)
    }
}

impl Serializable<Transaction> for Transaction {
    fn read(reader: &mut dyn Read) -> Result<Transaction> {
        let version = reader.read_u32::<LittleEndian>()?;

        //A zero input count is the segwit marker
        let mut n_inputs = varint::read(reader)?;
        let segwit = n_inputs == SEGWIT_MARKER as u64;
        if segwit {
            let flag = reader.read_u8()?;
            if flag != SEGWIT_FLAG {
                return Err(Error::MalformedTransaction(format!("unknown segwit flag {:02x}", flag)))
            }
            n_inputs = varint::read(reader)?;
        }

        let mut inputs = vec![];
        for _ in 0..n_inputs {
            inputs.push(TransactionInput::read(reader)?);
        }
        let n_outputs = varint::read(reader)?;
        let mut outputs = vec![];
        for _ in 0..n_outputs {
            outputs.push(TransactionOutput::read(reader)?);
        }

        if segwit {
            for input in inputs.iter_mut() {
                input.witness = Witness::read(reader)?;
            }
        }
        let locktime = reader.read_u32::<LittleEndian>()?;

        Ok(Transaction { version, inputs, outputs, locktime, segwit })
    }

    fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        self.write_with(writer, self.segwit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::Script;

    const LEGACY_TX: &str = "0100000001813f79011acb80925dfe69b3def355fe914bd1d96a3f5f71bf8303c6a989c7d1000000006b483045022100ed81ff192e75a3fd2304004dcadb746fa5e24c5031ccfcf21320b0277457c98f02207a986d955c6e0cb35d446a89d3f56100f4d7f67801c31967743a9c8e10615bed01210349fc4e631e3624a545de3f89f5d8684c7b8138bd94bdd531d2e213bf016b278afeffffff02a135ef01000000001976a914bc3b654dca7e56b04dca18f2566cdaf02e8d9ada88ac99c39800000000001976a9141c4bc762dd5423e332166702cb75f40df79fea1288ac19430600";
    const SEGWIT_TX: &str = "01000000000101076b57644e155af90f5d9f416b44a3794e0b982c2c427f0845c0e0c62fbb346f0000000000fdffffff0198eb100000000000160014934478b061fa4b5b4dba4f314fb380f3ef77e21902483045022100b7fcf54ae5d7c645b5b44ef7f846e95de9a97a099a447bf8daf14a46f5e3d464022025e709d6794a6fd5b69a7d271fc9a93fcc170b38cfbe5640b6c5d6ec88f021240121025330a1df68c516d32a87ea8ea3da573fa9d86b1b173875beecbf0bdbe45cba8cea7c0a00";

    #[test]
    fn parse_legacy() -> Result<()> {
        let tx = Transaction::from_hex(LEGACY_TX)?;
        assert_eq!(tx.version, 1);
        assert!(!tx.segwit);
        assert_eq!(tx.locktime, 410393);

        assert_eq!(tx.inputs.len(), 1);
        let input = &tx.inputs[0];
        assert_eq!(input.prev_out.txid_hex(), "d1c789a9c60383bf715f3f6ad9d14b91fe55f3deb369fe5d9280cb1a01793f81");
        assert_eq!(input.prev_out.vout, 0);
        assert_eq!(input.sequence, 0xfffffffe);
        assert_eq!(
            hex::encode(input.script_sig.serialize()),
            "6b483045022100ed81ff192e75a3fd2304004dcadb746fa5e24c5031ccfcf21320b0277457c98f02207a986d955c6e0cb35d446a89d3f56100f4d7f67801c31967743a9c8e10615bed01210349fc4e631e3624a545de3f89f5d8684c7b8138bd94bdd531d2e213bf016b278a"
        );

        assert_eq!(tx.outputs.len(), 2);
        assert_eq!(tx.outputs[0].amount, 32454049);
        assert_eq!(hex::encode(tx.outputs[0].script_pubkey.serialize()), "1976a914bc3b654dca7e56b04dca18f2566cdaf02e8d9ada88ac");
        assert_eq!(tx.outputs[1].amount, 10011545);

        assert_eq!(tx.to_hex(), LEGACY_TX);
        Ok(())
    }

    #[test]
    fn parse_segwit() -> Result<()> {
        let tx = Transaction::from_hex(SEGWIT_TX)?;
        assert!(tx.segwit);
        assert_eq!(tx.locktime, 687338);

        let input = &tx.inputs[0];
        assert_eq!(input.prev_out.txid_hex(), "6f34bb2fc6e0c045087f422c2c980b4e79a3446b419f5d0ff95a154e64576b07");
        assert_eq!(input.sequence, 0xfffffffd);
        assert!(input.script_sig.is_empty());
        assert_eq!(
            hex::encode(input.witness.serialize()),
            "02483045022100b7fcf54ae5d7c645b5b44ef7f846e95de9a97a099a447bf8daf14a46f5e3d464022025e709d6794a6fd5b69a7d271fc9a93fcc170b38cfbe5640b6c5d6ec88f021240121025330a1df68c516d32a87ea8ea3da573fa9d86b1b173875beecbf0bdbe45cba8c"
        );
        assert_eq!(tx.outputs[0].amount, 1_108_888);
        assert_eq!(hex::encode(tx.outputs[0].script_pubkey.serialize()), "160014934478b061fa4b5b4dba4f314fb380f3ef77e219");

        assert_eq!(tx.to_hex(), SEGWIT_TX);
        Ok(())
    }

    #[test]
    fn round_trips() -> Result<()> {
        let segwit_v2 = "02000000000101a7d259daff3c5ab82bf79b183ca82b1c30d5803ba238f87cde51b4b4b2d3eee10100000000ffffffff02204e000000000000160014b92e162808d34111cbccfb60ff200df058e4ac415911000000000000160014699e2580a45a56c0916aaceab1fcc41c0d30e4080247304402202aff7cb99e8bda7980a814b8347d48e441844f20548047fb3f348fdf0cf0ee4e02206f0e50e3443f8a9364ebef6412c7e6ad8fff895e7cf1a3f0332b8d7d93053b310121026298c137dd1e07f0ba5fc1f74af934fabea5415e9c2632b4cc100abbdf080d4000000000";
        //OP_RETURN output pushed with OP_PUSHDATA1
        let non_minimal = format!("0100000001{}0000000000ffffffff010000000000000000066a4c03aabbcc00000000", "11".repeat(32));
        for tx_hex in [LEGACY_TX, SEGWIT_TX, segwit_v2, non_minimal.as_str()] {
            let tx = Transaction::from_hex(tx_hex)?;
            assert_eq!(Transaction::parse(&tx.serialize())?, tx);
            assert_eq!(tx.to_hex(), tx_hex);
        }
        Ok(())
    }

    #[test]
    fn txid() -> Result<()> {
        let tx = Transaction::from_hex(LEGACY_TX)?;
        assert_eq!(hex::encode(tx.txid()), "452c629d67e41baec3ac6f04fe744b4b9617f8f859c63b3002f8684e7a4fee03");

        //Witness data does not change the id
        let segwit = Transaction::from_hex(SEGWIT_TX)?;
        let mut stripped = segwit.clone();
        stripped.segwit = false;
        assert_eq!(segwit.txid(), stripped.txid());
        assert_ne!(segwit.serialize(), stripped.serialize());
        Ok(())
    }

    #[test]
    fn builds_unsigned() -> Result<()> {
        //Pays 1,000,000 sats to 3QJmV3qfvL9SuYo34YihAf3sRCW3qSinyC
        let mut hash = [0u8; 20];
        hash.copy_from_slice(&hex::decode("f815b036d9bbbce5e9f2a00abd1bf3dc91e95510").unwrap());

        let input = TransactionInput::new(
            OutPoint::from_hex("d6f72aab8ff86ff6289842a0424319bf2ddba85dc7c52757912297f948286389", 0)?,
            0xffffffff
        );
        let output = TransactionOutput::new(1_000_000, Script::p2sh(&hash));
        let tx = Transaction::new(1, vec![input], vec![output], 0, false);

        assert_eq!(
            tx.to_hex(),
            "010000000189632848f99722915727c5c75da8db2dbf194342a0429828f66ff88fab2af7d60000000000ffffffff0140420f000000000017a914f815b036d9bbbce5e9f2a00abd1bf3dc91e955108700000000"
        );
        Ok(())
    }

    #[test]
    fn rejects_malformed() {
        //Truncated locktime
        assert!(matches!(
            Transaction::from_hex(&LEGACY_TX[..LEGACY_TX.len() - 2]),
            Err(Error::MalformedTransaction(_))
        ));
        //Trailing byte
        assert!(matches!(
            Transaction::from_hex(&format!("{}00", LEGACY_TX)),
            Err(Error::MalformedTransaction(_))
        ));
        //Marker followed by an unknown flag
        assert!(matches!(
            Transaction::from_hex("010000000002"),
            Err(Error::MalformedTransaction(_))
        ));
        //Script length far past the end of the input
        assert!(matches!(
            Transaction::from_hex(&format!("0100000001{}00000000ffffffffffffffffff", "11".repeat(32))),
            Err(Error::MalformedTransaction(_))
        ));
        assert!(Transaction::from_hex("zz").is_err());
    }

    #[test]
    fn input_lookup() -> Result<()> {
        let mut tx = Transaction::from_hex(LEGACY_TX)?;
        assert!(tx.input(0).is_ok());
        assert_eq!(tx.input(1), Err(Error::InputIndexOutOfRange(1)));
        assert_eq!(tx.input_mut(3).map(|_| ()), Err(Error::InputIndexOutOfRange(3)));
        Ok(())
    }
}
