use crate::{
    error::{Error, Result},
    script::Script,
    transaction::{Serializable, Witness},
    util::try_into
};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

/// Default sequence, disables locktime and replace-by-fee
pub const SEQUENCE_FINAL: u32 = 0xffffffff;

/**
    Reference to an output of a previous transaction.
    The txid is held in display order and reversed on the wire.
*/
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct OutPoint {
    pub txid: [u8; 32],
    pub vout: u32
}

impl OutPoint {
    /// Size in bytes of a serialized outpoint
    pub const SIZE: usize = 36;

    pub fn new(txid: [u8; 32], vout: u32) -> Self {
        Self { txid, vout }
    }

    pub fn from_hex(txid: &str, vout: u32) -> Result<Self> {
        let bytes = hex::decode(txid).map_err(|e| Error::MalformedTransaction(e.to_string()))?;
        let txid = try_into(&bytes, Error::MalformedTransaction(format!("txid {} is not 32 bytes", txid)))?;
        Ok(Self { txid, vout })
    }

    pub fn txid_hex(&self) -> String {
        hex::encode(self.txid)
    }

    /// The 36 wire bytes, as committed to by the sighash algorithms
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        let mut txid = self.txid;
        txid.reverse();
        bytes[..32].copy_from_slice(&txid);
        bytes[32..].copy_from_slice(&self.vout.to_le_bytes());
        bytes
    }
}

impl Serializable<OutPoint> for OutPoint {
    fn read(reader: &mut dyn Read) -> Result<OutPoint> {
        let mut txid = [0u8; 32];
        reader.read_exact(&mut txid)?;
        txid.reverse();
        let vout = reader.read_u32::<LittleEndian>()?;
        Ok(OutPoint { txid, vout })
    }

    fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        writer.write_all(&self.to_bytes())
    }
}

/// Transaction input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionInput {
    pub prev_out: OutPoint,
    pub script_sig: Script,
    pub sequence: u32,
    /// Empty unless the input spends a segwit output
    pub witness: Witness
}

impl TransactionInput {
    /// An unsigned input with an empty script sig and witness
    pub fn new(prev_out: OutPoint, sequence: u32) -> Self {
        Self {
            prev_out,
            script_sig: Script::empty(),
            sequence,
            witness: Witness::new()
        }
    }
}

impl Serializable<TransactionInput> for TransactionInput {
    fn read(reader: &mut dyn Read) -> Result<TransactionInput> {
        let prev_out = OutPoint::read(reader)?;
        let script_sig = Script::read_from(reader).map_err(|e| match e {
            Error::MalformedScript(reason) => Error::MalformedTransaction(format!("script sig: {}", reason)),
            e => e
        })?;
        let sequence = reader.read_u32::<LittleEndian>()?;

        Ok(TransactionInput { prev_out, script_sig, sequence, witness: Witness::new() })
    }

    fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        self.prev_out.write(writer)?;
        writer.write_all(&self.script_sig.serialize())?;
        writer.write_u32::<LittleEndian>(self.sequence)
    }
}
