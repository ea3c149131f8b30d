use crate::{
    error::{Error, Result},
    script::Script,
    transaction::Serializable
};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

/// Transaction output, an amount in satoshis locked by a script
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionOutput {
    pub amount: u64,
    pub script_pubkey: Script
}

impl TransactionOutput {
    pub fn new(amount: u64, script_pubkey: Script) -> Self {
        Self { amount, script_pubkey }
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = self.amount.to_le_bytes().to_vec();
        bytes.extend_from_slice(&self.script_pubkey.serialize());
        bytes
    }
}

impl Serializable<TransactionOutput> for TransactionOutput {
    fn read(reader: &mut dyn Read) -> Result<TransactionOutput> {
        let amount = reader.read_u64::<LittleEndian>()?;
        let script_pubkey = Script::read_from(reader).map_err(|e| match e {
            Error::MalformedScript(reason) => Error::MalformedTransaction(format!("script pubkey: {}", reason)),
            e => e
        })?;
        Ok(TransactionOutput { amount, script_pubkey })
    }

    fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        writer.write_u64::<LittleEndian>(self.amount)?;
        writer.write_all(&self.script_pubkey.serialize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn output_bytes() -> Result<()> {
        let bytes = hex::decode("a135ef01000000001976a914bc3b654dca7e56b04dca18f2566cdaf02e8d9ada88ac").unwrap();
        let output = TransactionOutput::read(&mut Cursor::new(&bytes))?;
        assert_eq!(output.amount, 32454049);
        assert_eq!(output.serialize(), bytes);
        Ok(())
    }

    #[test]
    fn truncated_script() {
        let bytes = hex::decode("a135ef01000000001976a914bc3b").unwrap();
        assert!(matches!(
            TransactionOutput::read(&mut Cursor::new(&bytes)),
            Err(Error::MalformedTransaction(_))
        ));
    }
}
