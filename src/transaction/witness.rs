use crate::{
    encoding::varint,
    error::{Error, Result},
    transaction::Serializable
};
use std::io::{self, Read, Write};

/// Witness stack of a single input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Witness {
    items: Vec<Vec<u8>>
}

impl Witness {
    pub fn new() -> Self {
        Self { items: vec![] }
    }

    pub fn from_items(items: Vec<Vec<u8>>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[Vec<u8>] {
        &self.items
    }

    pub fn push(&mut self, item: &[u8]) {
        self.items.push(item.to_vec());
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item count followed by each length prefixed item
    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = varint::to_bytes(self.items.len() as u64);
        for item in &self.items {
            bytes.extend_from_slice(&varint::length_prefixed(item));
        }
        bytes
    }
}

impl Serializable<Witness> for Witness {
    fn read(reader: &mut dyn Read) -> Result<Witness> {
        let count = varint::read(reader)?;
        let mut items = vec![];
        for _ in 0..count {
            let len = varint::read(reader)?;
            let mut item = vec![];
            let read = (&mut *reader).take(len).read_to_end(&mut item)?;
            if read as u64 != len {
                return Err(Error::MalformedTransaction("truncated witness item".to_string()))
            }
            items.push(item);
        }
        Ok(Witness { items })
    }

    fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        writer.write_all(&self.serialize())
    }
}
