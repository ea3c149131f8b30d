//! CompactSize variable length integers.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

/// Returns the number of bytes required for the varint.
#[inline]
pub fn size(n: u64) -> usize {
    if n <= 252 {
        1
    } else if n <= 0xffff {
        3
    } else if n <= 0xffffffff {
        5
    } else {
        9
    }
}

/// Writes the var int to bytes.
pub fn write(n: u64, writer: &mut dyn Write) -> io::Result<()> {
    if n <= 252 {
        writer.write_u8(n as u8)
    } else if n <= 0xffff {
        writer.write_u8(0xfd)?;
        writer.write_u16::<LittleEndian>(n as u16)
    } else if n <= 0xffffffff {
        writer.write_u8(0xfe)?;
        writer.write_u32::<LittleEndian>(n as u32)
    } else {
        writer.write_u8(0xff)?;
        writer.write_u64::<LittleEndian>(n)
    }
}

/// Reads a var int from bytes.
pub fn read(reader: &mut dyn Read) -> io::Result<u64> {
    let n0 = reader.read_u8()?;
    match n0 {
        0xff => reader.read_u64::<LittleEndian>(),
        0xfe => reader.read_u32::<LittleEndian>().map(u64::from),
        0xfd => reader.read_u16::<LittleEndian>().map(u64::from),
        _ => Ok(n0 as u64),
    }
}

/// The var int as a byte vector.
pub fn to_bytes(n: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(size(n));
    match size(n) {
        1 => out.push(n as u8),
        3 => {
            out.push(0xfd);
            out.extend_from_slice(&(n as u16).to_le_bytes());
        }
        5 => {
            out.push(0xfe);
            out.extend_from_slice(&(n as u32).to_le_bytes());
        }
        _ => {
            out.push(0xff);
            out.extend_from_slice(&n.to_le_bytes());
        }
    }
    out
}

/// Prefixes the bytes with their length.
pub fn length_prefixed(bytes: &[u8]) -> Vec<u8> {
    let mut out = to_bytes(bytes.len() as u64);
    out.extend_from_slice(bytes);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn boundaries() {
        for (n, encoded) in [
            (0u64, "00"),
            (252, "fc"),
            (253, "fdfd00"),
            (0xffff, "fdffff"),
            (0x10000, "fe00000100"),
            (0x100000000, "ff0000000001000000"),
        ] {
            assert_eq!(hex::encode(to_bytes(n)), encoded);
            assert_eq!(size(n), encoded.len() / 2);

            let mut written = Vec::new();
            write(n, &mut written).unwrap();
            assert_eq!(hex::encode(&written), encoded);
            assert_eq!(read(&mut Cursor::new(written)).unwrap(), n);
        }
    }

    #[test]
    fn truncated_input_fails() {
        assert!(read(&mut Cursor::new(vec![0xfd, 0x01])).is_err());
        assert!(read(&mut Cursor::new(Vec::<u8>::new())).is_err());
    }
}
