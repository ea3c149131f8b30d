/*
    Bitcoin scripts as an ordered list of commands.

    A command is either an opcode or a data push. The wire bytes are
    kept next to the commands: a parsed script serializes back to the
    exact bytes it was read from, while scripts built from commands
    use minimal push encodings.
*/

pub mod builder;
pub use builder::{opcodes, Builder, Opcode};

use crate::{
    encoding::varint,
    error::{Error, Result},
    hash,
    key::{PubKey, SchnorrPublicKey}
};
use std::{
    hash::{Hash, Hasher},
    io::Read
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    Op(Opcode),
    Data(Vec<u8>)
}

/// Standard output and redeem script templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptType {
    P2PKH,
    P2SH,
    P2WPKH,
    P2WSH,
    P2TR,
    Multisig { m: usize, n: usize },
    NonStandard
}

#[derive(Debug, Clone, Default)]
pub struct Script {
    commands: Vec<Command>,
    raw: Vec<u8>
}

//Two scripts are the same script when their bytes are
impl PartialEq for Script {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for Script {}

impl Hash for Script {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state)
    }
}

impl Script {
    /**
        Create a new instance of self
    */
    pub fn new(commands: Vec<Command>) -> Self {
        let mut raw = vec![];
        for command in &commands {
            push_command_bytes(command, &mut raw);
        }
        Self { commands, raw }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn push_opcode(&mut self, opcode: Opcode) {
        self.push_command(Command::Op(opcode));
    }

    pub fn push_data(&mut self, data: &[u8]) {
        self.push_command(Command::Data(data.to_vec()));
    }

    fn push_command(&mut self, command: Command) {
        push_command_bytes(&command, &mut self.raw);
        self.commands.push(command);
    }

    /**
        Parse raw script bytes, without a length prefix.
        Fails if a push runs past the end of the script.
    */
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let truncated = |i: usize| Error::MalformedScript(format!("push at byte {} runs past the end", i));
        let mut commands = vec![];
        let mut i = 0;

        while i < bytes.len() {
            let start = i;
            let code = bytes[i];
            i += 1;

            let len = match code {
                0x01..=0x4b => code as usize,
                0x4c => {
                    let n = *bytes.get(i).ok_or_else(|| truncated(start))? as usize;
                    i += 1;
                    n
                },
                0x4d => {
                    let n = bytes.get(i..i + 2).ok_or_else(|| truncated(start))?;
                    i += 2;
                    u16::from_le_bytes([n[0], n[1]]) as usize
                },
                0x4e => {
                    let n = bytes.get(i..i + 4).ok_or_else(|| truncated(start))?;
                    i += 4;
                    u32::from_le_bytes([n[0], n[1], n[2], n[3]]) as usize
                },
                _ => {
                    commands.push(Command::Op(Opcode::from(code)));
                    continue
                }
            };

            let data = bytes.get(i..i + len).ok_or_else(|| truncated(start))?;
            commands.push(Command::Data(data.to_vec()));
            i += len;
        }

        Ok(Self { commands, raw: bytes.to_vec() })
    }

    /**
        Read a varint length prefixed script from a stream.
        The buffer grows with the bytes actually read, so a bogus
        length fails on the short read instead of allocating up front.
    */
    pub fn read_from(reader: &mut dyn Read) -> Result<Self> {
        let len = varint::read(reader)?;
        let mut bytes = vec![];
        (&mut *reader).take(len).read_to_end(&mut bytes)?;
        if (bytes.len() as u64) < len {
            return Err(Error::MalformedTransaction(format!("script of {} bytes, only {} left", len, bytes.len())))
        }
        Self::parse(&bytes)
    }

    /// Script bytes without a length prefix
    pub fn raw_serialize(&self) -> Vec<u8> {
        self.raw.clone()
    }

    /// Script bytes with a varint length prefix
    pub fn serialize(&self) -> Vec<u8> {
        varint::length_prefixed(&self.raw_serialize())
    }

    /**
        Hash the script with Hash160
    */
    pub fn hash160(&self) -> [u8; 20] {
        hash::hash160(self.raw_serialize())
    }

    /// SHA256 of the script, the program of a P2WSH output
    pub fn sha256(&self) -> [u8; 32] {
        hash::sha256(self.raw_serialize())
    }

    /// Recognise which standard template the script follows
    pub fn script_type(&self) -> ScriptType {
        use opcodes::*;

        match self.commands.as_slice() {
            [Command::Op(OP_DUP), Command::Op(OP_HASH160), Command::Data(h), Command::Op(OP_EQUALVERIFY), Command::Op(OP_CHECKSIG)]
                if h.len() == 20 => ScriptType::P2PKH,
            [Command::Op(OP_HASH160), Command::Data(h), Command::Op(OP_EQUAL)]
                if h.len() == 20 => ScriptType::P2SH,
            [Command::Op(OP_0), Command::Data(h)] if h.len() == 20 => ScriptType::P2WPKH,
            [Command::Op(OP_0), Command::Data(h)] if h.len() == 32 => ScriptType::P2WSH,
            [Command::Op(OP_PUSHNUM_1), Command::Data(k)] if k.len() == 32 => ScriptType::P2TR,
            _ => match self.multisig_threshold() {
                Some((m, n)) => ScriptType::Multisig { m, n },
                None => ScriptType::NonStandard
            }
        }
    }

    /**
        The (m, n) of an m-of-n CHECKMULTISIG script.

        OP_m <pubkey>... OP_n OP_CHECKMULTISIG with 1 <= m <= n <= 16
    */
    pub fn multisig_threshold(&self) -> Option<(usize, usize)> {
        let (first, rest) = self.commands.split_first()?;
        let (last, rest) = rest.split_last()?;
        let (n_op, keys) = rest.split_last()?;

        if last != &Command::Op(opcodes::OP_CHECKMULTISIG) {
            return None
        }
        let m = match first { Command::Op(op) => op.small_int()? as usize, _ => return None };
        let n = match n_op { Command::Op(op) => op.small_int()? as usize, _ => return None };

        let all_keys = keys.iter().all(|c| matches!(c, Command::Data(k) if k.len() == 33 || k.len() == 65));
        if m == 0 || m > n || n != keys.len() || !all_keys {
            return None
        }
        Some((m, n))
    }

    /// The pushed data following a witness version, for segwit outputs
    pub fn witness_program(&self) -> Option<(u8, &[u8])> {
        match self.commands.as_slice() {
            [Command::Op(version), Command::Data(program)] if (2..=40).contains(&program.len()) => {
                Some((version.small_int()?, program.as_slice()))
            },
            _ => None
        }
    }

    /// P2PKH script pub key
    /// OP_DUP OP_HASH160 <Pubkey Hash> OP_EQUALVERIFY OP_CHECKSIG
    pub fn p2pkh(hash: &[u8; 20]) -> Self {
        Builder::new()
            .push_opcode(opcodes::OP_DUP)
            .push_opcode(opcodes::OP_HASH160)
            .push_slice(hash)
            .push_opcode(opcodes::OP_EQUALVERIFY)
            .push_opcode(opcodes::OP_CHECKSIG)
            .into_script()
    }

    /// P2SH script pub key
    /// OP_HASH160 <Hash160(redeemScript)> OP_EQUAL
    pub fn p2sh(hash: &[u8; 20]) -> Self {
        Builder::new()
            .push_opcode(opcodes::OP_HASH160)
            .push_slice(hash)
            .push_opcode(opcodes::OP_EQUAL)
            .into_script()
    }

    /// P2WPKH script pub key
    /// 0x0014 <20-byte-pubkey-hash>
    pub fn p2wpkh(hash: &[u8; 20]) -> Self {
        Builder::new()
            .push_opcode(opcodes::OP_0)
            .push_slice(hash)
            .into_script()
    }

    /// P2WSH script pub key
    /// 0x0020 <32-byte-script-hash>
    pub fn p2wsh(hash: &[u8; 32]) -> Self {
        Builder::new()
            .push_opcode(opcodes::OP_0)
            .push_slice(hash)
            .into_script()
    }

    /// P2TR script pub key
    /// 0x5120 <32-byte-output-key>
    pub fn p2tr(output_key: &SchnorrPublicKey) -> Self {
        Builder::new()
            .push_opcode(opcodes::OP_PUSHNUM_1)
            .push_slice(&output_key.to_bytes())
            .into_script()
    }

    /// Wraps this script in a P2SH output
    pub fn to_p2sh(&self) -> Self {
        Self::p2sh(&self.hash160())
    }

    /// Wraps this script in a P2WSH output
    pub fn to_p2wsh(&self) -> Self {
        Self::p2wsh(&self.sha256())
    }

    ///Creates the redeem script for a m-of-n multisig wallet
    ///BIP-11, keys are kept in the given order
    pub fn multisig(m: usize, keys: &[PubKey]) -> Result<Self> {
        let n = keys.len();
        if m == 0 || m > n {
            return Err(Error::MalformedScript(format!("{}-of-{} multisig", m, n)))
        }
        let (m_op, n_op) = match (Opcode::pushnum(m as u8), Opcode::pushnum(n as u8)) {
            (Some(m_op), Some(n_op)) if n <= 16 => (m_op, n_op),
            _ => return Err(Error::MalformedScript(format!("multisig with {} keys", n)))
        };

        let mut builder = Builder::new().push_opcode(m_op);
        for key in keys {
            builder = builder.push_slice(&key.compressed_bytes());
        }

        Ok(builder
            .push_opcode(n_op)
            .push_opcode(opcodes::OP_CHECKMULTISIG)
            .into_script())
    }

    ///Multisig redeem script with the keys in lexicographic order (BIP-67)
    pub fn sorted_multisig(m: usize, keys: &[PubKey]) -> Result<Self> {
        let mut keys = keys.to_vec();
        keys.sort_by_key(|k| k.compressed_bytes());
        Self::multisig(m, &keys)
    }
}

fn push_command_bytes(command: &Command, out: &mut Vec<u8>) {
    match command {
        Command::Op(op) => out.push(op.into_u8()),
        Command::Data(data) => push_data_bytes(data, out)
    }
}

fn push_data_bytes(data: &[u8], out: &mut Vec<u8>) {
    let len = data.len();
    match len {
        0 => out.push(opcodes::OP_0.into_u8()),
        1..=0x4b => out.push(len as u8),
        0x4c..=0xff => {
            out.push(opcodes::OP_PUSHDATA1.into_u8());
            out.push(len as u8);
        },
        0x100..=0xffff => {
            out.push(opcodes::OP_PUSHDATA2.into_u8());
            out.extend_from_slice(&(len as u16).to_le_bytes());
        },
        _ => {
            out.push(opcodes::OP_PUSHDATA4.into_u8());
            out.extend_from_slice(&(len as u32).to_le_bytes());
        }
    }
    out.extend_from_slice(data);
}
