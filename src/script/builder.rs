/*

    Script builder module.

*/

use super::{Command, Script};

#[derive(Debug, Clone, Default)]
pub struct Builder {
    commands: Vec<Command>
}

impl Builder {
    /// Return a new instance of self
    pub fn new() -> Self  {
        Self { commands: Vec::new() }
    }

    /// Push an opcode into self
    pub fn push_opcode(mut self, opcode: Opcode) -> Self {
        self.commands.push(Command::Op(opcode));
        self
    }

    //Push a slice as data, the push opcode is chosen at serialization
    pub fn push_slice(mut self, slice: &[u8]) -> Self {
        self.commands.push(Command::Data(slice.to_vec()));
        self
    }

    /**
        Push a small integer with OP_0 or OP_1 to OP_16.
        Values above 16 are pushed as a single data byte.
    */
    pub fn push_int(self, n: u8) -> Self {
        match Opcode::pushnum(n) {
            Some(op) => self.push_opcode(op),
            None => self.push_slice(&[n])
        }
    }

    /// Convert self into a script
    pub fn into_script(self) -> Script {
        Script::new(self.commands)
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Opcode {
    code: u8
}

impl Opcode {
    pub fn into_u8(self) -> u8 {
        self.code
    }

    /// The opcode pushing a number from 0 to 16
    pub fn pushnum(n: u8) -> Option<Self> {
        match n {
            0 => Some(opcodes::OP_0),
            1..=16 => Some(Self { code: opcodes::OP_PUSHNUM_1.code + n - 1 }),
            _ => None
        }
    }

    /// Inverse of pushnum
    pub fn small_int(&self) -> Option<u8> {
        match self.code {
            0x00 => Some(0),
            0x51..=0x60 => Some(self.code - 0x50),
            _ => None
        }
    }
}

impl From<u8> for Opcode {
    fn from(code: u8) -> Self {
        Self { code }
    }
}

// Opcode constants
pub mod opcodes {
    use super::Opcode;

    /// Push an empty array onto the stack
    pub const OP_0: Opcode = Opcode {code: 0x00};
    /// Read the next byte as N; push the next N bytes as an array onto the stack
    pub const OP_PUSHDATA1: Opcode = Opcode {code: 0x4c};
    /// Read the next 2 bytes as N; push the next N bytes as an array onto the stack
    pub const OP_PUSHDATA2: Opcode = Opcode {code: 0x4d};
    /// Read the next 4 bytes as N; push the next N bytes as an array onto the stack
    pub const OP_PUSHDATA4: Opcode = Opcode {code: 0x4e};
    /// Push the array [0x81] onto the stack
    pub const OP_PUSHNUM_NEG1: Opcode = Opcode {code: 0x4f};
    /// Push the array [0x01] onto the stack
    pub const OP_PUSHNUM_1: Opcode = Opcode {code: 0x51};
    /// Push the array [0x02] onto the stack
    pub const OP_PUSHNUM_2: Opcode = Opcode {code: 0x52};
    /// Push the array [0x03] onto the stack
    pub const OP_PUSHNUM_3: Opcode = Opcode {code: 0x53};
    /// Push the array [0x10] onto the stack
    pub const OP_PUSHNUM_16: Opcode = Opcode {code: 0x60};
    /// Fail the script immediately
    pub const OP_RETURN: Opcode = Opcode {code: 0x6a};
    /// Duplicates the top stack item
    pub const OP_DUP: Opcode = Opcode {code: 0x76};
    /// Pushes 1 if the inputs are exactly equal, 0 otherwise
    pub const OP_EQUAL: Opcode = Opcode {code: 0x87};
    /// Returns success if the inputs are exactly equal, failure otherwise
    pub const OP_EQUALVERIFY: Opcode = Opcode {code: 0x88};
    /// Pop the top stack item and push its RIPEMD(SHA256) hash
    pub const OP_HASH160: Opcode = Opcode {code: 0xa9};
    /// <https://en.bitcoin.it/wiki/OP_CHECKSIG> pushing 1/0 for success/failure
    pub const OP_CHECKSIG: Opcode = Opcode {code: 0xac};
    /// <https://en.bitcoin.it/wiki/OP_CHECKSIG> pushing 1/0 for success/failure
    pub const OP_CHECKMULTISIG: Opcode = Opcode {code: 0xae};
}
