/*
    This module helps with parsing deriveration paths passed in as strings
    as vectors of ChildOptions that can be used to derive a child key.

    "m/84'/0'/0'/0/0", "84h/0h/0h" and "m" are all accepted.
*/

use crate::{
    error::{Error, Result},
    hdwallet::ChildOptions
};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    pub children: Vec<ChildOptions>
}

impl Path {
    pub fn empty() -> Self {
        Self { children: vec![] }
    }

    pub fn new(children: Vec<ChildOptions>) -> Self {
        Self { children }
    }

    /// Appends a child to the end of the path
    pub fn child(mut self, option: ChildOptions) -> Self {
        self.children.push(option);
        self
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl FromStr for Path {
    type Err = Error;

    fn from_str(path: &str) -> Result<Self> {
        let bad_path = || Error::BadPath(path.to_string());

        //"m" on its own, or an empty string, is the path to the key itself
        if path.is_empty() || path == "m" {
            return Ok(Self::empty())
        }

        let mut segments: Vec<&str> = path.split('/').collect();
        if segments.first() == Some(&"m") {
            segments.remove(0);
        }

        let mut children = Vec::with_capacity(segments.len());
        for segment in segments {
            let (digits, hardened) = match segment.strip_suffix('\'').or_else(|| segment.strip_suffix('h')) {
                Some(digits) => (digits, true),
                None => (segment, false)
            };
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(bad_path())
            }

            let index: u32 = digits.parse().map_err(|_| bad_path())?;
            let option = if hardened { ChildOptions::Hardened(index) } else { ChildOptions::Normal(index) };
            //Rejects indexes at or above 2^31
            option.index()?;
            children.push(option);
        }

        Ok(Self { children })
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "m")?;
        for child in &self.children {
            match child {
                ChildOptions::Normal(x) => write!(f, "/{}", x)?,
                ChildOptions::Hardened(x) => write!(f, "/{}'", x)?
            }
        }
        Ok(())
    }
}
