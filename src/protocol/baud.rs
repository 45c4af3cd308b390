use anyhow::{anyhow, Result};
use std::{fmt, str::FromStr};
use strum::{EnumIter, IntoEnumIterator};

/// Baud rates offered by the selector. Anything else is rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter)]
pub enum BaudRate {
    #[default]
    B9600,
    B19200,
    B38400,
    B57600,
    B115200,
}

impl BaudRate {
    pub fn as_u32(self) -> u32 {
        match self {
            BaudRate::B9600 => 9600,
            BaudRate::B19200 => 19200,
            BaudRate::B38400 => 38400,
            BaudRate::B57600 => 57600,
            BaudRate::B115200 => 115200,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::iter().nth(index)
    }

    pub fn to_index(self) -> usize {
        Self::iter().position(|b| b == self).unwrap_or(0)
    }

    /// Next rate in the selector, wrapping around.
    pub fn next(self) -> Self {
        let count = Self::iter().count();
        Self::from_index((self.to_index() + 1) % count).unwrap_or_default()
    }

    /// Previous rate in the selector, wrapping around.
    pub fn prev(self) -> Self {
        let count = Self::iter().count();
        Self::from_index((self.to_index() + count - 1) % count).unwrap_or_default()
    }
}

impl fmt::Display for BaudRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}

impl TryFrom<u32> for BaudRate {
    type Error = anyhow::Error;

    fn try_from(value: u32) -> Result<Self> {
        Self::iter()
            .find(|b| b.as_u32() == value)
            .ok_or_else(|| {
                let allowed = Self::iter()
                    .map(|b| b.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                anyhow!("unsupported baud rate {value} (expected one of {allowed})")
            })
    }
}

impl FromStr for BaudRate {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let value: u32 = s
            .trim()
            .parse()
            .map_err(|err| anyhow!("invalid baud rate '{s}': {err}"))?;
        Self::try_from(value)
    }
}
