//! Simulator error types
//!
//! Every recoverable failure maps to exactly one operator-visible line; the
//! Display impl carries the wording the command loop prints to stderr.
//! `BadConfig` is the one fatal kind and aborts startup.

use std::fmt;
use std::io;

/// Errors surfaced by the paging engine and the script front end
#[derive(Debug)]
pub enum SimError {
    /// Address outside the virtual address space
    AddressRange(i64),
    /// Write attempted on a read-only page
    ReadOnlyWrite(i64),
    /// No free swap slot while evicting the given page
    SwapFull(usize),
    /// Executable or swap file I/O failure
    Io(io::Error),
    /// Malformed script header or invalid geometry
    BadConfig(String),
}

pub type SimResult<T> = Result<T, SimError>;

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::AddressRange(addr) => {
                write!(f, "Error: Invalid address {} (out of range)", addr)
            }
            SimError::ReadOnlyWrite(addr) => write!(
                f,
                "Error: Invalid write operation to read-only segment at address {}",
                addr
            ),
            SimError::SwapFull(page) => {
                write!(f, "Error: Swap file is full, cannot evict page {}", page)
            }
            SimError::Io(e) => write!(f, "Error: I/O error: {}", e),
            SimError::BadConfig(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SimError {
    fn from(e: io::Error) -> Self {
        SimError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_wording() {
        assert_eq!(
            SimError::AddressRange(-3).to_string(),
            "Error: Invalid address -3 (out of range)"
        );
        assert_eq!(
            SimError::ReadOnlyWrite(70).to_string(),
            "Error: Invalid write operation to read-only segment at address 70"
        );
        assert_eq!(
            SimError::SwapFull(3).to_string(),
            "Error: Swap file is full, cannot evict page 3"
        );
    }
}
