//! Shared clap helper types for CLI commands.

use clap::ValueEnum;
use hitsdeck::Side;

/// Page side selector.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum SideArg {
    /// Year, artist and title (`a`).
    Title,
    /// QR codes, mirrored for duplex printing (`b`).
    Code,
}

impl From<SideArg> for Side {
    fn from(value: SideArg) -> Side {
        match value {
            SideArg::Title => Side::Title,
            SideArg::Code => Side::Code,
        }
    }
}
