//! Access modes
//!
//! The mode strings accepted by `open` calls: `r`, `w`, `wt`, `wa`, `rw`, `rwt`.

use std::fmt;
use std::fs::OpenOptions;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Read,
    /// Write-only, created if missing, truncated
    Write,
    WriteTruncate,
    WriteAppend,
    /// Read-write, created if missing
    ReadWrite,
    ReadWriteTruncate,
}

impl OpenMode {
    pub fn as_str(self) -> &'static str {
        match self {
            OpenMode::Read => "r",
            OpenMode::Write => "w",
            OpenMode::WriteTruncate => "wt",
            OpenMode::WriteAppend => "wa",
            OpenMode::ReadWrite => "rw",
            OpenMode::ReadWriteTruncate => "rwt",
        }
    }

    pub fn is_read_only(self) -> bool {
        self == OpenMode::Read
    }

    pub fn can_write(self) -> bool {
        !self.is_read_only()
    }

    /// Host `OpenOptions` equivalent to this mode
    pub fn open_options(self) -> OpenOptions {
        let mut options = OpenOptions::new();
        match self {
            OpenMode::Read => {
                options.read(true);
            }
            OpenMode::Write | OpenMode::WriteTruncate => {
                options.write(true).create(true).truncate(true);
            }
            OpenMode::WriteAppend => {
                options.append(true).create(true);
            }
            OpenMode::ReadWrite => {
                options.read(true).write(true).create(true);
            }
            OpenMode::ReadWriteTruncate => {
                options.read(true).write(true).create(true).truncate(true);
            }
        }
        options
    }
}

impl FromStr for OpenMode {
    type Err = String;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "r" => Ok(OpenMode::Read),
            "w" => Ok(OpenMode::Write),
            "wt" => Ok(OpenMode::WriteTruncate),
            "wa" => Ok(OpenMode::WriteAppend),
            "rw" => Ok(OpenMode::ReadWrite),
            "rwt" => Ok(OpenMode::ReadWriteTruncate),
            "" => Err("empty access mode".into()),
            other => Err(format!("unsupported access mode: {other}")),
        }
    }
}

impl fmt::Display for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
