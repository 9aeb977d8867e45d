//! Module `commands`
//!
//! Parses request lines into [`Command`] values and defines the result types
//! returned by command handlers.
//!
//! A request is a command word, a space, then tab-separated arguments, so
//! document ids may contain spaces.

use std::fs::File;

use crate::error::ProtocolError;

/// A parsed client request.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Roots,
    Doc(String),
    Children(String),
    Read(String),
    Thumb { id: String, size_hint: (u32, u32) },
    Create { parent: String, mime_type: String, name: String },
    Delete(String),
    Rename { id: String, name: String },
    /// `-` as parent means the configured root
    Path { parent: Option<String>, child: String },
    Search { root: String, query: String },
    Child { parent: String, id: String },
    Quit,
}

/// Represents the outcome status of executing a command.
#[derive(Debug, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    Failure(String),
    CloseConnection,
}

/// Bytes to stream after the reply header.
#[derive(Debug)]
pub enum CommandData {
    Stream { file: File, length: u64 },
}

/// Struct encapsulating the full result of a command execution.
#[derive(Debug)]
pub struct CommandResult {
    pub status: CommandStatus,
    pub message: Option<String>,
    pub data: Option<CommandData>,
}

/// Parses one request line.
pub fn parse_command(raw: &str) -> Result<Command, ProtocolError> {
    let trimmed = raw.trim_end_matches(['\r', '\n']);
    let (word, rest) = trimmed.split_once(' ').unwrap_or((trimmed, ""));
    let args: Vec<&str> = if rest.is_empty() {
        Vec::new()
    } else {
        rest.split('\t').collect()
    };
    let arg = |i: usize, name: &'static str| -> Result<String, ProtocolError> {
        args.get(i)
            .filter(|a| !a.is_empty())
            .map(|a| a.to_string())
            .ok_or(ProtocolError::MissingArgument(name))
    };

    match word.to_ascii_uppercase().as_str() {
        "ROOTS" => Ok(Command::Roots),
        "DOC" => Ok(Command::Doc(arg(0, "id")?)),
        "CHILDREN" => Ok(Command::Children(arg(0, "id")?)),
        "READ" => Ok(Command::Read(arg(0, "id")?)),
        "THUMB" => Ok(Command::Thumb {
            id: arg(0, "id")?,
            size_hint: parse_size_hint(&arg(1, "size hint")?)
                .ok_or(ProtocolError::MissingArgument("size hint"))?,
        }),
        "CREATE" => Ok(Command::Create {
            parent: arg(0, "parent")?,
            mime_type: arg(1, "mime type")?,
            name: arg(2, "name")?,
        }),
        "DELETE" => Ok(Command::Delete(arg(0, "id")?)),
        "RENAME" => Ok(Command::Rename {
            id: arg(0, "id")?,
            name: arg(1, "name")?,
        }),
        "PATH" => {
            let parent = arg(0, "parent")?;
            Ok(Command::Path {
                parent: (parent != "-").then_some(parent),
                child: arg(1, "child")?,
            })
        }
        "SEARCH" => Ok(Command::Search {
            root: arg(0, "root")?,
            query: arg(1, "query")?,
        }),
        "CHILD" => Ok(Command::Child {
            parent: arg(0, "parent")?,
            id: arg(1, "id")?,
        }),
        "QUIT" => Ok(Command::Quit),
        _ => Err(ProtocolError::UnknownCommand(word.to_string())),
    }
}

/// Parses `WIDTHxHEIGHT`.
fn parse_size_hint(raw: &str) -> Option<(u32, u32)> {
    let (w, h) = raw.split_once(['x', 'X'])?;
    Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
}
