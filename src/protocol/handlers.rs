//! Command handlers
//!
//! Runs parsed commands against the provider and renders replies. Provider
//! calls are synchronous; each one completes before its reply is built.

use log::info;

use crate::error::handlers::{error_to_status_code, handle_error};
use crate::error::{DocbridgeError, ProviderError};
use crate::protocol::responses::{
    ACTION_OK, CREATED, FILE_STATUS_OK, GOODBYE, OK, format_entry, format_listing, format_response, format_root,
};
use crate::protocol::{Command, CommandData, CommandResult, CommandStatus};
use crate::provider::DocumentProvider;

/// Dispatches a parsed command to its handler.
pub fn handle_command(provider: &DocumentProvider, command: &Command) -> CommandResult {
    let result = match command {
        Command::Quit => return closing(),
        Command::Roots => provider
            .query_root()
            .map(|root| reply(OK, format_root(&root).trim_end())),
        Command::Doc(id) => provider
            .query_entry(id)
            .map(|entry| reply(OK, format_entry(&entry).trim_end())),
        Command::Children(id) => provider
            .query_children(id)
            .map(|entries| listing(entries.iter().map(format_entry))),
        Command::Read(id) => handle_read(provider, id),
        Command::Thumb { id, size_hint } => provider
            .open_thumbnail(id, *size_hint)
            .map(|thumb| stream(thumb.file, thumb.length)),
        Command::Create {
            parent,
            mime_type,
            name,
        } => provider
            .create_entry(parent, mime_type, name)
            .map(|id| reply(CREATED, &id)),
        Command::Delete(id) => provider
            .delete_entry(id)
            .map(|stats| reply(ACTION_OK, &format!("Deleted {} entries", stats.attempted))),
        Command::Rename { id, name } => provider
            .rename_entry(id, name)
            .map(|new_id| reply(ACTION_OK, &new_id)),
        Command::Path { parent, child } => {
            provider.find_path(parent.as_deref(), child).map(|path| {
                let mut lines: Vec<String> = Vec::with_capacity(path.ids.len() + 1);
                if let Some(root) = path.root_id {
                    lines.push(format!("root\t{root}\r\n"));
                }
                lines.extend(path.ids.into_iter().map(|id| format!("{id}\r\n")));
                listing(lines)
            })
        }
        Command::Search { root, query } => provider
            .search_entries(root, query)
            .map(|entries| listing(entries.iter().map(format_entry))),
        Command::Child { parent, id } => {
            let answer = if provider.is_descendant(parent, id) {
                "yes"
            } else {
                "no"
            };
            Ok(reply(OK, answer))
        }
    };

    result.unwrap_or_else(|e| failure(DocbridgeError::Provider(e)))
}

fn handle_read(provider: &DocumentProvider, id: &str) -> Result<CommandResult, ProviderError> {
    let file = provider.open_document(id, "r")?;
    let length = file
        .metadata()
        .map_err(|e| ProviderError::Failure(e.to_string()))?
        .len();
    info!("Streaming {} ({} bytes)", id, length);
    Ok(stream(file, length))
}

/// Renders an error as a reply, keeping the connection open.
pub fn failure(err: DocbridgeError) -> CommandResult {
    match &err {
        DocbridgeError::Provider(_) | DocbridgeError::Protocol(_) => {
            info!("Request failed: {}", err)
        }
        _ => handle_error(&err),
    }
    let code = error_to_status_code(&err);
    let text = err.to_string();
    CommandResult {
        status: CommandStatus::Failure(text.clone()),
        message: Some(format_response(code, &text)),
        data: None,
    }
}

fn reply(code: u16, message: &str) -> CommandResult {
    CommandResult {
        status: CommandStatus::Success,
        message: Some(format_response(code, message)),
        data: None,
    }
}

fn listing<I: IntoIterator<Item = String>>(lines: I) -> CommandResult {
    CommandResult {
        status: CommandStatus::Success,
        message: Some(format_listing(lines)),
        data: None,
    }
}

fn stream(file: std::fs::File, length: u64) -> CommandResult {
    CommandResult {
        status: CommandStatus::Success,
        message: Some(format_response(FILE_STATUS_OK, &length.to_string())),
        data: Some(CommandData::Stream { file, length }),
    }
}

fn closing() -> CommandResult {
    CommandResult {
        status: CommandStatus::CloseConnection,
        message: Some(format_response(GOODBYE, "Goodbye")),
        data: None,
    }
}
