//! Bot API wire types and command parsing.
//!
//! Only the fields this bot consumes are modeled; the Bot API tolerates
//! unknown fields being ignored on both sides.

use serde::Deserialize;

/// Envelope every Bot API method call answers with.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

/// One entry from `getUpdates`.
#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub chat: Chat,
    pub text: Option<String>,
    pub video: Option<Video>,
    pub video_note: Option<VideoNote>,
    pub document: Option<Document>,
}

impl Message {
    /// The file id of the clip carried by this message, if any.
    ///
    /// Telegram delivers phone footage as `video`, round videos as
    /// `video_note`, and "send as file" uploads as a `document` with a
    /// video mime type.
    pub fn clip_file_id(&self) -> Option<&str> {
        if let Some(video) = &self.video {
            return Some(&video.file_id);
        }
        if let Some(note) = &self.video_note {
            return Some(&note.file_id);
        }
        if let Some(doc) = &self.document {
            if doc
                .mime_type
                .as_deref()
                .is_some_and(|m| m.starts_with("video/"))
            {
                return Some(&doc.file_id);
            }
        }
        None
    }
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct Video {
    pub file_id: String,
}

#[derive(Debug, Deserialize)]
pub struct VideoNote {
    pub file_id: String,
}

#[derive(Debug, Deserialize)]
pub struct Document {
    pub file_id: String,
    pub mime_type: Option<String>,
}

/// Answer to `getFile`.
#[derive(Debug, Deserialize)]
pub struct FileInfo {
    pub file_path: Option<String>,
}

/// Answer to `getMe`.
#[derive(Debug, Deserialize)]
pub struct BotIdentity {
    pub id: i64,
    pub username: Option<String>,
}

/// The commands this bot understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Merge,
    Reset,
}

/// Parses a message text into a command.
///
/// Accepts the `/command@BotName` form Telegram uses in group chats.
pub fn parse_command(text: &str) -> Option<Command> {
    let first = text.trim().split_whitespace().next()?;
    let name = first.strip_prefix('/')?;
    let name = name.split('@').next().unwrap_or(name);
    match name {
        "start" => Some(Command::Start),
        "merge" => Some(Command::Merge),
        "reset" => Some(Command::Reset),
        _ => None,
    }
}
