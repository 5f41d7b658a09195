//! File operation kinds traceable by [`crate::file_begin`]/[`crate::file_end`].

use serde::{Deserialize, Serialize};

/// Semantic kind of a traced file operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileOp {
    Close,
    Create,
    Delete,
    Open,
    Read,
    Seek,
    Status,
    Sync,
    Write,
}

impl FileOp {
    /// Lower-case name used in echo lines (`BEGIN read /path`).
    pub fn name(self) -> &'static str {
        match self {
            FileOp::Close => "close",
            FileOp::Create => "create",
            FileOp::Delete => "delete",
            FileOp::Open => "open",
            FileOp::Read => "read",
            FileOp::Seek => "seek",
            FileOp::Status => "status",
            FileOp::Sync => "sync",
            FileOp::Write => "write",
        }
    }

    /// Map to the binary sink's op code. `Create` and `Status` fold into
    /// `Other`, matching the original's OTF mapping.
    pub fn binary_code(self) -> BinaryFileOp {
        match self {
            FileOp::Close => BinaryFileOp::Close,
            FileOp::Delete => BinaryFileOp::Unlink,
            FileOp::Open => BinaryFileOp::Open,
            FileOp::Read => BinaryFileOp::Read,
            FileOp::Seek => BinaryFileOp::Seek,
            FileOp::Sync => BinaryFileOp::Sync,
            FileOp::Write => BinaryFileOp::Write,
            FileOp::Create | FileOp::Status => BinaryFileOp::Other,
        }
    }
}

/// Binary-trace op code, per the original OTF `OTF_FILEOP_*` mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryFileOp {
    Close,
    Unlink,
    Open,
    Read,
    Seek,
    Sync,
    Write,
    Other,
}
