//! Comments attached to ads.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::domain::{AdId, UserId};

/// Maximum comment length, in characters.
pub const COMMENT_TEXT_MAX: usize = 1000;

/// Validation errors raised by comment constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentValidationError {
    /// Identifier was zero or negative.
    InvalidId,
    /// Text blank after trimming.
    EmptyText,
    /// Text longer than [`COMMENT_TEXT_MAX`].
    TextTooLong { max: usize },
}

impl CommentValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::EmptyText | Self::TextTooLong { .. } => "text",
        }
    }

    /// Stable machine-readable failure code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidId => "invalid_id",
            Self::EmptyText => "empty_text",
            Self::TextTooLong { .. } => "text_too_long",
        }
    }
}

impl fmt::Display for CommentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "comment id must be a positive integer"),
            Self::EmptyText => write!(f, "text must not be empty"),
            Self::TextTooLong { max } => write!(f, "text must be at most {max} characters"),
        }
    }
}

impl std::error::Error for CommentValidationError {}

/// Positive, store-assigned comment identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommentId(i64);

impl CommentId {
    /// Validate a raw identifier.
    pub fn new(id: i64) -> Result<Self, CommentValidationError> {
        if id <= 0 {
            return Err(CommentValidationError::InvalidId);
        }
        Ok(Self(id))
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Comment body, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentText(String);

impl CommentText {
    /// Validate and construct comment text.
    pub fn new(raw: &str) -> Result<Self, CommentValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CommentValidationError::EmptyText);
        }
        if trimmed.chars().count() > COMMENT_TEXT_MAX {
            return Err(CommentValidationError::TextTooLong {
                max: COMMENT_TEXT_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for CommentText {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Comment about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub ad: AdId,
    pub author: UserId,
    pub text: CommentText,
}

/// Persisted comment.
///
/// ## Invariants
/// - `ad` references an ad that existed when the comment was created.
/// - `ad` and `author` never change after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    id: CommentId,
    ad: AdId,
    author: UserId,
    text: CommentText,
    created_at: DateTime<Utc>,
}

impl Comment {
    /// Rehydrate a comment from stored parts.
    pub fn new(
        id: CommentId,
        ad: AdId,
        author: UserId,
        text: CommentText,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            ad,
            author,
            text,
            created_at,
        }
    }

    /// Store-assigned identifier.
    pub fn id(&self) -> CommentId {
        self.id
    }

    /// Parent ad.
    pub fn ad(&self) -> AdId {
        self.ad
    }

    /// Comment author.
    pub fn author(&self) -> &UserId {
        &self.author
    }

    /// Comment body.
    pub fn text(&self) -> &CommentText {
        &self.text
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Copy of this comment with new text.
    pub fn with_text(&self, text: CommentText) -> Self {
        Self {
            text,
            ..self.clone()
        }
    }
}
