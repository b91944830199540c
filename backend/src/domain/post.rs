//! Post entity and the field rules every persisted post satisfies.
//!
//! Client input arrives as a [`PostDraft`]. Only [`PostDraft::validate`] can
//! produce [`PostFields`], and the repository port only accepts
//! [`PostFields`] for writes, so an unvalidated post cannot reach storage.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum number of characters in a post title.
pub const TITLE_MIN_LENGTH: usize = 3;

/// Storage key of a post.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostId(String);

/// Raised when a post identifier is empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("post id must not be empty")]
pub struct EmptyPostId;

impl PostId {
    pub fn new(id: impl Into<String>) -> Result<Self, EmptyPostId> {
        let id = id.into();
        if id.is_empty() {
            return Err(EmptyPostId);
        }
        Ok(Self(id))
    }

    /// Fresh globally unique identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PostId {
    type Error = EmptyPostId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PostId> for String {
    fn from(value: PostId) -> Self {
        value.0
    }
}

impl AsRef<str> for PostId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub author: String,
}

impl Post {
    pub fn new(id: PostId, fields: PostFields) -> Self {
        let PostFields {
            title,
            content,
            author,
        } = fields;
        Self {
            id,
            title,
            content,
            author,
        }
    }

    /// Mutable fields of this post as an unvalidated draft.
    pub fn to_draft(&self) -> PostDraft {
        PostDraft {
            title: self.title.clone(),
            content: self.content.clone(),
            author: self.author.clone(),
        }
    }
}

/// A client-mutable post field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostField {
    Title,
    Content,
    Author,
}

impl PostField {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Content => "content",
            Self::Author => "author",
        }
    }
}

impl fmt::Display for PostField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rule a field failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationRule {
    Required,
    MinLength(usize),
}

impl fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => f.write_str("required"),
            Self::MinLength(min) => write!(f, "min={min}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: PostField,
    pub rule: ValidationRule,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Field '{}' failed validation: {}", self.field, self.rule)
    }
}

/// Every rule a draft failed, in field order. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldViolation>);

impl ValidationErrors {
    pub fn violations(&self) -> &[FieldViolation] {
        &self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, violation) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            violation.fmt(f)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Unvalidated post content supplied by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub author: String,
}

impl PostDraft {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            author: author.into(),
        }
    }

    /// Rules this draft fails, empty when the draft is valid.
    pub fn violations(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();
        if self.title.is_empty() {
            violations.push(FieldViolation {
                field: PostField::Title,
                rule: ValidationRule::Required,
            });
        } else if self.title.chars().count() < TITLE_MIN_LENGTH {
            violations.push(FieldViolation {
                field: PostField::Title,
                rule: ValidationRule::MinLength(TITLE_MIN_LENGTH),
            });
        }
        if self.content.is_empty() {
            violations.push(FieldViolation {
                field: PostField::Content,
                rule: ValidationRule::Required,
            });
        }
        if self.author.is_empty() {
            violations.push(FieldViolation {
                field: PostField::Author,
                rule: ValidationRule::Required,
            });
        }
        violations
    }

    pub fn validate(self) -> Result<PostFields, ValidationErrors> {
        let violations = self.violations();
        if !violations.is_empty() {
            return Err(ValidationErrors(violations));
        }
        let Self {
            title,
            content,
            author,
        } = self;
        Ok(PostFields {
            title,
            content,
            author,
        })
    }
}

/// Post content that passed [`PostDraft::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostFields {
    title: String,
    content: String,
    author: String,
}

impl PostFields {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn author(&self) -> &str {
        &self.author
    }
}

/// Partial update: only the fields present replace the stored values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
}

impl PostPatch {
    /// Merge onto `post`, yielding the full draft to re-validate.
    pub fn apply_to(self, post: &Post) -> PostDraft {
        let current = post.to_draft();
        PostDraft {
            title: self.title.unwrap_or(current.title),
            content: self.content.unwrap_or(current.content),
            author: self.author.unwrap_or(current.author),
        }
    }
}
