//! Upstream blog post form and wizard steps.
//!
//! # Responsibility
//! - Parse untyped form payloads into [`BlogPostForm`] once, at the boundary.
//! - Track wizard step order and per-step required fields.
//! - Decide which document body the preview surface renders.
//!
//! # Invariants
//! - `preview_content` prefers editor output only when the editor signalled
//!   completion and produced non-blank text.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from form parsing and step validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// Payload shape does not match the form schema.
    InvalidPayload(String),
    /// Required field is blank for the given step.
    MissingField {
        step: FormStep,
        field: &'static str,
    },
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPayload(message) => write!(f, "invalid form payload: {message}"),
            Self::MissingField { step, field } => {
                write!(f, "field `{field}` is required in step `{}`", step.as_str())
            }
        }
    }
}

impl Error for FormError {}

/// Wizard steps in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStep {
    BasicInfo,
    Content,
    Media,
    Preview,
}

impl FormStep {
    pub const ALL: [FormStep; 4] = [Self::BasicInfo, Self::Content, Self::Media, Self::Preview];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::BasicInfo => "basic_info",
            Self::Content => "content",
            Self::Media => "media",
            Self::Preview => "preview",
        }
    }

    /// Zero-based position in the wizard.
    pub fn index(self) -> usize {
        match self {
            Self::BasicInfo => 0,
            Self::Content => 1,
            Self::Media => 2,
            Self::Preview => 3,
        }
    }

    /// Next step, or `None` on the last one.
    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// Previous step, or `None` on the first one.
    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).map(|index| Self::ALL[index])
    }
}

/// Tags arrive either as a list or as one comma separated string.
#[derive(Deserialize)]
#[serde(untagged)]
enum TagsInput {
    List(Vec<String>),
    Text(String),
}

fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = match Option::<TagsInput>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(TagsInput::List(items)) => items,
        Some(TagsInput::Text(text)) => text.split(',').map(str::to_string).collect(),
    };
    Ok(normalize_tags(&raw))
}

/// Trims, strips a leading `#`, drops blanks and duplicates (first wins).
pub fn normalize_tags(raw: &[String]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::with_capacity(raw.len());
    for value in raw {
        let normalized = value.trim().trim_start_matches('#').trim();
        if normalized.is_empty() || tags.iter().any(|tag| tag == normalized) {
            continue;
        }
        tags.push(normalized.to_string());
    }
    tags
}

/// Typed blog post form consumed by the wizard and preview surfaces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlogPostForm {
    pub title: String,
    pub description: String,
    #[serde(deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,
    pub nickname: String,
    pub main_image: Option<String>,
    pub media: Vec<String>,
    pub slider_images: Vec<String>,
    /// Plain textarea body, used when the module editor was not completed.
    pub content: String,
    /// Assembled module editor output.
    pub editor_completed_content: String,
    pub is_editor_completed: bool,
}

impl BlogPostForm {
    /// Parses an untyped payload into a typed form.
    ///
    /// Missing fields take defaults; present fields with the wrong shape are
    /// rejected.
    pub fn from_json(value: serde_json::Value) -> Result<Self, FormError> {
        serde_json::from_value(value).map_err(|err| FormError::InvalidPayload(err.to_string()))
    }

    /// Parses a JSON text payload.
    pub fn from_json_str(text: &str) -> Result<Self, FormError> {
        serde_json::from_str(text).map_err(|err| FormError::InvalidPayload(err.to_string()))
    }

    /// Body the preview surface should render.
    pub fn preview_content(&self) -> &str {
        if self.is_editor_completed && !self.editor_completed_content.trim().is_empty() {
            self.editor_completed_content.as_str()
        } else {
            self.content.as_str()
        }
    }

    /// Validates required fields for one wizard step.
    ///
    /// `Preview` validates every earlier step.
    pub fn validate_step(&self, step: FormStep) -> Result<(), FormError> {
        match step {
            FormStep::BasicInfo => {
                require(step, "title", &self.title)?;
                require(step, "description", &self.description)?;
                require(step, "nickname", &self.nickname)
            }
            FormStep::Content => require(step, "content", self.preview_content()),
            FormStep::Media => Ok(()),
            FormStep::Preview => {
                for earlier in [FormStep::BasicInfo, FormStep::Content, FormStep::Media] {
                    self.validate_step(earlier)?;
                }
                Ok(())
            }
        }
    }

    /// Validates the current step and returns the next one.
    pub fn advance(&self, current: FormStep) -> Result<Option<FormStep>, FormError> {
        self.validate_step(current)?;
        Ok(current.next())
    }
}

fn require(step: FormStep, field: &'static str, value: &str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        return Err(FormError::MissingField { step, field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{normalize_tags, FormStep};

    #[test]
    fn step_navigation_stops_at_bounds() {
        assert_eq!(FormStep::BasicInfo.previous(), None);
        assert_eq!(FormStep::BasicInfo.next(), Some(FormStep::Content));
        assert_eq!(FormStep::Media.next(), Some(FormStep::Preview));
        assert_eq!(FormStep::Preview.next(), None);
    }

    #[test]
    fn normalize_tags_trims_and_deduplicates() {
        let raw = vec![
            " rust ".to_string(),
            "#rust".to_string(),
            "".to_string(),
            "blog".to_string(),
        ];
        assert_eq!(normalize_tags(&raw), vec!["rust", "blog"]);
    }
}
