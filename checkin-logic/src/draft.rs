use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;

/// Longest accepted name or message
pub const MAX_FIELD_LEN: usize = 500;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// What the user has typed so far
pub struct MessageDraft {
    pub name: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftField {
    Name,
    Message,
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Name => "name",
            Self::Message => "message",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthRule {
    Empty,
    TooLong { len: usize },
}

/// The first rule a draft breaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftProblem {
    pub field: DraftField,
    pub rule: LengthRule,
}

impl fmt::Display for DraftProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rule {
            LengthRule::Empty => write!(f, "{} is required", self.field),
            LengthRule::TooLong { len } => write!(
                f,
                "{} is {len} characters long, the limit is {MAX_FIELD_LEN}",
                self.field
            ),
        }
    }
}

/// Length as a browser text field counts it (UTF-16 code units)
fn field_len(value: &str) -> usize {
    value.encode_utf16().count()
}

fn check_field(field: DraftField, value: &str) -> Result<(), DraftProblem> {
    let rule = match field_len(value) {
        0 => LengthRule::Empty,
        len if len > MAX_FIELD_LEN => LengthRule::TooLong { len },
        _ => return Ok(()),
    };
    Err(DraftProblem { field, rule })
}

impl MessageDraft {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn set(&mut self, field: DraftField, value: String) {
        match field {
            DraftField::Name => self.name = value,
            DraftField::Message => self.message = value,
        }
    }

    pub fn is_valid(&self) -> bool {
        validate(self).is_ok()
    }
}

/// Check both fields are present and at most [MAX_FIELD_LEN] long. Whitespace counts, nothing is
/// trimmed.
pub fn validate(draft: &MessageDraft) -> Result<(), ErrorKind> {
    check_field(DraftField::Name, &draft.name)
        .and_then(|_| check_field(DraftField::Message, &draft.message))
        .map_err(ErrorKind::ValidationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem(draft: &MessageDraft) -> Option<DraftProblem> {
        match validate(draft) {
            Ok(()) => None,
            Err(ErrorKind::ValidationFailed(p)) => Some(p),
            Err(other) => panic!("Unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_empty_name_fails() {
        let p = problem(&MessageDraft::new("", "x")).expect("Should fail");
        assert_eq!(p.field, DraftField::Name);
        assert_eq!(p.rule, LengthRule::Empty);
    }

    #[test]
    fn test_empty_message_fails() {
        let p = problem(&MessageDraft::new("a", "")).expect("Should fail");
        assert_eq!(p.field, DraftField::Message);
    }

    #[test]
    fn test_default_draft_is_invalid() {
        assert!(!MessageDraft::default().is_valid());
    }

    #[test]
    fn test_limits_inclusive() {
        let draft = MessageDraft::new("a".repeat(500), "b".repeat(500));
        assert!(draft.is_valid());
    }

    #[test]
    fn test_over_limit_fails() {
        let p = problem(&MessageDraft::new("a".repeat(501), "b")).expect("Should fail");
        assert_eq!(
            p,
            DraftProblem {
                field: DraftField::Name,
                rule: LengthRule::TooLong { len: 501 }
            }
        );

        let p = problem(&MessageDraft::new("a", "b".repeat(501))).expect("Should fail");
        assert_eq!(p.field, DraftField::Message);
    }

    #[test]
    fn test_whitespace_only_passes() {
        assert!(MessageDraft::new(" ", "\t").is_valid());
    }

    #[test]
    fn test_counts_utf16_units() {
        // Each of these is 2 UTF-16 units
        let emoji = "\u{1F30D}".repeat(250);
        assert!(MessageDraft::new("a", emoji.clone()).is_valid());

        let over = format!("{emoji}x");
        assert!(!MessageDraft::new("a", over).is_valid());
    }

    #[test]
    fn test_problem_message() {
        let p = DraftProblem {
            field: DraftField::Message,
            rule: LengthRule::TooLong { len: 600 },
        };
        assert_eq!(
            p.to_string(),
            "message is 600 characters long, the limit is 500"
        );
    }
}
