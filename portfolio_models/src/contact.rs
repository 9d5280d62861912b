use std::sync::LazyLock;

use nutype::nutype;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::email::EmailId;

/// A validated message submitted through the contact form.
///
/// The only way to obtain a [`ContactMessage`] from untrusted input is
/// [`ContactMessage::new`], which performs the presence check before the email
/// syntax check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub author: ContactMessageAuthor,
    pub content: ContactMessageContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessageAuthor {
    pub name: ContactMessageAuthorName,
    pub email: ContactMessageAuthorEmail,
}

#[nutype(
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactMessageAuthorName(String);

/// Sender address of a contact message.
///
/// This is only a basic syntax check (`local@domain.tld`) and deliberately
/// accepts addresses that are not RFC 5322 compliant.
#[nutype(
    validate(regex = CONTACT_EMAIL_REGEX),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactMessageAuthorEmail(String);

pub static CONTACT_EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

#[nutype(
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactMessageContent(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContactMessageValidationError {
    #[error("All fields are required")]
    MissingField,
    #[error("Invalid email format")]
    InvalidEmail,
}

impl ContactMessage {
    /// Validate the raw contact form fields.
    ///
    /// Missing and empty fields are rejected first, so an empty email address
    /// is reported as [`ContactMessageValidationError::MissingField`].
    pub fn new(
        name: Option<String>,
        email: Option<String>,
        content: Option<String>,
    ) -> Result<Self, ContactMessageValidationError> {
        let (Some(name), Some(email), Some(content)) = (
            name.and_then(|x| ContactMessageAuthorName::try_new(x).ok()),
            email.filter(|x| !x.is_empty()),
            content.and_then(|x| ContactMessageContent::try_new(x).ok()),
        ) else {
            return Err(ContactMessageValidationError::MissingField);
        };

        let email = ContactMessageAuthorEmail::try_new(email)
            .map_err(|_| ContactMessageValidationError::InvalidEmail)?;

        Ok(Self {
            author: ContactMessageAuthor { name, email },
            content,
        })
    }
}

/// The mutable contents of the contact form before submission.
///
/// This is also the request body of the relay endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactDraft {
    /// Whether every field has been filled in.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.email.is_empty() && !self.message.is_empty()
    }
}

/// Acknowledgement of a contact message that has been accepted by the email
/// provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessageReceipt {
    pub id: EmailId,
}

#[cfg(test)]
mod tests {
    use portfolio_utils::assert_matches;

    use super::*;

    #[test]
    fn valid_message() {
        // Act
        let result = ContactMessage::new(
            Some("Jane Doe".into()),
            Some("jane@example.com".into()),
            Some("Hello\nWorld".into()),
        );

        // Assert
        let message = result.unwrap();
        assert_eq!(*message.author.name, "Jane Doe");
        assert_eq!(*message.author.email, "jane@example.com");
        assert_eq!(*message.content, "Hello\nWorld");
    }

    #[test]
    fn missing_fields() {
        let valid = || {
            (
                Some("Jane Doe".to_owned()),
                Some("jane@example.com".to_owned()),
                Some("Hello".to_owned()),
            )
        };

        let cases = [
            (None, valid().1, valid().2),
            (Some(String::new()), valid().1, valid().2),
            (valid().0, None, valid().2),
            (valid().0, Some(String::new()), valid().2),
            (valid().0, valid().1, None),
            (valid().0, valid().1, Some(String::new())),
            (None, None, None),
        ];

        for (name, email, content) in cases {
            assert_matches!(
                ContactMessage::new(name, email, content),
                Err(ContactMessageValidationError::MissingField)
            );
        }
    }

    #[test]
    fn missing_field_is_reported_before_invalid_email() {
        // Act
        let result = ContactMessage::new(None, Some("not-an-email".into()), Some("Hi".into()));

        // Assert
        assert_matches!(result, Err(ContactMessageValidationError::MissingField));
    }

    #[test]
    fn invalid_email() {
        for email in [
            "not-an-email",
            "a@b",
            "@b.com",
            "a@.com",
            "a@b.",
            "a b@c.com",
            "a@b@c.com",
            "jane@example .com",
        ] {
            assert_matches!(
                ContactMessage::new(
                    Some("Jane Doe".into()),
                    Some(email.into()),
                    Some("Hello".into())
                ),
                Err(ContactMessageValidationError::InvalidEmail)
            );
        }
    }

    #[test]
    fn loosely_valid_email() {
        for email in ["jane@example.com", "a@b.c", "jane.doe+tag@sub.example.org", "x@y.z.w"] {
            ContactMessage::new(
                Some("Jane Doe".into()),
                Some(email.into()),
                Some("Hello".into()),
            )
            .unwrap();
        }
    }

    #[test]
    fn whitespace_only_fields_are_present() {
        ContactMessage::new(
            Some(" ".into()),
            Some("jane@example.com".into()),
            Some("\n".into()),
        )
        .unwrap();
    }

    #[test]
    fn draft_is_complete() {
        let mut draft = ContactDraft {
            name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            message: "Hello".into(),
        };
        assert!(draft.is_complete());

        draft.email.clear();
        assert!(!draft.is_complete());
        assert!(!ContactDraft::default().is_complete());
    }
}
