//! Contact form payload types.

use anyhow::{Result, bail};
use serde::Serialize;

/// A filled-in contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[allow(clippy::module_name_repetitions)]
pub struct ContactMessage {
    /// Sender name (`user_name` template field).
    #[serde(rename = "user_name")]
    pub name: String,
    /// Sender email (`user_email` template field).
    #[serde(rename = "user_email")]
    pub email: String,
    /// Message body.
    pub message: String,
}

impl ContactMessage {
    /// Creates a message after checking that every field is filled in.
    ///
    /// # Errors
    ///
    /// Returns an error if a field is blank or the email has no `@`.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Self> {
        let msg = Self {
            name: name.into().trim().to_owned(),
            email: email.into().trim().to_owned(),
            message: message.into(),
        };
        if msg.name.is_empty() {
            bail!("name is required");
        }
        if msg.email.is_empty() || !msg.email.contains('@') {
            bail!("a valid email is required");
        }
        if msg.message.trim().is_empty() {
            bail!("message is required");
        }
        Ok(msg)
    }
}

/// Request body for the EmailJS `email/send` endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct SendRequest<'a> {
    pub service_id: &'a str,
    pub template_id: &'a str,
    pub user_id: &'a str,
    pub template_params: &'a ContactMessage,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_new_trims_identity_fields() {
        // Arrange & Act
        let msg = ContactMessage::new(" Ada ", " ada@example.com ", "Hello").unwrap();

        // Assert
        assert_eq!(msg.name, "Ada");
        assert_eq!(msg.email, "ada@example.com");
    }

    #[test]
    fn test_new_rejects_blank_fields() {
        assert!(ContactMessage::new("", "ada@example.com", "Hi").is_err());
        assert!(ContactMessage::new("Ada", "not-an-email", "Hi").is_err());
        assert!(ContactMessage::new("Ada", "ada@example.com", "  ").is_err());
    }

    #[test]
    fn test_template_params_use_form_field_names() {
        // Arrange
        let msg = ContactMessage::new("Ada", "ada@example.com", "Hi").unwrap();

        // Act
        let json = serde_json::to_value(&msg).unwrap();

        // Assert
        assert_eq!(json["user_name"], "Ada");
        assert_eq!(json["user_email"], "ada@example.com");
        assert_eq!(json["message"], "Hi");
    }
}
