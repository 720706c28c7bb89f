//! Contact form state
//!
//! Submitting only flips the local flag; nothing is stored or sent.

use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContactFormState {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub message: String,
    #[serde(skip)]
    submitted: bool,
}

impl ContactFormState {
    pub fn submit(&mut self) {
        tracing::info!(
            "Contact form submitted (service: {})",
            if self.service.is_empty() { "-" } else { self.service.as_str() }
        );
        self.submitted = true;
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_flips_flag() {
        let mut form = ContactFormState {
            name: "Ana".to_string(),
            ..ContactFormState::default()
        };
        assert!(!form.is_submitted());
        form.submit();
        assert!(form.is_submitted());
        assert_eq!(form.name, "Ana");
    }

    #[test]
    fn test_decode_partial_form() {
        let form: ContactFormState =
            serde_json::from_str(r#"{"name": "Ana", "submitted": true}"#).unwrap();
        assert_eq!(form.name, "Ana");
        assert!(form.email.is_empty());
        // The flag cannot be set from the request body
        assert!(!form.is_submitted());
    }
}
