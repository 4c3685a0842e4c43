use std::sync::LazyLock;

use nutype::nutype;
use regex::Regex;
use thiserror::Error;

use crate::email_address::EmailAddress;

/// Shape check for submitter addresses: exactly one `@`, at least one `.` in
/// the domain part, no whitespace anywhere.
pub static CONTACT_EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// A contact form submission that has passed validation. All fields are
/// trimmed and non-empty, the email is additionally lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: ContactName,
    pub email: ContactEmail,
    pub subject: ContactSubject,
    pub message: ContactMessage,
}

#[nutype(
    sanitize(trim),
    validate(len_char_max = 100),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactName(String);

#[nutype(
    sanitize(trim, lowercase),
    validate(regex = CONTACT_EMAIL_REGEX),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactEmail(String);

#[nutype(
    sanitize(trim),
    validate(len_char_max = 200),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactSubject(String);

#[nutype(
    sanitize(trim),
    validate(len_char_max = 5000),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactMessage(String);

impl TryFrom<&ContactEmail> for EmailAddress {
    type Error = lettre::address::AddressError;

    fn try_from(value: &ContactEmail) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Field values as they arrive from the contact form, before any checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSubmissionDraft {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactSubmissionDraft {
    /// Checks are ordered and the first violation wins: field presence, then
    /// email shape, then the per-field length bounds.
    pub fn validate(self) -> Result<ContactSubmission, ContactValidateError> {
        let Self {
            name,
            email,
            subject,
            message,
        } = self;

        if [&name, &email, &subject, &message]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(ContactValidateError::FieldsMissing);
        }

        let email =
            ContactEmail::try_new(email).map_err(|_| ContactValidateError::EmailInvalid)?;
        let name = ContactName::try_new(name).map_err(|_| ContactValidateError::NameTooLong)?;
        let subject =
            ContactSubject::try_new(subject).map_err(|_| ContactValidateError::SubjectTooLong)?;
        let message =
            ContactMessage::try_new(message).map_err(|_| ContactValidateError::MessageTooLong)?;

        Ok(ContactSubmission {
            name,
            email,
            subject,
            message,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContactValidateError {
    #[error("All fields (name, email, subject, message) are required.")]
    FieldsMissing,
    #[error("Please provide a valid email address.")]
    EmailInvalid,
    #[error("Name must be less than 100 characters.")]
    NameTooLong,
    #[error("Subject must be less than 200 characters.")]
    SubjectTooLong,
    #[error("Message must be less than 5000 characters.")]
    MessageTooLong,
}

#[cfg(test)]
mod tests {
    use portfolio_utils::assert_matches;
    use pretty_assertions::assert_eq;

    use super::*;

    fn draft() -> ContactSubmissionDraft {
        ContactSubmissionDraft {
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            subject: "Hi".into(),
            message: "Hello there".into(),
        }
    }

    #[test]
    fn accepts_and_normalizes() {
        let submission = ContactSubmissionDraft {
            name: "  Ada Lovelace  ".into(),
            email: " Ada@Example.COM ".into(),
            subject: "\tHi\n".into(),
            message: " Hello there ".into(),
        }
        .validate()
        .unwrap();

        assert_eq!(*submission.name, "Ada Lovelace");
        assert_eq!(*submission.email, "ada@example.com");
        assert_eq!(*submission.subject, "Hi");
        assert_eq!(*submission.message, "Hello there");
    }

    #[test]
    fn validation_is_idempotent() {
        let first = draft().validate().unwrap();

        let second = ContactSubmissionDraft {
            name: first.name.clone().into_inner(),
            email: first.email.clone().into_inner(),
            subject: first.subject.clone().into_inner(),
            message: first.message.clone().into_inner(),
        }
        .validate()
        .unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn rejects_missing_fields() {
        for patch in [
            (|d: &mut ContactSubmissionDraft| d.name = String::new())
                as fn(&mut ContactSubmissionDraft),
            |d| d.email = "   ".into(),
            |d| d.subject = "\t\n".into(),
            |d| d.message = String::new(),
        ] {
            let mut d = draft();
            patch(&mut d);
            assert_matches!(d.validate(), Err(ContactValidateError::FieldsMissing));
        }
    }

    #[test]
    fn rejects_malformed_email() {
        for email in [
            "plainaddress",
            "missing-domain@",
            "@missing-local.org",
            "no-tld@example",
            "two@@example.com",
            "spaces in@example.com",
            "spaces@exam ple.com",
            "trailing-dot@example.",
        ] {
            let mut d = draft();
            d.email = email.into();
            assert_matches!(d.validate(), Err(ContactValidateError::EmailInvalid));
        }
    }

    #[test]
    fn missing_fields_beat_email_shape() {
        let mut d = draft();
        d.email = "not-an-email".into();
        d.name = String::new();
        assert_matches!(d.validate(), Err(ContactValidateError::FieldsMissing));
    }

    #[test]
    fn email_shape_beats_length_bounds() {
        let mut d = draft();
        d.email = "not-an-email".into();
        d.name = "x".repeat(101);
        assert_matches!(d.validate(), Err(ContactValidateError::EmailInvalid));
    }

    #[test]
    fn length_bounds_are_inclusive() {
        for (patch, bound) in [
            (
                (|d: &mut ContactSubmissionDraft, n| d.name = "x".repeat(n))
                    as fn(&mut ContactSubmissionDraft, usize),
                100,
            ),
            (|d, n| d.subject = "x".repeat(n), 200),
            (|d, n| d.message = "x".repeat(n), 5000),
        ] {
            let mut at_bound = draft();
            patch(&mut at_bound, bound);
            at_bound.validate().unwrap();

            let mut past_bound = draft();
            patch(&mut past_bound, bound + 1);
            past_bound.validate().unwrap_err();
        }
    }

    #[test]
    fn length_errors_name_the_field() {
        let mut d = draft();
        d.name = "x".repeat(101);
        assert_matches!(d.validate(), Err(ContactValidateError::NameTooLong));

        let mut d = draft();
        d.subject = "x".repeat(201);
        assert_matches!(d.validate(), Err(ContactValidateError::SubjectTooLong));

        let mut d = draft();
        d.message = "x".repeat(5001);
        assert_matches!(d.validate(), Err(ContactValidateError::MessageTooLong));
    }

    #[test]
    fn contact_email_parses_into_address() {
        let submission = draft().validate().unwrap();
        let address = EmailAddress::try_from(&submission.email).unwrap();
        assert_eq!(address.as_str(), "ada@example.com");
    }
}
