//! Validated primitive types shared by the API layer and the CLI.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction.
/// Used for usernames and hospital names, which must never be blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText`, returning [`TextError::Empty`] if the trimmed input is empty.
    ///
    /// `field` names the input in the error message (for example `"username"`).
    pub fn new(field: &'static str, input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty { field });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Like [`NonEmptyText::new`] but keeps surrounding whitespace.
    ///
    /// Passwords are compared byte for byte, so they are only checked for blankness.
    pub fn new_untrimmed(field: &'static str, input: impl Into<String>) -> Result<Self, TextError> {
        let input = input.into();
        if input.trim().is_empty() {
            return Err(TextError::Empty { field });
        }
        Ok(Self(input))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_whitespace() {
        let text = NonEmptyText::new("username", "  alice ").unwrap();
        assert_eq!(text.as_str(), "alice");
    }

    #[test]
    fn test_new_rejects_blank_input() {
        let err = NonEmptyText::new("hospital", "   ").expect_err("blank input should fail");
        assert_eq!(err, TextError::Empty { field: "hospital" });
        assert_eq!(err.to_string(), "hospital cannot be empty");
    }

    #[test]
    fn test_new_untrimmed_keeps_whitespace() {
        let text = NonEmptyText::new_untrimmed("password", " pw ").unwrap();
        assert_eq!(text.as_str(), " pw ");
        assert!(NonEmptyText::new_untrimmed("password", "").is_err());
    }
}
