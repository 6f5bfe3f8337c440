//! URL slug type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Slug`].
///
/// The messages are shown to admins as-is.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    /// The input string is empty.
    #[error("Slug is required")]
    Empty,
    /// The input string is too long.
    #[error("Slug must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input has characters outside `[a-z0-9-]`.
    #[error("Slug must contain only lowercase letters, numbers, and hyphens")]
    InvalidCharacters,
}

/// A URL path segment for a catalog entity, e.g. `mens-linen-shirts`.
///
/// ## Constraints
///
/// - Length: 1-60 characters
/// - Characters: lowercase ASCII letters, digits and `-`
///
/// ## Examples
///
/// ```
/// use favobliss_core::Slug;
///
/// assert!(Slug::parse("mens-linen-shirts").is_ok());
/// assert!(Slug::parse("Mens Shirts").is_err());
/// assert!(Slug::parse("").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Maximum slug length.
    pub const MAX_LENGTH: usize = 60;

    /// Parse a `Slug` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than 60 characters, or
    /// contains anything other than `[a-z0-9-]`.
    pub fn parse(s: &str) -> Result<Self, SlugError> {
        if s.is_empty() {
            return Err(SlugError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(SlugError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if !s
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        {
            return Err(SlugError::InvalidCharacters);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Slug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Slug {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Slug {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(&s)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Slug {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(Slug::parse("men").is_ok());
        assert!(Slug::parse("mens-linen-shirts").is_ok());
        assert!(Slug::parse("size-42").is_ok());
        assert!(Slug::parse(&"a".repeat(60)).is_ok());
    }

    #[test]
    fn test_parse_empty() {
        let err = Slug::parse("").unwrap_err();
        assert_eq!(err, SlugError::Empty);
        assert_eq!(err.to_string(), "Slug is required");
    }

    #[test]
    fn test_parse_too_long() {
        let err = Slug::parse(&"a".repeat(61)).unwrap_err();
        assert_eq!(err.to_string(), "Slug must be at most 60 characters");
    }

    #[test]
    fn test_parse_invalid_characters() {
        for bad in ["Men", "men shirts", "men_shirts", "men/shirts", "kurtá"] {
            assert_eq!(
                Slug::parse(bad).unwrap_err(),
                SlugError::InvalidCharacters,
                "{bad}"
            );
        }
    }

    #[test]
    fn test_deserialize_validates() {
        assert!(serde_json::from_str::<Slug>("\"linen\"").is_ok());
        assert!(serde_json::from_str::<Slug>("\"Linen Shirts\"").is_err());
    }
}
