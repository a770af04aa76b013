//! Shop domain type.
//!
//! Every recipe belongs to exactly one shop, identified by its
//! `*.myshopify.com` domain. The domain is the tenant key for all queries.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ShopDomain`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShopDomainError {
    /// The input string is empty.
    #[error("shop cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("shop must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character that cannot appear in a hostname.
    #[error("shop contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// A shop (tenant) domain such as `test-store.myshopify.com`.
///
/// Parsing trims surrounding whitespace, strips an `https://` or `http://`
/// scheme and a trailing slash, and lowercases the result, so the same shop
/// always maps to the same tenant key.
///
/// ## Constraints
///
/// - Length: 1-255 characters
/// - Characters: ASCII letters, digits, `-` and `.`
///
/// ## Examples
///
/// ```
/// use recipe_shelf_core::ShopDomain;
///
/// let shop = ShopDomain::parse("https://Test-Store.myshopify.com/").unwrap();
/// assert_eq!(shop.as_str(), "test-store.myshopify.com");
/// assert!(shop.is_myshopify());
///
/// assert!(ShopDomain::parse("").is_err());
/// assert!(ShopDomain::parse("evil.com/path").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct ShopDomain(String);

impl ShopDomain {
    /// Maximum length of a hostname.
    pub const MAX_LENGTH: usize = 255;

    const MYSHOPIFY_SUFFIX: &'static str = ".myshopify.com";

    /// Parse a `ShopDomain` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the normalized input is empty, too long, or
    /// contains characters that are not valid in a hostname.
    pub fn parse(s: &str) -> Result<Self, ShopDomainError> {
        let trimmed = s.trim();
        let without_scheme = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"))
            .unwrap_or(trimmed);
        let host = without_scheme.trim_end_matches('/').to_ascii_lowercase();

        if host.is_empty() {
            return Err(ShopDomainError::Empty);
        }

        if host.len() > Self::MAX_LENGTH {
            return Err(ShopDomainError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(c) = host
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '.'))
        {
            return Err(ShopDomainError::InvalidCharacter(c));
        }

        Ok(Self(host))
    }

    /// Whether this is a `<name>.myshopify.com` domain.
    ///
    /// Only these domains are accepted as OAuth install targets.
    #[must_use]
    pub fn is_myshopify(&self) -> bool {
        self.0
            .strip_suffix(Self::MYSHOPIFY_SUFFIX)
            .is_some_and(|name| {
                !name.is_empty()
                    && !name.contains('.')
                    && !name.starts_with('-')
                    && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
            })
    }

    /// Returns the domain as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ShopDomain` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ShopDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ShopDomain {
    type Err = ShopDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ShopDomain {
    type Error = ShopDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ShopDomain> for String {
    fn from(shop: ShopDomain) -> Self {
        shop.0
    }
}

impl AsRef<str> for ShopDomain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
