//! Shopify product reference.

use core::fmt;

use serde::{Deserialize, Serialize};

const PRODUCT_GID_PREFIX: &str = "gid://shopify/Product/";

/// Error returned when a string is not a valid [`ShopifyProductId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid product id: {0:?}")]
pub struct ProductIdError(String);

/// Numeric ID of a product in the Shopify catalog.
///
/// Stored and displayed in its bare numeric form (`"1234"`), without leading
/// zeros. Both the bare form and the GraphQL global ID
/// (`gid://shopify/Product/1234`) are accepted when parsing. The product's
/// existence is never checked locally.
///
/// ## Examples
///
/// ```
/// use recipe_shelf_core::ShopifyProductId;
///
/// let id = ShopifyProductId::parse("gid://shopify/Product/42").unwrap();
/// assert_eq!(id.as_str(), "42");
/// assert_eq!(id.to_gid(), "gid://shopify/Product/42");
///
/// assert!(ShopifyProductId::parse("abc").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct ShopifyProductId(String);

impl ShopifyProductId {
    /// Parse a product ID from a bare number or a global ID.
    ///
    /// # Errors
    ///
    /// Returns `ProductIdError` if the numeric part is empty or contains
    /// anything other than ASCII digits.
    pub fn parse(s: &str) -> Result<Self, ProductIdError> {
        let trimmed = s.trim();
        let numeric = trimmed.strip_prefix(PRODUCT_GID_PREFIX).unwrap_or(trimmed);

        if numeric.is_empty() || !numeric.chars().all(|c| c.is_ascii_digit()) {
            return Err(ProductIdError(s.to_owned()));
        }

        let digits = numeric.trim_start_matches('0');
        let digits = if digits.is_empty() { "0" } else { digits };

        Ok(Self(digits.to_owned()))
    }

    /// Returns the bare numeric ID.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the GraphQL global ID (`gid://shopify/Product/<id>`).
    #[must_use]
    pub fn to_gid(&self) -> String {
        format!("{PRODUCT_GID_PREFIX}{}", self.0)
    }
}

impl fmt::Display for ShopifyProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ShopifyProductId {
    type Err = ProductIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ShopifyProductId {
    type Error = ProductIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ShopifyProductId> for String {
    fn from(id: ShopifyProductId) -> Self {
        id.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare() {
        assert_eq!(ShopifyProductId::parse("8123456789").unwrap().as_str(), "8123456789");
        assert_eq!(ShopifyProductId::parse(" 12 ").unwrap().as_str(), "12");
    }

    #[test]
    fn test_parse_gid() {
        let id = ShopifyProductId::parse("gid://shopify/Product/77").unwrap();
        assert_eq!(id.as_str(), "77");
    }

    #[test]
    fn test_parse_drops_leading_zeros() {
        let padded = ShopifyProductId::parse("042").unwrap();
        assert_eq!(padded, ShopifyProductId::parse("42").unwrap());
        assert_eq!(padded.to_gid(), "gid://shopify/Product/42");
        assert_eq!(
            ShopifyProductId::parse("gid://shopify/Product/0042").unwrap().as_str(),
            "42"
        );
        assert_eq!(ShopifyProductId::parse("000").unwrap().as_str(), "0");
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert!(ShopifyProductId::parse("").is_err());
        assert!(ShopifyProductId::parse("gid://shopify/Product/").is_err());
        assert!(ShopifyProductId::parse("gid://shopify/Collection/5").is_err());
        assert!(ShopifyProductId::parse("12a").is_err());
    }

    #[test]
    fn test_to_gid() {
        let id = ShopifyProductId::parse("5").unwrap();
        assert_eq!(id.to_gid(), "gid://shopify/Product/5");
    }
}
