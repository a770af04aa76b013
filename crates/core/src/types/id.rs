//! Opaque recipe identifier.
//!
//! Recipe IDs are random UUIDs so they can be shared in URLs and the
//! storefront API without leaking row counts or creation order.

use core::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error returned when a string is not a valid [`RecipeId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid recipe id: {0}")]
pub struct RecipeIdError(String);

/// Unique identifier of a recipe.
///
/// ## Examples
///
/// ```
/// use recipe_shelf_core::RecipeId;
///
/// let id = RecipeId::generate();
/// let parsed = RecipeId::parse(&id.to_string()).unwrap();
/// assert_eq!(id, parsed);
///
/// assert!(RecipeId::parse("not-a-uuid").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(Uuid);

impl RecipeId {
    /// Generate a new random recipe ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Parse a recipe ID from its hyphenated string form.
    ///
    /// # Errors
    ///
    /// Returns `RecipeIdError` if the input is not a UUID.
    pub fn parse(s: &str) -> Result<Self, RecipeIdError> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| RecipeIdError(s.to_owned()))
    }

    /// Get the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RecipeId {
    type Err = RecipeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Uuid> for RecipeId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<RecipeId> for Uuid {
    fn from(id: RecipeId) -> Self {
        id.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for RecipeId {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Uuid as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Uuid as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for RecipeId {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let id = <Uuid as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(id))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for RecipeId {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Uuid as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_unique() {
        assert_ne!(RecipeId::generate(), RecipeId::generate());
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let id = RecipeId::generate();
        let parsed = RecipeId::parse(&format!("  {id} ")).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_parse_invalid() {
        let err = RecipeId::parse("123").unwrap_err();
        assert_eq!(err.to_string(), "invalid recipe id: 123");
    }

    #[test]
    fn test_serde_transparent() {
        let id = RecipeId::generate();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
    }
}
