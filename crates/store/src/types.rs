//! Identifier newtypes shared across the access core.

/// Macro to define a newtype wrapper around `i64` with standard trait
/// implementations.
///
/// Each generated type:
/// - Is a transparent wrapper around `i64` (zero runtime cost)
/// - Derives `Copy`, `Clone`, `Debug`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Derives `Serialize` and `Deserialize` (transparent)
/// - Implements `From<i64>` and `Into<i64>` for interop
/// - Implements `Display` that outputs the inner value
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Opaque subject identifier of an authenticated account.
    ///
    /// This type wraps a raw `i64` to prevent accidental misuse: passing a
    /// `CredentialId` where a `SubjectId` is expected is a compile-time
    /// error.
    ///
    /// # Examples
    ///
    /// ```
    /// use folio_access_store::SubjectId;
    ///
    /// let subject = SubjectId::from(42);
    /// assert_eq!(i64::from(subject), 42);
    /// assert_eq!(subject.to_string(), "42");
    /// ```
    SubjectId
);

define_id!(
    /// Row identifier of a persisted refresh credential.
    ///
    /// Assigned by the store on [`create`](crate::CredentialStore::create);
    /// rotation and revocation address the row through this id while the
    /// token value changes.
    ///
    /// # Examples
    ///
    /// ```
    /// use folio_access_store::CredentialId;
    ///
    /// let id = CredentialId::from(7);
    /// assert_eq!(i64::from(id), 7);
    /// ```
    CredentialId
);

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_transparent() {
        let subject = SubjectId::from(99);
        let json = serde_json::to_string(&subject).expect("serialize");
        assert_eq!(json, "99");

        let back: SubjectId = serde_json::from_str("99").expect("deserialize");
        assert_eq!(back, subject);
    }

    #[test]
    fn test_ids_are_distinct_types() {
        // Compile-time separation; equality only within a type.
        let subject = SubjectId::from(1);
        let credential = CredentialId::from(1);
        assert_eq!(i64::from(subject), i64::from(credential));
    }
}
