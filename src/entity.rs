//! The closed set of Coredata resource collections.
//!
//! Every API endpoint the client can address is a variant of [`Entity`].
//! Keeping the set closed gives compile-time exhaustiveness when dispatching
//! per-collection behavior, instead of passing raw path strings around.

use std::fmt;
use std::str::FromStr;

use crate::error::CoredataError;

/// A Coredata resource collection.
///
/// Each variant maps to a fixed, trailing-slash path segment under the
/// `/api/v2/` prefix. Variants are also usable as sub-entities nested under
/// a specific instance (e.g. a project's [`Files`](Entity::Files)).
///
/// # Example
///
/// ```rust
/// use coredata_api::Entity;
///
/// assert_eq!(Entity::Projects.path(), "projects/");
/// assert_eq!("projects".parse::<Entity>().unwrap(), Entity::Projects);
/// assert!("widgets".parse::<Entity>().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Entity {
    /// Project documents.
    Projects,
    /// Contact documents.
    Contacts,
    /// Spaces (document containers).
    Spaces,
    /// Dynamic type definitions.
    Dynatypes,
    /// File documents and their metadata.
    Files,
    /// Task documents.
    Tasks,
    /// The authenticated user endpoint.
    User,
    /// User accounts.
    Users,
    /// Value lists.
    Valuelists,
    /// Comments on documents.
    Comments,
    /// Navigation tree nodes.
    Nav,
    /// Doc records.
    Docs,
    /// Raw file content. Only meaningful as a sub-entity; the response body
    /// is opaque bytes, never JSON.
    Content,
}

impl Entity {
    /// Returns the path segment for this collection, with its trailing
    /// separator (e.g. `"projects/"`).
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Projects => "projects/",
            Self::Contacts => "contacts/",
            Self::Spaces => "spaces/",
            Self::Dynatypes => "dynatypes/",
            Self::Files => "files/",
            Self::Tasks => "tasks/",
            Self::User => "user/",
            Self::Users => "users/",
            Self::Valuelists => "valuelists/",
            Self::Comments => "comments/",
            Self::Nav => "nav/",
            Self::Docs => "docs/",
            Self::Content => "content/",
        }
    }

    /// Returns the collection name without the trailing separator.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.path().trim_end_matches('/')
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Entity {
    type Err = CoredataError;

    /// Parses a lowercase collection name (e.g. `"projects"`).
    ///
    /// This is the boundary where unrecognized collection names are
    /// rejected; the client itself only ever sees valid variants.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_end_matches('/') {
            "projects" => Ok(Self::Projects),
            "contacts" => Ok(Self::Contacts),
            "spaces" => Ok(Self::Spaces),
            "dynatypes" => Ok(Self::Dynatypes),
            "files" => Ok(Self::Files),
            "tasks" => Ok(Self::Tasks),
            "user" => Ok(Self::User),
            "users" => Ok(Self::Users),
            "valuelists" => Ok(Self::Valuelists),
            "comments" => Ok(Self::Comments),
            "nav" => Ok(Self::Nav),
            "docs" => Ok(Self::Docs),
            "content" => Ok(Self::Content),
            other => Err(CoredataError::UnknownEntity {
                name: other.to_string(),
            }),
        }
    }
}
