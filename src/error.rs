use crate::storage::StorageKind;
use thiserror::Error;

/// Errors raised while building maps or caches and by the failing query forms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Two input pairs shared a key; `index` is the position of the second one.
    #[error("duplicate key at input position {index}")]
    DuplicateKey { index: usize },

    #[error("member name '{name}' is declared more than once on {type_name}")]
    DuplicateName {
        type_name: &'static str,
        name: &'static str,
    },

    #[error("specified value '{input}' is not defined on {type_name}")]
    Parse {
        input: String,
        type_name: &'static str,
    },

    #[error("{type_name} is stored as {expected}, got a {found} value")]
    UnsupportedStorageKind {
        type_name: &'static str,
        expected: StorageKind,
        found: StorageKind,
    },

    #[error("value {value} does not fit in storage kind {kind}")]
    OutOfRange { value: String, kind: StorageKind },

    #[error("metadata for {type_name} is already bound")]
    AlreadyBound { type_name: &'static str },
}

pub type Result<T> = core::result::Result<T, Error>;
