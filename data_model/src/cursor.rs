//! Structures related to the server-issued cursor.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Opaque handle issued by a record source for one logical scan session.
///
/// The client holds the token and echoes it back on every page request. Its
/// shape is owned by the record source, so nothing here exposes the contents
/// in a form that could be inspected: the only way to get the handle back is
/// [`CursorToken::as_wire`], which is meant for transports putting it on the
/// wire.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CursorToken(String);

impl CursorToken {
    /// Wrap a handle issued by a record source.
    pub fn issue(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    /// Handle in the form it has to be sent back to the record source.
    pub fn as_wire(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CursorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // only the length, the contents belong to the record source
        f.debug_struct("CursorToken")
            .field("len", &self.0.len())
            .finish_non_exhaustive()
    }
}
