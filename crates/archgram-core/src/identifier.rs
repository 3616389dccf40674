//! Interned identifiers for nodes and clusters.
//!
//! Every node and cluster of a [`Topology`](crate::topology::Topology) is keyed
//! by an [`Id`]. Ids are cheap to copy and compare because the underlying
//! string lives once in a process-wide interner.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner backing every [`Id`].
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A string-interned identifier.
///
/// # Examples
///
/// ```
/// use archgram_core::identifier::Id;
///
/// let igw = Id::new("igw");
/// assert_eq!(igw, "igw");
///
/// let node = Id::indexed("node", 3);
/// assert_eq!(node, "node_3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from a string slice, interning it on first use.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Creates an `Id` of the form `<prefix>_<index>`.
    ///
    /// The topology uses this to name nodes (`node_0`, `node_1`, ...) and
    /// clusters (`cluster_0`, ...) in declaration order.
    pub fn indexed(prefix: &str, index: usize) -> Self {
        Self::new(&format!("{prefix}_{index}"))
    }

    /// Returns the interned string as an owned `String`.
    pub fn resolve(self) -> String {
        interner()
            .resolve(self.0)
            .map(str::to_owned)
            .unwrap_or_default()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.resolve())
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        interner().resolve(self.0) == Some(other)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}
