//! Arena indices for nodes and links.

use std::fmt;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            /// Create an id from a raw arena index.
            #[inline]
            pub const fn from_index(index: u32) -> Self {
                Self(index)
            }

            /// Raw arena index.
            #[inline]
            pub const fn index(self) -> u32 {
                self.0
            }

            #[inline]
            pub(crate) const fn slot(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

arena_id!(
    /// Handle to a node in a [`Graph`](crate::graph::Graph).
    NodeId,
    "n"
);

arena_id!(
    /// Handle to a link in a [`Graph`](crate::graph::Graph).
    LinkId,
    "l"
);
