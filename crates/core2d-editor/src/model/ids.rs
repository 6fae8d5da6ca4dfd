use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Handle of a shape in the [`ShapeStore`](super::ShapeStore).
    ShapeId
);
define_id!(
    /// Handle of a style in the [`ShapeStore`](super::ShapeStore).
    StyleId
);
define_id!(LayerId);
define_id!(PageId);
define_id!(DocumentId);
define_id!(LibraryId);
