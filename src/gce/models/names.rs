use serde::Deserialize;
use std::fmt;

macro_rules! name {
    ($(#[$meta:meta])* $ty:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
        pub struct $ty(String);

        #[allow(dead_code)]
        impl $ty {
            pub fn new(name: impl AsRef<str>) -> Self {
                Self(name.as_ref().into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

name!(
    /// Project ID (or project number) of a cloud project.
    ProjectId
);

name!(Zone);

name!(Region);

name!(DiskName);

name!(SnapshotName);

name!(OperationName);
