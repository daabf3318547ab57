pub mod error;
pub mod gcounter;
pub mod pncounter;

pub use error::{Error, Result};
pub use gcounter::GCounter;
pub use pncounter::PNCounter;

/// 0-based index of a replica within a fixed-size cluster.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReplicaId(usize);

impl ReplicaId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for ReplicaId {
    fn from(val: usize) -> Self {
        Self(val)
    }
}

impl std::fmt::Display for ReplicaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
