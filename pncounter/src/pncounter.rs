use std::cmp::Ordering;

use crate::{
    error::{Error, Result},
    gcounter::GCounter,
    ReplicaId,
};

/// Positive-negative counter: two grow-only counters, one for increments and
/// one for decrements. Each instance is owned by a single replica, which only
/// ever writes its own slot; diverged instances reconcile by exchanging full
/// snapshots and merging, with no coordination and no ordering requirement on
/// when or how often snapshots are exchanged.
///
/// The internal bookkeeping only grows, even though `value()` can decrease.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PNCounter {
    replica: ReplicaId,
    inc: GCounter,
    dec: GCounter,
}

impl PNCounter {
    pub fn new(replica: ReplicaId, replica_count: usize) -> Result<Self> {
        if replica_count == 0 || replica.index() >= replica_count {
            return Err(Error::InvalidConfiguration {
                replica: replica.index(),
                replica_count,
            });
        }
        Ok(Self {
            replica,
            inc: GCounter::new(replica_count),
            dec: GCounter::new(replica_count),
        })
    }

    /// Rebuild an instance from snapshot halves, e.g. after transport decode.
    pub fn from_parts(replica: ReplicaId, inc: GCounter, dec: GCounter) -> Result<Self> {
        if inc.replica_count() != dec.replica_count() {
            return Err(Error::IncompatibleReplicaCount {
                ours: inc.replica_count(),
                theirs: dec.replica_count(),
            });
        }
        if replica.index() >= inc.replica_count() {
            return Err(Error::InvalidConfiguration {
                replica: replica.index(),
                replica_count: inc.replica_count(),
            });
        }
        Ok(Self { replica, inc, dec })
    }

    pub fn replica(&self) -> ReplicaId {
        self.replica
    }

    pub fn replica_count(&self) -> usize {
        self.inc.replica_count()
    }

    /// Increments per replica, ordered by replica index.
    pub fn positive(&self) -> &[u64] {
        self.inc.slots()
    }

    /// Decrements per replica, ordered by replica index.
    pub fn negative(&self) -> &[u64] {
        self.dec.slots()
    }

    /// Best-known value from this replica's point of view. Can be negative,
    /// and only agrees with other replicas once all merges have propagated.
    /// Totals past the i64 range are outside the supported domain.
    pub fn value(&self) -> i64 {
        self.inc.value() as i64 - self.dec.value() as i64
    }

    pub fn increment(&mut self) -> Result<()> {
        self.inc.increment(self.replica)
    }

    pub fn decrement(&mut self) -> Result<()> {
        self.dec.increment(self.replica)
    }

    fn check_compatible(&self, other: &Self) -> Result<()> {
        if self.replica_count() != other.replica_count() {
            return Err(Error::IncompatibleReplicaCount {
                ours: self.replica_count(),
                theirs: other.replica_count(),
            });
        }
        Ok(())
    }

    /// `true` iff `self` is no more informed than `other`: every increment
    /// and every decrement slot here is dominated by the corresponding slot
    /// there. A single slot where either half exceeds `other` breaks the
    /// relation; two states can each fail to dominate the other (concurrent).
    pub fn compare(&self, other: &Self) -> Result<bool> {
        self.check_compatible(other)?;
        Ok(self.inc.dominated_by(&other.inc)? && self.dec.dominated_by(&other.dec)?)
    }

    /// Position of `self` relative to `other` in the partial order. `None`
    /// marks two states that are concurrent.
    pub fn ordering(&self, other: &Self) -> Result<Option<Ordering>> {
        self.check_compatible(other)?;
        let ours = self.positive().iter().chain(self.negative());
        let theirs = other.positive().iter().chain(other.negative());
        Ok(ours.zip(theirs).fold(Some(Ordering::Equal), |prev, (va, vb)| {
            match prev {
                Some(Ordering::Equal) if va > vb => Some(Ordering::Greater),
                Some(Ordering::Equal) if va < vb => Some(Ordering::Less),
                Some(Ordering::Less) if va > vb => None,
                Some(Ordering::Greater) if va < vb => None,
                _ => prev,
            }
        }))
    }

    /// Merge a peer snapshot into this instance, slot-wise max over both
    /// halves. Commutative, associative, idempotent; never decreases `self`
    /// and leaves `other` untouched. Validation happens before any slot is
    /// written.
    pub fn merge(&mut self, other: &Self) -> Result<()> {
        self.check_compatible(other)?;
        self.inc.merge(&other.inc)?;
        self.dec.merge(&other.dec)
    }
}
