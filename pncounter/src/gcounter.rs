use crate::{
    error::{Error, Result},
    ReplicaId,
};

/// Fixed-width grow-only counter: one slot per replica in a cluster whose
/// size is agreed on out of band. Slot `i` only ever advances, either by
/// replica `i`'s own increments or by a merge pulling those increments in.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GCounter {
    slots: Vec<u64>,
}

impl GCounter {
    pub fn new(replica_count: usize) -> Self {
        Self {
            slots: vec![0; replica_count],
        }
    }

    /// Rebuild a counter from snapshot slots, ordered by replica index.
    pub fn from_slots(slots: Vec<u64>) -> Self {
        Self { slots }
    }

    pub fn replica_count(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[u64] {
        &self.slots
    }

    /// Compute the total of the counter.
    pub fn value(&self) -> u64 {
        self.slots
            .iter()
            .fold(0, |acc, &val| acc.saturating_add(val))
    }

    /// Advance the slot owned by `replica`.
    pub fn increment(&mut self, replica: ReplicaId) -> Result<()> {
        let replica_count = self.slots.len();
        let slot = self
            .slots
            .get_mut(replica.index())
            .ok_or(Error::InvalidConfiguration {
                replica: replica.index(),
                replica_count,
            })?;
        *slot = slot.checked_add(1).ok_or(Error::CounterOverflow {
            replica: replica.index(),
        })?;
        Ok(())
    }

    fn check_width(&self, other: &Self) -> Result<()> {
        if self.slots.len() != other.slots.len() {
            return Err(Error::IncompatibleReplicaCount {
                ours: self.slots.len(),
                theirs: other.slots.len(),
            });
        }
        Ok(())
    }

    /// `true` iff every slot here is <= the corresponding slot in `other`,
    /// the join-semilattice order.
    pub fn dominated_by(&self, other: &Self) -> Result<bool> {
        self.check_width(other)?;
        Ok(self.slots.iter().zip(&other.slots).all(|(a, b)| a <= b))
    }

    /// Merge `other` into this counter. Slot-wise max, so the result is the
    /// least upper bound of both inputs and no slot ever decreases.
    pub fn merge(&mut self, other: &Self) -> Result<()> {
        self.check_width(other)?;
        for (slot, &theirs) in self.slots.iter_mut().zip(&other.slots) {
            *slot = (*slot).max(theirs);
        }
        Ok(())
    }
}
