use std::sync::Arc;

use crate::{
    errors::WireError,
    factories::ConstructorInfo,
    types::{Instance, TypeInfo},
};

/// A stored singleton and the recipe which built it
///
/// `produced_by` is `None` for instances supplied by the caller.
pub(crate) struct InstanceRecord {
    pub instance: Instance,
    pub produced_by: Option<Arc<ConstructorInfo>>,
}

/// Append only record of every live singleton, in construction order
#[derive(Default)]
pub(crate) struct InstanceStore {
    records: Vec<InstanceRecord>,
}

impl InstanceStore {
    pub(crate) fn push(&mut self, record: InstanceRecord) {
        self.records.push(record);
    }

    /// Finds the one live instance whose concrete type satisfies the requested type
    pub(crate) fn find(&self, requested: TypeInfo) -> Result<Option<Instance>, WireError> {
        let mut matches = self
            .records
            .iter()
            .filter(|record| record.instance.satisfies(requested.type_id));

        let Some(found) = matches.next() else {
            return Ok(None);
        };

        let others: Vec<TypeInfo> = matches.map(|record| record.instance.info()).collect();
        if !others.is_empty() {
            return Err(WireError::AmbiguousInstance {
                requested,
                candidates: std::iter::once(found.instance.info()).chain(others).collect(),
            });
        }

        Ok(Some(found.instance.clone()))
    }

    pub(crate) fn count(&self) -> usize {
        self.records.len()
    }

    /// Snapshot of all instances in construction order
    pub(crate) fn instances(&self) -> Vec<Instance> {
        self.records.iter().map(|record| record.instance.clone()).collect()
    }

    /// Removes the most recently stored record
    pub(crate) fn pop(&mut self) -> Option<InstanceRecord> {
        self.records.pop()
    }
}
