use std::sync::Arc;

use crate::{errors::WireError, factories::ConstructorInfo, types::TypeInfo};

/// Registered recipes, keyed by the type they produce
///
/// Keeps registration order, replacing a recipe keeps its position.
#[derive(Default)]
pub(crate) struct ConstructorRegistry {
    entries: Vec<Arc<ConstructorInfo>>,
}

impl ConstructorRegistry {
    /// Stores the recipe, returns the replaced one if the type was registered before
    pub(crate) fn register(&mut self, info: ConstructorInfo) -> Option<Arc<ConstructorInfo>> {
        let info = Arc::new(info);
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.product == info.product)
        {
            Some(existing) => {
                tracing::debug!("Replacing recipe for {}", info.product);
                Some(std::mem::replace(existing, info))
            }
            None => {
                tracing::debug!("Registered recipe for {}", info.product);
                self.entries.push(info);
                None
            }
        }
    }

    /// Finds the one recipe whose instances satisfy the requested type
    ///
    /// More than one candidate is always an error, registration order never breaks ties.
    pub(crate) fn find(
        &self,
        requested: TypeInfo,
    ) -> Result<Option<Arc<ConstructorInfo>>, WireError> {
        let mut candidates = self.entries.iter().filter(|entry| entry.satisfies(requested));

        let Some(found) = candidates.next() else {
            return Ok(None);
        };

        let others: Vec<TypeInfo> = candidates.map(|entry| entry.product).collect();
        if !others.is_empty() {
            return Err(WireError::AmbiguousRecipe {
                requested,
                candidates: std::iter::once(found.product).chain(others).collect(),
            });
        }

        Ok(Some(found.clone()))
    }

    /// Registered product types in registration order
    pub(crate) fn products(&self) -> Vec<TypeInfo> {
        self.entries.iter().map(|entry| entry.product).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
