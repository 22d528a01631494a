use std::{
    any::{Any, TypeId},
    sync::Arc,
};

use crate::contracts::ContractTable;

/// Error type returned by factories, listeners, release functions and capabilities
pub type DynError = Box<dyn std::error::Error + Send + Sync>;

/// Anything stored by the wirer is shared through an `Arc` and handed to async
/// factories, so it needs to be Send + Sync + 'static
pub trait Injectable: Send + Sync + 'static {}
impl<T: Send + Sync + 'static> Injectable for T {}

/// Type Name and Type Id
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct TypeInfo {
    pub type_name: &'static str,
    pub type_id: TypeId,
}
impl std::fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name)
    }
}
impl TypeInfo {
    pub fn of<T: 'static + ?Sized>() -> TypeInfo {
        TypeInfo {
            type_name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
        }
    }
}

/// A constructed or externally supplied value, together with the contracts it satisfies.
///
/// Cloning an `Instance` clones the handle, never the value.
#[derive(Clone)]
pub struct Instance {
    contracts: Arc<ContractTable>,
    value: Arc<dyn Any + Send + Sync + 'static>,
}

impl Instance {
    pub(crate) fn from_parts(
        value: Arc<dyn Any + Send + Sync + 'static>,
        contracts: Arc<ContractTable>,
    ) -> Self {
        Instance { contracts, value }
    }

    /// The concrete type of the value
    pub fn info(&self) -> TypeInfo {
        self.contracts.concrete()
    }

    /// Whether the value can be viewed as the given contract type
    pub fn satisfies(&self, contract: TypeId) -> bool {
        self.contracts.satisfies(contract)
    }

    /// Views the value as one of its contracts, e.g. `instance.view::<dyn Logger>()`
    pub fn view<T: ?Sized + 'static>(&self) -> Option<Arc<T>> {
        self.contracts.view::<T>(&self.value)
    }

    pub fn downcast_ref<T: Injectable>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Reference equality of the underlying values
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Instance").field(&self.info().type_name).finish()
    }
}
