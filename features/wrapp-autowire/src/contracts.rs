//! Assignability between concrete types and the contracts they satisfy.
//!
//! Rust has no runtime subtype relation, so every concrete type carries an explicit
//! table of the contract types it may be viewed as. A contract view is an unsizing
//! cast from `Arc<T>` to `Arc<dyn Contract>`, registered once per type:
//!
//! ```rust
//! use std::sync::Arc;
//! use wrapp_autowire::Contracts;
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! struct English;
//! impl Greeter for English {
//!     fn greet(&self) -> String {
//!         "hello".to_string()
//!     }
//! }
//!
//! let contracts = Contracts::<English>::of()
//!     .satisfies::<dyn Greeter>(|this| this as Arc<dyn Greeter>);
//! ```
use std::{
    any::{Any, TypeId},
    marker::PhantomData,
    sync::Arc,
};

use crate::{
    lifecycle::{Cleanup, Initialize},
    types::{Injectable, TypeInfo},
};

/// Turns the erased value into a boxed `Arc<Contract>`
type Caster = Arc<dyn Fn(&Arc<dyn Any + Send + Sync>) -> Option<Box<dyn Any>> + Send + Sync>;

#[derive(Clone)]
struct ContractView {
    info: TypeInfo,
    cast: Caster,
}

/// Typed builder for the contracts a `T` satisfies
///
/// `T` itself is always part of the table.
pub struct Contracts<T: Injectable> {
    views: Vec<ContractView>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Injectable> Default for Contracts<T> {
    fn default() -> Self {
        Self::of()
    }
}

impl<T: Injectable> Contracts<T> {
    /// Contracts containing only `T` itself
    pub fn of() -> Self {
        let contracts = Contracts {
            views: Vec::new(),
            _marker: PhantomData,
        };
        contracts.satisfies::<T>(|this| this)
    }

    /// Declares that `T` can be viewed as `U`
    ///
    /// Registering the same contract twice keeps the last cast.
    pub fn satisfies<U: ?Sized + 'static>(mut self, cast: fn(Arc<T>) -> Arc<U>) -> Self {
        let info = TypeInfo::of::<U>();
        let cast: Caster = Arc::new(move |value: &Arc<dyn Any + Send + Sync>| {
            value
                .clone()
                .downcast::<T>()
                .ok()
                .map(|concrete| Box::new(cast(concrete)) as Box<dyn Any>)
        });

        self.views.retain(|view| view.info != info);
        self.views.push(ContractView { info, cast });
        self
    }

    /// Exposes the [Initialize] capability to the wiring session
    pub fn initializable(self) -> Self
    where
        T: Initialize,
    {
        self.satisfies::<dyn Initialize>(|this| this as Arc<dyn Initialize>)
    }

    /// Exposes the [Cleanup] capability to the teardown pass
    pub fn cleanable(self) -> Self
    where
        T: Cleanup,
    {
        self.satisfies::<dyn Cleanup>(|this| this as Arc<dyn Cleanup>)
    }

    pub(crate) fn into_table(self) -> Arc<ContractTable> {
        Arc::new(ContractTable {
            concrete: TypeInfo::of::<T>(),
            views: self.views,
        })
    }
}

/// Type erased [Contracts], shared between a recipe and every instance it produced
pub(crate) struct ContractTable {
    concrete: TypeInfo,
    views: Vec<ContractView>,
}

impl ContractTable {
    pub(crate) fn concrete(&self) -> TypeInfo {
        self.concrete
    }

    pub(crate) fn satisfies(&self, contract: TypeId) -> bool {
        self.views.iter().any(|view| view.info.type_id == contract)
    }

    pub(crate) fn view<U: ?Sized + 'static>(
        &self,
        value: &Arc<dyn Any + Send + Sync>,
    ) -> Option<Arc<U>> {
        let contract = TypeId::of::<U>();
        let view = self.views.iter().find(|view| view.info.type_id == contract)?;
        let boxed = (view.cast)(value)?;
        boxed.downcast::<Arc<U>>().ok().map(|arc| *arc)
    }
}
