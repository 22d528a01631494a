use std::{any::type_name, sync::Arc};

use crate::{
    errors::WireError,
    types::{Instance, TypeInfo},
};

/// Ordered, already resolved arguments of a factory or listener
pub struct Arguments {
    values: std::vec::IntoIter<Instance>,
    position: usize,
    available: usize,
}

impl Arguments {
    pub(crate) fn new(values: Vec<Instance>) -> Self {
        let available = values.len();
        Arguments {
            values: values.into_iter(),
            position: 0,
            available,
        }
    }

    /// Number of arguments not taken yet
    pub fn remaining(&self) -> usize {
        self.values.len()
    }

    /// Takes the next argument as the given dependency
    pub fn take<D: Dependency>(&mut self) -> Result<D, WireError> {
        let position = self.position;
        let instance = self.next_instance().ok_or(WireError::ArgumentMissing {
            position,
            available: self.available,
        })?;
        D::extract(&instance)
    }

    /// Takes the next argument without looking at its type
    pub fn next_instance(&mut self) -> Option<Instance> {
        let instance = self.values.next()?;
        self.position += 1;
        Some(instance)
    }
}

/// A single injectable parameter
pub trait Dependency: Sized {
    /// The contract type requested from the wirer
    fn type_info() -> TypeInfo;

    fn extract(instance: &Instance) -> Result<Self, WireError>;
}

impl<T: ?Sized + 'static> Dependency for Arc<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<T>()
    }

    fn extract(instance: &Instance) -> Result<Self, WireError> {
        instance
            .view::<T>()
            .ok_or_else(|| WireError::DowncastFailed {
                required_type: type_name::<T>(),
                actual_type: instance.info().type_name,
            })
    }
}

/// An ordered list of parameters, implemented for tuples of [Dependency]
pub trait Dependencies: Sized {
    /// Parameter types in declaration order
    fn parameters() -> Vec<TypeInfo>;

    fn extract(arguments: Arguments) -> Result<Self, WireError>;
}

macro_rules! impl_dependencies {
    ($($param:ident),*) => {
        impl<$($param: Dependency),*> Dependencies for ($($param,)*) {
            fn parameters() -> Vec<TypeInfo> {
                vec![$($param::type_info()),*]
            }

            #[allow(unused_mut, unused_variables)]
            fn extract(mut arguments: Arguments) -> Result<Self, WireError> {
                Ok(($(arguments.take::<$param>()?,)*))
            }
        }
    };
}

impl_dependencies!();
impl_dependencies!(A);
impl_dependencies!(A, B);
impl_dependencies!(A, B, C);
impl_dependencies!(A, B, C, D);
impl_dependencies!(A, B, C, D, E);
impl_dependencies!(A, B, C, D, E, F);
impl_dependencies!(A, B, C, D, E, F, G);
impl_dependencies!(A, B, C, D, E, F, G, H);
