use std::{any::Any, future::Future, marker::PhantomData, sync::Arc};

use futures::{
    future::{self, BoxFuture},
    FutureExt,
};

use crate::{
    contracts::{ContractTable, Contracts},
    errors::WireError,
    inject::{Arguments, Dependencies},
    types::{DynError, Injectable, Instance, TypeInfo},
};

/// A Factory providing instances of a given type from its resolved dependencies
///
/// Implemented for every `Fn(Deps) -> impl Future<Output = Result<T, E>>`, where
/// `Deps` is a tuple of dependencies such as `(Arc<Logger>, Arc<dyn Store>)`.
pub trait InstanceFactory<Deps>: Send + Sync + 'static {
    type Provides: Injectable;
    type Error: Into<DynError>;
    type Future: Future<Output = Result<Self::Provides, Self::Error>> + Send + 'static;

    /// Constructs a new instance of the factory's provided type
    fn construct(&self, dependencies: Deps) -> Self::Future;
}

impl<F, Fut, T, E, Deps> InstanceFactory<Deps> for F
where
    F: Fn(Deps) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Injectable,
    E: Into<DynError>,
{
    type Provides = T;
    type Error = E;
    type Future = Fut;

    fn construct(&self, dependencies: Deps) -> Self::Future {
        self(dependencies)
    }
}

/// Type erased factory, producing instances of Any
pub(crate) type DynFactory = Box<
    dyn Fn(Arguments) -> BoxFuture<'static, Result<Arc<dyn Any + Send + Sync>, DynError>>
        + Send
        + Sync,
>;

/// Type erased release function
pub(crate) type ReleaseFn = Box<dyn Fn(&Instance) -> Result<(), DynError> + Send + Sync>;

/// One way of constructing a `T`: its ordered parameter types and the factory
pub struct Constructor<T: Injectable> {
    parameters: Vec<TypeInfo>,
    factory: DynFactory,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Injectable> Constructor<T> {
    /// Constructor backed by an async factory, parameters are taken from `Deps`
    pub fn new<Deps, F>(factory: F) -> Self
    where
        Deps: Dependencies + 'static,
        F: InstanceFactory<Deps, Provides = T>,
    {
        Self::with_parameters(Deps::parameters(), move |arguments| {
            match Deps::extract(arguments) {
                Ok(dependencies) => factory
                    .construct(dependencies)
                    .map(|result| result.map_err(Into::<DynError>::into))
                    .boxed(),
                Err(error) => future::ready(Err(DynError::from(error))).boxed(),
            }
        })
    }

    /// Constructor backed by a synchronous factory, parameters are taken from `Deps`
    pub fn from_fn<Deps, F, E>(factory: F) -> Self
    where
        Deps: Dependencies + 'static,
        F: Fn(Deps) -> Result<T, E> + Send + Sync + 'static,
        E: Into<DynError> + 'static,
    {
        Self::erased(Deps::parameters(), move |arguments| {
            let result = Deps::extract(arguments)
                .map_err(DynError::from)
                .and_then(|dependencies| factory(dependencies).map_err(Into::<DynError>::into))
                .map(|value| Arc::new(value) as Arc<dyn Any + Send + Sync>);
            future::ready(result).boxed()
        })
    }

    /// Constructor with an explicit parameter list, the factory receives the
    /// resolved values in the same order
    pub fn with_parameters<F, Fut, E>(parameters: Vec<TypeInfo>, factory: F) -> Self
    where
        F: Fn(Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Into<DynError> + 'static,
    {
        Self::erased(parameters, move |arguments| {
            factory(arguments)
                .map(|result| {
                    result
                        .map(|value| Arc::new(value) as Arc<dyn Any + Send + Sync>)
                        .map_err(Into::<DynError>::into)
                })
                .boxed()
        })
    }

    fn erased<F>(parameters: Vec<TypeInfo>, factory: F) -> Self
    where
        F: Fn(Arguments) -> BoxFuture<'static, Result<Arc<dyn Any + Send + Sync>, DynError>>
            + Send
            + Sync
            + 'static,
    {
        Constructor {
            parameters,
            factory: Box::new(factory),
            _marker: PhantomData,
        }
    }

    pub fn parameters(&self) -> &[TypeInfo] {
        &self.parameters
    }
}

/// Types which expose their public constructors to the wirer
///
/// Registration through [Wirer::add_autowired](crate::Wirer::add_autowired) requires
/// exactly one constructor.
pub trait Autowire: Injectable + Sized {
    fn constructors() -> Vec<Constructor<Self>>;

    /// Contracts instances of this type satisfy besides the type itself
    ///
    /// The lifecycle capabilities are contracts too. A type implementing
    /// [Initialize](crate::Initialize) or [Cleanup](crate::Cleanup) has to add
    /// `.initializable()` or `.cleanable()` here, the default declares neither.
    fn contracts(contracts: Contracts<Self>) -> Contracts<Self> {
        contracts
    }
}

/// The registered construction instructions for a `T`
pub struct Recipe<T: Injectable> {
    constructor: Constructor<T>,
    release: Option<ReleaseFn>,
    contracts: Contracts<T>,
}

impl<T: Injectable> Recipe<T> {
    /// Recipe backed by an async factory
    ///
    /// ```rust
    /// use std::{convert::Infallible, sync::Arc};
    /// use wrapp_autowire::Recipe;
    ///
    /// struct Logger;
    /// struct Service {
    ///     logger: Arc<Logger>,
    /// }
    ///
    /// let recipe = Recipe::new(|(logger,): (Arc<Logger>,)| async move {
    ///     Ok::<_, Infallible>(Service { logger })
    /// });
    /// ```
    pub fn new<Deps, F>(factory: F) -> Self
    where
        Deps: Dependencies + 'static,
        F: InstanceFactory<Deps, Provides = T>,
    {
        Self::from_constructor(Constructor::new(factory))
    }

    /// Recipe backed by a synchronous factory
    pub fn from_fn<Deps, F, E>(factory: F) -> Self
    where
        Deps: Dependencies + 'static,
        F: Fn(Deps) -> Result<T, E> + Send + Sync + 'static,
        E: Into<DynError> + 'static,
    {
        Self::from_constructor(Constructor::from_fn(factory))
    }

    /// Recipe with an explicit parameter list
    pub fn with_parameters<F, Fut, E>(parameters: Vec<TypeInfo>, factory: F) -> Self
    where
        F: Fn(Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Into<DynError> + 'static,
    {
        Self::from_constructor(Constructor::with_parameters(parameters, factory))
    }

    pub fn from_constructor(constructor: Constructor<T>) -> Self {
        Recipe {
            constructor,
            release: None,
            contracts: Contracts::of(),
        }
    }

    /// Function releasing the instance's resources during teardown
    ///
    /// Runs after [Cleanup](crate::Cleanup) when the type implements both.
    pub fn release<F, E>(mut self, release: F) -> Self
    where
        F: Fn(&T) -> Result<(), E> + Send + Sync + 'static,
        E: Into<DynError> + 'static,
    {
        self.release = Some(Box::new(move |instance: &Instance| -> Result<(), DynError> {
            match instance.downcast_ref::<T>() {
                Some(value) => release(value).map_err(Into::into),
                None => Err(WireError::DowncastFailed {
                    required_type: std::any::type_name::<T>(),
                    actual_type: instance.info().type_name,
                }
                .into()),
            }
        }));
        self
    }

    /// Declares the contracts produced instances satisfy
    pub fn contracts(mut self, declare: impl FnOnce(Contracts<T>) -> Contracts<T>) -> Self {
        self.contracts = declare(self.contracts);
        self
    }

    pub(crate) fn into_info(self) -> ConstructorInfo {
        ConstructorInfo {
            product: TypeInfo::of::<T>(),
            parameters: self.constructor.parameters,
            factory: self.constructor.factory,
            release: self.release,
            contracts: self.contracts.into_table(),
        }
    }
}

/// Type erased [Recipe] as stored in the registry
///
/// Shared by reference with every instance record it produced.
pub(crate) struct ConstructorInfo {
    pub product: TypeInfo,
    pub parameters: Vec<TypeInfo>,
    pub factory: DynFactory,
    pub release: Option<ReleaseFn>,
    pub contracts: Arc<ContractTable>,
}

impl ConstructorInfo {
    /// Whether instances of this recipe can be viewed as the requested type
    pub(crate) fn satisfies(&self, requested: TypeInfo) -> bool {
        self.contracts.satisfies(requested.type_id)
    }

    pub(crate) async fn construct(&self, arguments: Vec<Instance>) -> Result<Instance, WireError> {
        let value = (self.factory)(Arguments::new(arguments))
            .await
            .map_err(|error| WireError::ConstructionFailed {
                product: self.product,
                error: Arc::new(error),
            })?;

        Ok(Instance::from_parts(value, self.contracts.clone()))
    }
}
