use std::{any::type_name, fmt::Debug, sync::Arc};

use crate::{
    config::WirerConfig,
    contracts::Contracts,
    diagnostics::{DiagnosticSink, Severity, TracingSink},
    errors::WireError,
    factories::{Autowire, Recipe},
    inject::Dependencies,
    lifecycle::Initialize,
    listeners::{InstantiationListener, ListenerRegistry},
    registry::ConstructorRegistry,
    resolver::InProgress,
    store::{InstanceRecord, InstanceStore},
    types::{DynError, Injectable, Instance, TypeInfo},
};

/// Phases of a wiring session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireState {
    Idle,
    Resolving,
    Listening,
    Initializing,
    Done,
    Failed,
}

type ExceptionHandler = Box<dyn FnMut(WireError) + Send>;

/// The composition root: registered recipes, the instances built from them and
/// the listeners observing their construction
///
/// The session consists of three steps:
/// 1. Register recipes, existing instances and listeners
/// 2. [Wirer::wire] builds every registered type and initializes all instances
/// 3. [Wirer::cleanup] tears everything down in reverse construction order
///
/// ```rust
/// use std::{convert::Infallible, sync::Arc};
/// use wrapp_autowire::{Recipe, WireState, Wirer};
///
/// struct Logger;
/// struct Service {
///     logger: Arc<Logger>,
/// }
///
/// let mut wirer = Wirer::new();
/// wirer
///     .add_singleton(Recipe::from_fn(|()| Ok::<_, Infallible>(Logger)))
///     .add_singleton(Recipe::from_fn(|(logger,): (Arc<Logger>,)| {
///         Ok::<_, Infallible>(Service { logger })
///     }));
///
/// let state = futures::executor::block_on(wirer.wire());
/// assert_eq!(state, WireState::Done);
///
/// let service = wirer.find_instance::<Service>().unwrap();
/// let logger = wirer.find_instance::<Logger>().unwrap();
/// assert!(Arc::ptr_eq(&service.logger, &logger));
///
/// wirer.cleanup();
/// assert_eq!(wirer.count(), 0);
/// ```
pub struct Wirer {
    pub(crate) config: WirerConfig,
    pub(crate) registry: ConstructorRegistry,
    pub(crate) store: InstanceStore,
    pub(crate) listeners: ListenerRegistry,
    /// Existing instances to run the instantiation listeners on while wiring
    pub(crate) notify_existing: Vec<Instance>,
    pub(crate) in_progress: InProgress,
    pub(crate) state: WireState,
    sink: Arc<dyn DiagnosticSink>,
    exception_handler: Option<ExceptionHandler>,
}

impl Default for Wirer {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Wirer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let instances: Vec<&'static str> = self
            .store
            .instances()
            .iter()
            .map(|instance| instance.info().type_name)
            .collect();

        f.debug_struct("Wirer")
            .field("state", &self.state)
            .field("recipes", &self.registry.len())
            .field("instances", &instances)
            .finish()
    }
}

impl Wirer {
    pub fn new() -> Self {
        Self::with_config(WirerConfig::default())
    }

    pub fn with_config(config: WirerConfig) -> Self {
        Wirer {
            config,
            registry: ConstructorRegistry::default(),
            store: InstanceStore::default(),
            listeners: ListenerRegistry::default(),
            notify_existing: Vec::new(),
            in_progress: InProgress::default(),
            state: WireState::Idle,
            sink: Arc::new(TracingSink),
            exception_handler: None,
        }
    }

    /// Replaces the sink receiving swallowed errors
    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    pub fn config(&self) -> &WirerConfig {
        &self.config
    }

    pub fn state(&self) -> WireState {
        self.state
    }

    /// Number of live stored instances
    pub fn count(&self) -> usize {
        self.store.count()
    }

    pub(crate) fn report(&self, severity: Severity, error: &WireError) {
        self.sink.report(severity, error);
    }
}

// Registration
impl Wirer {
    /// Stores the recipe for `T`, replacing an earlier recipe for the same type
    pub fn add_singleton<T: Injectable>(&mut self, recipe: Recipe<T>) -> &mut Self {
        self.registry.register(recipe.into_info());
        self
    }

    /// Registers `T` through its single public constructor
    ///
    /// Fails with [WireError::InvalidRecipe] when `T` lists zero or several
    /// constructors, the registry is left unchanged in that case.
    pub fn add_autowired<T: Autowire>(&mut self) -> Result<&mut Self, WireError> {
        let constructor = match <[_; 1]>::try_from(T::constructors()) {
            Ok([constructor]) => constructor,
            Err(constructors) => {
                let error = WireError::InvalidRecipe {
                    product: TypeInfo::of::<T>(),
                    constructors: constructors.len(),
                };
                self.report(Severity::Error, &error);
                return Err(error);
            }
        };

        let recipe = Recipe::from_constructor(constructor).contracts(T::contracts);
        Ok(self.add_singleton(recipe))
    }

    /// Stores a value built outside of the wirer
    pub fn add_existing_singleton<T: Injectable>(&mut self, value: T) -> &mut Self {
        self.add_existing_singleton_with(value, Contracts::of(), false)
    }

    /// Stores a value built outside of the wirer with its contracts
    ///
    /// With `call_listeners` the instantiation listeners run on it while wiring.
    pub fn add_existing_singleton_with<T: Injectable>(
        &mut self,
        value: T,
        contracts: Contracts<T>,
        call_listeners: bool,
    ) -> &mut Self {
        let instance = Instance::from_parts(Arc::new(value), contracts.into_table());
        if call_listeners {
            self.notify_existing.push(instance.clone());
        }

        self.store.push(InstanceRecord {
            instance,
            produced_by: None,
        });
        self
    }

    /// Registers a callback fired for every new instance which can be viewed as `T`
    ///
    /// The listener's own dependencies `D` are resolved as singletons before it runs.
    pub fn add_instantiation_listener<T, D, F, E>(&mut self, callback: F) -> &mut Self
    where
        T: ?Sized + 'static,
        D: Dependencies + 'static,
        F: Fn(Arc<T>, D) -> Result<(), E> + Send + Sync + 'static,
        E: Into<DynError> + 'static,
    {
        self.listeners.register(InstantiationListener::new(callback));
        self
    }

    /// Handler receiving the error which aborted [Wirer::wire]
    ///
    /// Without a handler the error goes to the diagnostic sink.
    pub fn on_exception(&mut self, handler: impl FnMut(WireError) + Send + 'static) -> &mut Self {
        self.exception_handler = Some(Box::new(handler));
        self
    }
}

// Resolution
impl Wirer {
    /// Resolves any contract type, building it and its dependencies when needed
    ///
    /// With `singleton` an existing instance is reused and a new one is stored,
    /// otherwise a fresh instance is built and not stored. Dependencies are always
    /// shared singletons.
    pub async fn resolve<T: ?Sized + 'static>(
        &mut self,
        singleton: bool,
    ) -> Result<Arc<T>, WireError> {
        self.discard_interrupted();
        let instance = self
            .resolve_instance(TypeInfo::of::<T>(), None, singleton)
            .await?;

        instance.view::<T>().ok_or_else(|| WireError::DowncastFailed {
            required_type: type_name::<T>(),
            actual_type: instance.info().type_name,
        })
    }

    /// Registers `T` through its single constructor, replacing an earlier
    /// recipe, then resolves it
    ///
    /// A type without exactly one constructor is reported and resolved against
    /// whatever is already stored or registered for it.
    pub async fn get_or_instantiate<T: Autowire>(
        &mut self,
        singleton: bool,
    ) -> Result<Arc<T>, WireError> {
        if self.add_autowired::<T>().is_err() {
            tracing::debug!(
                "Resolving {} with its existing registration",
                type_name::<T>()
            );
        }
        self.resolve::<T>(singleton).await
    }

    /// The one stored instance which can be viewed as `T`
    ///
    /// Several candidates are reported to the diagnostic sink and yield `None`.
    pub fn find_instance<T: ?Sized + 'static>(&self) -> Option<Arc<T>> {
        self.find_instance_info(TypeInfo::of::<T>())?.view::<T>()
    }
}

// Wiring
impl Wirer {
    /// Builds every registered type, runs the listeners on flagged existing
    /// instances and initializes all stored instances
    ///
    /// The first error aborts the session and is handed to the exception handler,
    /// or the diagnostic sink when none is set. Returns the terminal state.
    ///
    /// If an earlier `wire` future was dropped before it completed, wiring starts
    /// over and keeps the instances stored so far.
    pub async fn wire(&mut self) -> WireState {
        self.wire_then(|_| {}).await
    }

    /// Like [Wirer::wire], calling `success` with the wired session when it completes
    pub async fn wire_then<F: FnOnce(&Wirer)>(&mut self, success: F) -> WireState {
        self.discard_interrupted();
        if self.state != WireState::Idle {
            self.report(Severity::Warning, &WireError::AlreadyWired(self.state));
            return self.state;
        }

        tracing::debug!(
            "Wiring {} recipes and {} existing instances",
            self.registry.len(),
            self.store.count()
        );

        match self.run_phases().await {
            Ok(()) => {
                self.state = WireState::Done;
                tracing::info!("Wiring completed with {} instances", self.store.count());
                success(self);
            }
            Err(error) => {
                tracing::debug!("Wiring failed during {:?}", self.state);
                self.state = WireState::Failed;
                self.in_progress.clear();
                match self.exception_handler.as_mut() {
                    Some(handler) => handler(error),
                    None => self.sink.report(Severity::Error, &error),
                }
            }
        }

        self.state
    }

    async fn run_phases(&mut self) -> Result<(), WireError> {
        self.state = WireState::Resolving;
        for product in self.registry.products() {
            self.resolve_instance(product, None, true).await?;
        }

        self.state = WireState::Listening;
        for instance in self.notify_existing.clone() {
            self.fire_listeners(&instance).await?;
        }

        self.state = WireState::Initializing;
        for instance in self.store.instances() {
            if let Some(initializable) = instance.view::<dyn Initialize>() {
                initializable
                    .initialize()
                    .map_err(|error| WireError::InitializeFailed {
                        product: instance.info(),
                        error: Arc::new(error),
                    })?;
            }
        }

        Ok(())
    }
}
