use std::sync::Arc;

use crate::{
    inject::{Arguments, Dependencies, Dependency},
    types::{DynError, Instance, TypeInfo},
};

type ListenerFn = Box<dyn Fn(&Instance, Arguments) -> Result<(), DynError> + Send + Sync>;

/// Hook fired once per newly built instance satisfying `target`
pub(crate) struct InstantiationListener {
    pub target: TypeInfo,
    pub dependencies: Vec<TypeInfo>,
    pub callback: ListenerFn,
}

impl InstantiationListener {
    pub(crate) fn new<T, D, F, E>(callback: F) -> Self
    where
        T: ?Sized + 'static,
        D: Dependencies + 'static,
        F: Fn(Arc<T>, D) -> Result<(), E> + Send + Sync + 'static,
        E: Into<DynError> + 'static,
    {
        let callback = move |instance: &Instance, arguments: Arguments| -> Result<(), DynError> {
            let target = <Arc<T> as Dependency>::extract(instance)?;
            let dependencies = D::extract(arguments)?;
            callback(target, dependencies).map_err(Into::into)
        };

        InstantiationListener {
            target: TypeInfo::of::<T>(),
            dependencies: D::parameters(),
            callback: Box::new(callback),
        }
    }
}

/// Listeners in registration order
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    listeners: Vec<Arc<InstantiationListener>>,
}

impl ListenerRegistry {
    pub(crate) fn register(&mut self, listener: InstantiationListener) {
        self.listeners.push(Arc::new(listener));
    }

    /// Listeners whose target the instance satisfies, in registration order
    pub(crate) fn matching(&self, instance: &Instance) -> Vec<Arc<InstantiationListener>> {
        self.listeners
            .iter()
            .filter(|listener| instance.satisfies(listener.target.type_id))
            .cloned()
            .collect()
    }
}
