use futures::{future::BoxFuture, FutureExt};

use crate::{
    diagnostics::Severity,
    errors::WireError,
    inject::Arguments,
    store::InstanceRecord,
    types::{Instance, TypeInfo},
    wirer::{WireState, Wirer},
};

/// Types currently on the resolution call stack, outermost first
#[derive(Default)]
pub(crate) struct InProgress {
    chain: Vec<TypeInfo>,
}

impl InProgress {
    /// Marks the type as in progress
    ///
    /// Returns the cycle, closed by `info`, if it already was.
    pub(crate) fn enter(&mut self, info: TypeInfo) -> Result<(), Vec<TypeInfo>> {
        if let Some(start) = self.chain.iter().position(|entry| *entry == info) {
            let mut cycle = self.chain[start..].to_vec();
            cycle.push(info);
            return Err(cycle);
        }

        self.chain.push(info);
        Ok(())
    }

    pub(crate) fn leave(&mut self, info: TypeInfo) {
        debug_assert_eq!(self.chain.last(), Some(&info), "resolution left out of order");
        if let Some(position) = self.chain.iter().rposition(|entry| *entry == info) {
            self.chain.remove(position);
        }
    }

    pub(crate) fn depth(&self) -> usize {
        self.chain.len()
    }

    pub(crate) fn clear(&mut self) {
        self.chain.clear();
    }
}

impl Wirer {
    /// Drops the bookkeeping of a resolve or wire future which was dropped before
    /// it completed
    ///
    /// Must only be called from a public entry point. Holding `&mut self` there
    /// means no resolution is running, so every in-progress entry is stale.
    pub(crate) fn discard_interrupted(&mut self) {
        if self.in_progress.depth() > 0 {
            tracing::debug!(
                "Discarding {} in-progress entries of an interrupted resolution",
                self.in_progress.depth()
            );
            self.in_progress.clear();
        }

        if matches!(
            self.state,
            WireState::Resolving | WireState::Listening | WireState::Initializing
        ) {
            tracing::debug!("Wiring was interrupted during {:?}", self.state);
            self.state = WireState::Idle;
        }
    }

    /// Returns the cached singleton satisfying `requested`, or builds one
    ///
    /// A cached instance is only looked up before `requested` is marked in progress,
    /// so a request for a type still being built is reported as a cycle instead of
    /// handing out a half built value.
    pub(crate) fn resolve_instance(
        &mut self,
        requested: TypeInfo,
        required_by: Option<TypeInfo>,
        singleton: bool,
    ) -> BoxFuture<'_, Result<Instance, WireError>> {
        async move {
            if singleton {
                if let Some(existing) = self.find_instance_info(requested) {
                    return Ok(existing);
                }
            }

            let depth = self.in_progress.depth();
            if depth >= self.config.max_resolution_depth {
                return Err(WireError::ResolutionTooDeep { requested, depth });
            }

            if let Err(chain) = self.in_progress.enter(requested) {
                return Err(WireError::CircularDependency {
                    dependency: requested,
                    required_by: required_by.unwrap_or(requested),
                    chain,
                });
            }

            let result = self.instantiate(requested, required_by, singleton).await;
            self.in_progress.leave(requested);
            result
        }
        .boxed()
    }

    async fn instantiate(
        &mut self,
        requested: TypeInfo,
        required_by: Option<TypeInfo>,
        singleton: bool,
    ) -> Result<Instance, WireError> {
        let recipe = self
            .registry
            .find(requested)?
            .ok_or(WireError::UnknownDependency {
                dependency: requested,
                required_by,
            })?;

        // Dependencies are always shared, whatever the scope of the outer request
        let mut arguments = Vec::with_capacity(recipe.parameters.len());
        for parameter in &recipe.parameters {
            let argument = self
                .resolve_instance(*parameter, Some(requested), true)
                .await?;
            arguments.push(argument);
        }

        let instance = recipe.construct(arguments).await?;
        tracing::debug!("Constructed instance of {}", recipe.product);

        self.fire_listeners(&instance).await?;

        if singleton {
            self.store.push(InstanceRecord {
                instance: instance.clone(),
                produced_by: Some(recipe),
            });
        }

        Ok(instance)
    }

    /// Runs every listener whose target the instance satisfies
    ///
    /// Listener dependencies are resolved as singletons and failing to resolve them
    /// is fatal, a failing callback is only reported.
    pub(crate) async fn fire_listeners(&mut self, instance: &Instance) -> Result<(), WireError> {
        for listener in self.listeners.matching(instance) {
            let mut arguments = Vec::with_capacity(listener.dependencies.len());
            for dependency in &listener.dependencies {
                let argument = self
                    .resolve_instance(*dependency, Some(instance.info()), true)
                    .await?;
                arguments.push(argument);
            }

            if let Err(error) = (listener.callback)(instance, Arguments::new(arguments)) {
                let error = WireError::ListenerFailed {
                    target: listener.target,
                    instance: instance.info(),
                    error: error.into(),
                };
                self.report(Severity::Error, &error);
            }
        }

        Ok(())
    }

    /// Instance store lookup, ambiguity is reported and treated as not found
    pub(crate) fn find_instance_info(&self, requested: TypeInfo) -> Option<Instance> {
        match self.store.find(requested) {
            Ok(found) => found,
            Err(error) => {
                self.report(Severity::Error, &error);
                None
            }
        }
    }
}
