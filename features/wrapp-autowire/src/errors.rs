use std::sync::Arc;

use thiserror::Error;

use crate::{
    teardown::CleanupErrors,
    types::{DynError, TypeInfo},
    wirer::WireState,
};

/// Errors raised while registering, resolving, wiring or tearing down
#[derive(Error, Debug, Clone)]
pub enum WireError {
    /// The convenience registration path needs exactly one constructor
    #[error(
        "Auto-wired type '{product}' needs exactly one public constructor, found {constructors}"
    )]
    InvalidRecipe {
        product: TypeInfo,
        constructors: usize,
    },

    /// No recipe satisfies the requested type
    #[error("Unknown dependency '{dependency}'{}", describe_requester(.required_by))]
    UnknownDependency {
        dependency: TypeInfo,
        required_by: Option<TypeInfo>,
    },

    /// More than one registered recipe satisfies the requested type
    #[error("Multiple recipes satisfy '{requested}': {}", describe_list(.candidates))]
    AmbiguousRecipe {
        requested: TypeInfo,
        candidates: Vec<TypeInfo>,
    },

    /// More than one live instance satisfies the requested type
    #[error("Multiple instances satisfy '{requested}': {}", describe_list(.candidates))]
    AmbiguousInstance {
        requested: TypeInfo,
        candidates: Vec<TypeInfo>,
    },

    #[error(
        "Circular dependency detected: '{dependency}' required by '{required_by}' through {}",
        describe_chain(.chain)
    )]
    CircularDependency {
        dependency: TypeInfo,
        required_by: TypeInfo,
        chain: Vec<TypeInfo>,
    },

    /// The resolution chain grew beyond the configured maximum depth
    #[error("Resolving '{requested}' exceeded the maximum depth of {depth}")]
    ResolutionTooDeep { requested: TypeInfo, depth: usize },

    /// A factory failed to build
    #[error("Factory for '{product}' failed - error: {error}")]
    ConstructionFailed {
        product: TypeInfo,
        error: Arc<DynError>,
    },

    #[error("Instantiation listener for '{target}' failed on '{instance}' - error: {error}")]
    ListenerFailed {
        target: TypeInfo,
        instance: TypeInfo,
        error: Arc<DynError>,
    },

    #[error("Initializing '{product}' failed - error: {error}")]
    InitializeFailed {
        product: TypeInfo,
        error: Arc<DynError>,
    },

    #[error(transparent)]
    CleanupFailed(#[from] CleanupErrors),

    #[error("Failed to downcast, required: '{required_type}' actual: '{actual_type}'")]
    DowncastFailed {
        required_type: &'static str,
        actual_type: &'static str,
    },

    /// A factory asked for more arguments than its recipe declared
    #[error("Argument {position} was requested but only {available} were resolved")]
    ArgumentMissing { position: usize, available: usize },

    #[error("The session can only be wired from the idle state, current state: {0:?}")]
    AlreadyWired(WireState),
}

impl WireError {
    /// Every type named by the error, in the order they appear in the message
    pub fn involved_types(&self) -> Vec<TypeInfo> {
        match self {
            WireError::InvalidRecipe { product, .. }
            | WireError::ConstructionFailed { product, .. }
            | WireError::InitializeFailed { product, .. } => vec![*product],
            WireError::UnknownDependency {
                dependency,
                required_by,
            } => std::iter::once(*dependency).chain(*required_by).collect(),
            WireError::AmbiguousRecipe {
                requested,
                candidates,
            }
            | WireError::AmbiguousInstance {
                requested,
                candidates,
            } => std::iter::once(*requested)
                .chain(candidates.iter().copied())
                .collect(),
            WireError::CircularDependency {
                dependency,
                required_by,
                ..
            } => vec![*dependency, *required_by],
            WireError::ResolutionTooDeep { requested, .. } => vec![*requested],
            WireError::ListenerFailed {
                target, instance, ..
            } => vec![*target, *instance],
            WireError::CleanupFailed(errors) => {
                errors.iter().map(|failure| failure.product).collect()
            }
            WireError::DowncastFailed { .. }
            | WireError::ArgumentMissing { .. }
            | WireError::AlreadyWired(_) => Vec::new(),
        }
    }
}

fn describe_requester(required_by: &Option<TypeInfo>) -> String {
    match required_by {
        Some(parent) => format!(" required by '{parent}'"),
        None => String::new(),
    }
}

fn describe_list(types: &[TypeInfo]) -> String {
    types
        .iter()
        .map(|info| format!("'{info}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_chain(chain: &[TypeInfo]) -> String {
    chain
        .iter()
        .map(TypeInfo::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}
