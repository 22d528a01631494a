//! Wrapp Autowire builds the object graph of an application from a registry of
//! recipes.
//!
//! Every recipe describes how to construct one type and which other types it
//! depends on. Wiring resolves all recipes transitively into shared singletons,
//! detects circular dependencies and later tears everything down in reverse
//! construction order.
//!
//! Wrapp Autowire consists of the following components:
//!
//! 1. Recipes - [Recipe], [Constructor] and [Autowire] describe how types are built
//! 2. Contracts - [Contracts] declares which traits a type may be requested as
//! 3. Wirer - [Wirer] resolves, initializes and tears down all instances
//! 4. Errors - [WireError] and the [DiagnosticSink] receiving non fatal errors
//!
//! # Example
//!
//! ```rust
//! use std::{convert::Infallible, sync::Arc};
//! use wrapp_autowire::{Recipe, WireState, Wirer};
//!
//! trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//!
//! struct FixedClock;
//! impl Clock for FixedClock {
//!     fn now(&self) -> u64 {
//!         42
//!     }
//! }
//!
//! struct Scheduler {
//!     clock: Arc<dyn Clock>,
//! }
//!
//! let mut wirer = Wirer::new();
//! wirer
//!     .add_singleton(
//!         Recipe::from_fn(|()| Ok::<_, Infallible>(FixedClock))
//!             .contracts(|c| c.satisfies::<dyn Clock>(|this| this as Arc<dyn Clock>)),
//!     )
//!     .add_singleton(Recipe::new(|(clock,): (Arc<dyn Clock>,)| async move {
//!         Ok::<_, Infallible>(Scheduler { clock })
//!     }));
//!
//! assert_eq!(futures::executor::block_on(wirer.wire()), WireState::Done);
//! assert_eq!(wirer.find_instance::<Scheduler>().unwrap().clock.now(), 42);
//! ```

pub mod config;
pub mod contracts;
pub mod diagnostics;
pub mod errors;
pub mod factories;
pub mod inject;
pub mod lifecycle;
mod listeners;
mod registry;
mod resolver;
mod store;
pub mod teardown;
pub mod types;
pub mod wirer;

pub use config::WirerConfig;
pub use contracts::Contracts;
pub use diagnostics::{DiagnosticSink, Severity, TracingSink};
pub use errors::WireError;
pub use factories::{Autowire, Constructor, InstanceFactory, Recipe};
pub use inject::{Arguments, Dependencies, Dependency};
pub use lifecycle::{Cleanup, Initialize};
pub use teardown::{CleanupErrors, CleanupFailure, CleanupStage};
pub use types::{DynError, Injectable, Instance, TypeInfo};
pub use wirer::{WireState, Wirer};
