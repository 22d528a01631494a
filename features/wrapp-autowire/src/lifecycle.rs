use crate::types::DynError;

/// Invoked once per stored instance after all instances are constructed and all
/// instantiation listeners ran, in construction order
///
/// Only called when the type declared it through
/// [Contracts::initializable](crate::Contracts::initializable), implementing the
/// trait alone is not enough.
pub trait Initialize {
    fn initialize(&self) -> Result<(), DynError>;
}

/// Invoked during teardown, in reverse construction order
///
/// Only called when the type declared it through
/// [Contracts::cleanable](crate::Contracts::cleanable), implementing the trait
/// alone is not enough.
pub trait Cleanup {
    fn cleanup(&self) -> Result<(), DynError>;
}
