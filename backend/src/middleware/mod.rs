//! Request middleware.
//!
//! Purpose: request lifecycle concerns wrapped around every handler. From
//! the outside in: [`Trace`] scopes a trace identifier, [`NormalizeErrors`]
//! renders failures as JSON envelopes and [`AuthorizationGate`] applies the
//! access policy.

pub mod authorization;
pub mod error_normalizer;
pub mod trace;

pub use authorization::AuthorizationGate;
pub use error_normalizer::NormalizeErrors;
pub use trace::Trace;
