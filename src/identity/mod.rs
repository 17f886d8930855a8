//! Identity module
//!
//! Supplies the User-Agent values the search pipeline presents for each
//! surface, and replaces them when the quest engine reports a stall.

mod remote;
mod traits;

pub use remote::{HttpIdentityProvider, UserAgentDocument};
pub use traits::{IdentityHeaders, IdentityProvider, IdentitySource, RotationTarget};
