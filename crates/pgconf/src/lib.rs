pub mod outcome;
pub mod registry;
pub mod reload;

pub use outcome::{Change, ReloadReport, ReloadRole};
pub use pgconf_core::registry::Context;
pub use registry::InMemoryRegistry;
pub use reload::{run as reload, ReloadOptions};
