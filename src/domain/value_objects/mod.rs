//! Domain Value Objects
//!
//! Immutable value types shared by the pipeline stages.

mod config_warning;
mod hash;
mod mode;
mod module_id;
mod module_type;

pub use config_warning::ConfigWarning;
pub use hash::ContentHash;
pub use mode::Mode;
pub use module_id::ModuleId;
pub use module_type::ModuleType;
