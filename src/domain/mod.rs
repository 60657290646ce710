//! Domain Layer
//!
//! The core of Sheaf: the bundling pipeline without direct I/O.
//!
//! ## Structure
//!
//! - `entities/` - Module records, the module graph, chunks, assets, manifest
//! - `value_objects/` - Immutable value types (ModuleId, ContentHash, Mode)
//! - `services/` - Resolver, transform chain, graph builder, splitter, emitter
//! - `ports/` - Interfaces infrastructure implements (file system, output
//!   sink, transform units, optimizers, reload notification)

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
