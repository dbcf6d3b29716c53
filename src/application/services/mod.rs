//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, OverpassTransport)
//! but are themselves concrete structs, not traits.

mod export;
mod fetch;

pub use export::ExportService;
pub use fetch::FetchService;
