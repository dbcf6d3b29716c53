//! osmfetch: fetch OpenStreetMap features for a bounding box from an Overpass
//! endpoint, optionally group them into semantic categories, and save them as
//! JSON.
//!
//! Layers:
//! - [`domain`]: bounding box, elements, query building, categorization
//! - [`application`]: fetch and export services over I/O traits
//! - [`infrastructure`]: ureq transport, filesystem, service container
//! - [`cli`]: argument parsing, command execution, terminal output
//! - [`config`]: layered settings

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
