//! # Command Handlers
//!
//! Handlers for the `dsctl` CLI, one submodule per top-level command.
//!
//! - `schema` - schema commands (create, list, get, update, delete, validate)
//! - `instance` - instance commands (create, list, get, update, delete)
//! - `shared` - argument checks, id parsing, document loading
//! - `errors` - user-facing error extraction

pub mod errors;
pub mod instance;
pub mod schema;
pub mod shared;

pub use instance::handle_instance_command;
pub use schema::handle_schema_command;
