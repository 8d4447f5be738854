//! Records exchanged with the Listinator API.
//!
//! Field names follow the server's JSON encoding, which uses the Go struct
//! field names verbatim (`ID`, `ListID`, `CreatedAt`, ...). The Rust side
//! uses snake_case and renames at the serde boundary.
//!
//! # Core Concepts
//!
//! - [`List`]: A shopping list. Lists are anonymous and addressed by id only.
//! - [`Entry`]: A single item on a list, optionally classified by a type.
//! - [`ItemType`]: A category for entries ("fruit", "dairy", ...). Served as
//!   `Type` by the API; renamed here because `type` is a keyword.
//! - [`Credentials`] / [`SessionInfo`]: Sign-in body and the id of the account
//!   behind the session cookie.

mod entry;
mod item_type;
mod list;
mod session;

pub use entry::*;
pub use item_type::*;
pub use list::*;
pub use session::*;
