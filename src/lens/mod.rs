//! Lens module
//!
//! Lenses combine store operations with output formatting so every front end
//! (the CLI today) shares the same behavior.
//!
//! | Lens | Feature Required | Dependencies |
//! |------|-----------------|--------------|
//! | `TimeLens` | `lens-core` | chrono, chrono-humanize, dateparser |
//! | `MemoLens` | `lens-core` | rusqlite (via `database`) |
//!
//! Each lens module exports a lens struct, its argument structs and its
//! output row types. Table output additionally needs the `display` feature.
//!
//! ```rust,ignore
//! use memodb::lens::memo::{MemoLens, MemoSearchArgs};
//! use memodb::lens::time::TimeLens;
//! ```

pub mod utils;

pub mod memo;
pub mod time;
