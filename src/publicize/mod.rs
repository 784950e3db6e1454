//! The visibility rewriting engine.
//!
//! Publicizing a module happens in three steps:
//!
//! 1. [`flatten`] enumerates every type at every nesting depth
//! 2. [`candidate_fields`] drops event-backing fields from the field set
//! 3. [`publicize`] promotes types, methods and the remaining fields
//!
//! The three promotion passes touch disjoint flags and do not read each other's
//! results, so their order does not matter.
//!
//! # Examples
//!
//! ```rust,no_run
//! use publicizer::{publicize, Module};
//! use std::path::Path;
//!
//! let mut module = Module::from_file(Path::new("Library.dll"))?;
//! let stats = publicize(&mut module);
//! println!("Promoted {stats}");
//! # Ok::<(), publicizer::Error>(())
//! ```

mod enumerator;
mod filter;
mod promoter;

pub use enumerator::{flatten, TypeIter};
pub use filter::{candidate_fields, event_names};
pub use promoter::{promote_fields, promote_methods, promote_types, publicize, PublicizeStats};
