//! .NET metadata parsing.
//!
//! This module walks the path from the CLR runtime header to the metadata tables:
//! the CLI header locates the metadata root, the root lists the streams, and the tables
//! stream header locates each table.
//!
//! # Key Components
//!
//! - [`crate::metadata::cor20header::Cor20Header`] - The CLI header
//! - [`crate::metadata::root::Root`] - The metadata root and its stream headers
//! - [`crate::metadata::streams`] - `#Strings` and tables stream access
//! - [`crate::metadata::tables`] - Table layout, rows and visibility flags
//! - [`crate::metadata::token::Token`] - Metadata tokens
//!
//! # Reference
//! - ECMA-335 6th Edition, Partition II, Sections 22 to 25

pub mod cor20header;
pub mod root;
pub mod streams;
pub mod tables;
pub mod token;
