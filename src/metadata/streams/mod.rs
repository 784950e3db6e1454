//! Metadata stream headers and the heaps the publicizer reads.
//!
//! Only `#Strings` (for names) and the tables stream (for rows) are decoded; the
//! remaining heaps are located through their headers and never touched.

mod streamheader;
pub use streamheader::StreamHeader;

mod strings;
pub use strings::Strings;

mod tablesheader;
pub use tablesheader::TablesHeader;
