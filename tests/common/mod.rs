//! Helpers shared by the integration tests.

#![allow(dead_code)]

#[path = "../../src/test/builder.rs"]
mod builder;

pub use builder::AssemblyBuilder;

pub const PRIVATE: u16 = 0x0001;
pub const FAMILY: u16 = 0x0004;
pub const PUBLIC: u16 = 0x0006;

pub const TYPE_NOT_PUBLIC: u32 = 0x0000_0000;
pub const TYPE_PUBLIC: u32 = 0x0000_0001;
pub const TYPE_NESTED_PRIVATE: u32 = 0x0000_0003;

/// A small library: a public service with an event, a private helper nested two deep.
pub fn library() -> Vec<u8> {
    let mut builder = AssemblyBuilder::new();
    let service = builder.add_type("Acme.Core", "Service", TYPE_PUBLIC);
    let cache = builder.add_nested_type(service, "Cache", TYPE_NESTED_PRIVATE);
    let entry = builder.add_nested_type(cache, "Entry", TYPE_NESTED_PRIVATE);
    let internal = builder.add_type("Acme.Core", "Internals", TYPE_NOT_PUBLIC);

    builder
        .add_method(service, "Start", PUBLIC)
        .add_method(service, "OnStopped", FAMILY)
        .add_field(service, "Stopped", PRIVATE)
        .add_field(service, "_cache", PRIVATE)
        .add_event(service, "Stopped")
        .add_method(cache, "Evict", PRIVATE)
        .add_field(entry, "Key", PRIVATE)
        .add_method(internal, "Log", PRIVATE);
    builder.build()
}
