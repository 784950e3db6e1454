//! Integration tests for publicizing in-memory modules.

mod common;

use common::{library, AssemblyBuilder, PRIVATE, TYPE_NESTED_PRIVATE, TYPE_PUBLIC};
use publicizer::prelude::*;

#[test]
fn library_counts() -> Result<()> {
    let mut module = Module::from_mem(library())?;
    let stats = publicize(&mut module);

    assert_eq!(
        stats,
        PublicizeStats {
            types: 4,
            methods: 3,
            fields: 2
        }
    );
    Ok(())
}

#[test]
fn everything_public_except_event_fields() -> Result<()> {
    let mut module = Module::from_mem(library())?;
    publicize(&mut module);

    let reloaded = Module::from_mem(module.serialize()?)?;
    for index in flatten(&reloaded) {
        let type_def = reloaded.type_def(index).unwrap();
        assert!(type_def.is_public(), "{} is not public", type_def.full_name());
    }
    assert!(reloaded.methods().iter().all(MethodDef::is_public));

    for field in reloaded.fields() {
        assert_eq!(field.is_public(), field.name != "Stopped", "{}", field.name);
    }
    Ok(())
}

#[test]
fn only_flags_change() -> Result<()> {
    let original = library();
    let mut module = Module::from_mem(original.clone())?;
    publicize(&mut module);
    let publicized = module.serialize()?;

    assert_eq!(publicized.len(), original.len());
    let changed = original
        .iter()
        .zip(&publicized)
        .filter(|(before, after)| before != after)
        .count();
    // One byte per promoted type, method and field
    assert_eq!(changed, 4 + 3 + 2);
    Ok(())
}

#[test]
fn second_run_changes_nothing() -> Result<()> {
    let mut module = Module::from_mem(library())?;
    publicize(&mut module);
    let first = module.serialize()?;

    let mut again = Module::from_mem(first.clone())?;
    assert!(publicize(&mut again).is_empty());
    assert_eq!(again.serialize()?, first);
    Ok(())
}

#[test]
fn parents_before_nested() -> Result<()> {
    let module = Module::from_mem(library())?;
    let order: Vec<TypeIndex> = flatten(&module).collect();

    assert_eq!(order.len(), module.types().len());
    for (position, index) in order.iter().enumerate() {
        if let Some(parent) = module.type_def(*index).unwrap().enclosing() {
            let parent_position = order.iter().position(|i| *i == parent).unwrap();
            assert!(parent_position < position);
        }
    }
    Ok(())
}

#[test]
fn pointer_tables_and_wide_strings() -> Result<()> {
    let mut builder = AssemblyBuilder::new();
    builder.set_type_flags(0, TYPE_PUBLIC);
    let outer = builder.add_type("Acme", "Outer", TYPE_PUBLIC);
    let inner = builder.add_nested_type(outer, "Inner", TYPE_NESTED_PRIVATE);
    builder
        .add_method(inner, "Work", PRIVATE)
        .add_field(inner, "_state", PRIVATE)
        .add_field(inner, "Changed", PRIVATE)
        .add_event(inner, "Changed")
        .with_pointer_tables()
        .wide_string_indices();

    let mut module = Module::from_mem(builder.build())?;
    let stats = publicize(&mut module);
    assert_eq!((stats.types, stats.methods, stats.fields), (1, 1, 1));

    let reloaded = Module::from_mem(module.serialize()?)?;
    let changed = reloaded.fields().iter().find(|f| f.name == "Changed").unwrap();
    assert!(!changed.is_public());
    Ok(())
}

#[test]
fn rejects_images_without_clr_header() {
    let mut builder = AssemblyBuilder::new();
    builder.without_clr_header();

    let error = Module::from_mem(builder.build()).err().unwrap();
    assert_eq!(error.exit_code(), publicizer::EXIT_INVALID_MODULE);
}
