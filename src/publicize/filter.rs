use std::collections::HashSet;

use crate::module::{FieldIndex, Module, TypeIndex};

/// Names of every event declared by `types`.
#[must_use]
pub fn event_names<'a>(module: &'a Module, types: &[TypeIndex]) -> HashSet<&'a str> {
    types
        .iter()
        .filter_map(|index| module.type_def(*index))
        .flat_map(|type_def| type_def.events())
        .filter_map(|index| module.event(*index))
        .map(|event| event.name.as_str())
        .collect()
}

/// Fields of `types` that may be promoted.
///
/// Compilers store an event's delegate in a field named like the event, so every field
/// whose name equals the name of any event in `types` is left out. The match is by name
/// only: a field that happens to share its name with an unrelated event elsewhere in the
/// module is excluded as well.
#[must_use]
pub fn candidate_fields(module: &Module, types: &[TypeIndex]) -> Vec<FieldIndex> {
    let events = event_names(module, types);

    types
        .iter()
        .filter_map(|index| module.type_def(*index))
        .flat_map(|type_def| type_def.fields())
        .copied()
        .filter(|index| {
            module
                .field(*index)
                .is_some_and(|field| !events.contains(field.name.as_str()))
        })
        .collect()
}
