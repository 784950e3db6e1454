use std::fmt;

use serde::Serialize;

use crate::{
    metadata::tables::{FieldAttributes, MethodAccessFlags, TypeAttributes},
    module::{FieldIndex, MethodIndex, Module, TypeIndex},
    publicize::{candidate_fields, flatten},
};

/// Number of members whose visibility was changed, per category.
///
/// Members that were already public are not counted.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Serialize)]
pub struct PublicizeStats {
    /// Types promoted to `public` or `nested public`
    pub types: usize,
    /// Methods promoted to `public`, property and event accessors included
    pub methods: usize,
    /// Fields promoted to `public`
    pub fields: usize,
}

impl PublicizeStats {
    /// Returns true if nothing was changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types == 0 && self.methods == 0 && self.fields == 0
    }
}

impl fmt::Display for PublicizeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} types, {} methods, {} fields",
            self.types, self.methods, self.fields
        )
    }
}

/// Make every type, method and field of `module` public.
///
/// Event-backing fields, identified by name through [`candidate_fields`], keep their
/// visibility. Running this twice leaves the module unchanged and reports zero changes.
pub fn publicize(module: &mut Module) -> PublicizeStats {
    let types: Vec<TypeIndex> = flatten(module).collect();
    let methods: Vec<MethodIndex> = types
        .iter()
        .filter_map(|index| module.type_def(*index))
        .flat_map(|type_def| type_def.methods().iter().copied())
        .collect();
    let fields = candidate_fields(module, &types);

    let stats = PublicizeStats {
        types: promote_types(module, &types),
        methods: promote_methods(module, &methods),
        fields: promote_fields(module, &fields),
    };

    log::debug!(
        "Promoted {} of {} types, {} of {} methods, {} of {} candidate fields",
        stats.types,
        types.len(),
        stats.methods,
        methods.len(),
        stats.fields,
        fields.len()
    );

    stats
}

/// Make `types` publicly visible, returning how many changed.
///
/// Nested types become `nested public`, all others `public`. Indices that do not
/// resolve to a type are skipped.
pub fn promote_types(module: &mut Module, types: &[TypeIndex]) -> usize {
    let mut changed = 0;

    for index in types {
        let Some(type_def) = module.type_def_mut(*index) else {
            continue;
        };

        if type_def.is_public() {
            continue;
        }

        if type_def.is_nested() {
            type_def.set_visibility(TypeAttributes::NESTED_PUBLIC);
        } else {
            type_def.set_visibility(TypeAttributes::PUBLIC);
        }
        changed += 1;
    }

    changed
}

/// Make `methods` public, returning how many changed.
pub fn promote_methods(module: &mut Module, methods: &[MethodIndex]) -> usize {
    let mut changed = 0;

    for index in methods {
        if let Some(method) = module.method_mut(*index) {
            if !method.is_public() {
                method.set_access(MethodAccessFlags::PUBLIC);
                changed += 1;
            }
        }
    }

    changed
}

/// Make `fields` public, returning how many changed.
pub fn promote_fields(module: &mut Module, fields: &[FieldIndex]) -> usize {
    let mut changed = 0;

    for index in fields {
        if let Some(field) = module.field_mut(*index) {
            if !field.is_public() {
                field.set_access(FieldAttributes::PUBLIC);
                changed += 1;
            }
        }
    }

    changed
}
