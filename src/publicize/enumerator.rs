use crate::module::{Module, TypeIndex};

/// Lazy traversal over every type of a module at every nesting depth.
///
/// A group of sibling types is yielded in declaration order before any of their nested
/// types; then the nested types of the first sibling are traversed completely, then
/// those of the second, and so on. Top-level types therefore come first, and every
/// enclosing type precedes its own nested types.
///
/// The traversal keeps an explicit stack of pending sibling groups, so nesting depth is
/// not limited by the call stack.
#[derive(Clone)]
pub struct TypeIter<'a> {
    module: &'a Module,
    pending: Vec<&'a [TypeIndex]>,
    current: &'a [TypeIndex],
    position: usize,
}

impl<'a> TypeIter<'a> {
    /// Traverse `roots` and everything nested within them.
    #[must_use]
    pub fn new(module: &'a Module, roots: &'a [TypeIndex]) -> Self {
        TypeIter {
            module,
            pending: Vec::new(),
            current: roots,
            position: 0,
        }
    }

    /// Push the nested groups of the finished sibling group, first sibling on top.
    fn schedule_nested(&mut self) {
        for index in self.current.iter().rev() {
            if let Some(type_def) = self.module.type_def(*index) {
                if !type_def.nested().is_empty() {
                    self.pending.push(type_def.nested());
                }
            }
        }
    }
}

impl Iterator for TypeIter<'_> {
    type Item = TypeIndex;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(index) = self.current.get(self.position) {
                self.position += 1;
                return Some(*index);
            }

            self.schedule_nested();
            self.current = self.pending.pop()?;
            self.position = 0;
        }
    }
}

/// Every type of `module`, starting from its top-level types.
#[must_use]
pub fn flatten(module: &Module) -> TypeIter<'_> {
    TypeIter::new(module, module.top_level())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::{metadata::tables::TypeAttributes, test::AssemblyBuilder};

    fn names(module: &Module) -> Vec<String> {
        flatten(module)
            .map(|index| module.type_def(index).unwrap().name.clone())
            .collect()
    }

    #[test]
    fn empty_roots() {
        let module = Module::from_mem(AssemblyBuilder::new().build()).unwrap();
        assert_eq!(TypeIter::new(&module, &[]).count(), 0);
    }

    #[test]
    fn siblings_before_nested() {
        let mut builder = AssemblyBuilder::new();
        let a = builder.add_type("N", "A", TypeAttributes::PUBLIC);
        let b = builder.add_type("N", "B", TypeAttributes::PUBLIC);
        let a1 = builder.add_nested_type(a, "A1", TypeAttributes::NESTED_PRIVATE);
        builder.add_nested_type(a, "A2", TypeAttributes::NESTED_PRIVATE);
        builder.add_nested_type(b, "B1", TypeAttributes::NESTED_PRIVATE);
        builder.add_nested_type(a1, "A1x", TypeAttributes::NESTED_PRIVATE);

        let module = Module::from_mem(builder.build()).unwrap();

        // flatten(s) = s ++ flatten(nested(A)) ++ flatten(nested(B))
        assert_eq!(
            names(&module),
            vec!["<Module>", "A", "B", "A1", "A2", "A1x", "B1"]
        );
    }

    #[test]
    fn deep_nesting() {
        let depth = 200;
        let mut builder = AssemblyBuilder::new();
        let mut outer = builder.add_type("Deep", "Level0", TypeAttributes::NOT_PUBLIC);
        for level in 1..depth {
            outer = builder.add_nested_type(
                outer,
                &format!("Level{level}"),
                TypeAttributes::NESTED_PRIVATE,
            );
        }

        let module = Module::from_mem(builder.build()).unwrap();
        let order: Vec<TypeIndex> = flatten(&module).collect();

        // <Module> plus every level, each exactly once
        assert_eq!(order.len(), depth + 1);
        assert_eq!(order.iter().collect::<HashSet<_>>().len(), depth + 1);

        // Parents precede their nested types
        for (position, index) in order.iter().enumerate() {
            if let Some(enclosing) = module.type_def(*index).unwrap().enclosing() {
                let parent_position = order.iter().position(|i| *i == enclosing).unwrap();
                assert!(parent_position < position);
            }
        }
    }

    #[test]
    fn restartable() {
        let mut builder = AssemblyBuilder::new();
        let a = builder.add_type("N", "A", TypeAttributes::PUBLIC);
        builder.add_nested_type(a, "A1", TypeAttributes::NESTED_PRIVATE);
        let module = Module::from_mem(builder.build()).unwrap();

        let iter = flatten(&module);
        let first: Vec<TypeIndex> = iter.clone().collect();
        let second: Vec<TypeIndex> = iter.collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), module.types().len());
    }
}
