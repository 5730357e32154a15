//! Maps a call site's `(owner type, member name)` to the [`FunctionId`] that
//! declares it, when one exists in this module. Shared by call-graph
//! construction (Phase 1) and per-function effect inference
//! (Phase 3), so a call resolves to the same function in both passes.

use crate::ast::Function;
use crate::shared::FunctionId;
use std::collections::HashMap;

pub struct CallIndex {
    by_owner_and_name: HashMap<(Option<String>, String), FunctionId>,
}

impl CallIndex {
    pub fn build(functions: &[&Function]) -> Self {
        let mut by_owner_and_name = HashMap::new();
        for f in functions {
            by_owner_and_name.insert((f.owner_type.clone(), f.name.clone()), f.id);
        }
        Self { by_owner_and_name }
    }

    /// Free-function call: `callee(args)`.
    pub fn resolve_free(&self, name: &str) -> Option<FunctionId> {
        self.by_owner_and_name.get(&(None, name.to_string())).copied()
    }

    /// Method/constructor call: `Type::member(args)`.
    pub fn resolve_member(&self, owner: &str, name: &str) -> Option<FunctionId> {
        self.by_owner_and_name
            .get(&(Some(owner.to_string()), name.to_string()))
            .copied()
    }
}
