//! The variable table (spec.md §3 "Variable table", §4.6).

use rustc_hash::FxHashMap;

use crate::typestr::TypeString;

type VarMap = FxHashMap<String, TypeString>;

/// One frame of the variable-table stack (spec.md §3, §4.6). Each frame
/// carries its own variable mapping plus a `pending` list of vars-maps
/// handed up by child Branch frames already popped, waiting to be merged
/// in by `pruneBranches`.
#[derive(Debug, Clone)]
enum Frame {
    Scope { vars: VarMap, pending: Vec<VarMap> },
    Branch { vars: VarMap, pending: Vec<VarMap> },
}

impl Frame {
    fn vars(&self) -> &VarMap {
        match self {
            Frame::Scope { vars, .. } | Frame::Branch { vars, .. } => vars,
        }
    }

    fn vars_mut(&mut self) -> &mut VarMap {
        match self {
            Frame::Scope { vars, .. } | Frame::Branch { vars, .. } => vars,
        }
    }

    fn pending_mut(&mut self) -> &mut Vec<VarMap> {
        match self {
            Frame::Scope { pending, .. } | Frame::Branch { pending, .. } => pending,
        }
    }
}

/// A stack of Scope/Branch frames tracking variable types through a single
/// function/method body traversal (spec.md §4.6).
///
/// Grounded in shape on a push/pop scope stack with a "carry" list, as the
/// teacher's extraction context uses for name prefixes; here the carried
/// value is a variable's type rather than a name prefix.
#[derive(Debug, Clone, Default)]
pub struct VariableTable {
    frames: Vec<Frame>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// spec.md §4.6 `pushScope(carry?)`: carried variables' current types
    /// are read from the enclosing scopes before the new frame hides them.
    pub fn push_scope(&mut self, carry: &[String]) {
        let mut vars = VarMap::default();
        for name in carry {
            let ty = self.get_type(name, "");
            if !ty.is_empty() {
                vars.insert(name.clone(), ty);
            }
        }
        self.frames.push(Frame::Scope { vars, pending: Vec::new() });
    }

    /// spec.md §4.6 `popScope`.
    pub fn pop_scope(&mut self) {
        self.frames.pop();
    }

    /// spec.md §4.6 `pushBranch`: pushed under the current top.
    pub fn push_branch(&mut self) {
        self.frames.push(Frame::Branch { vars: VarMap::default(), pending: Vec::new() });
    }

    /// spec.md §4.6 `popBranch`: the popped branch's variable mapping is
    /// handed up into the new top's pending list for a later
    /// `pruneBranches` to merge. A no-op (not a Scope pop) if the top isn't
    /// a Branch — a mis-timed call must never destroy an enclosing Scope.
    pub fn pop_branch(&mut self) {
        if !matches!(self.frames.last(), Some(Frame::Branch { .. })) {
            return;
        }
        let Some(Frame::Branch { vars, .. }) = self.frames.pop() else {
            unreachable!("checked above");
        };
        if let Some(top) = self.frames.last_mut() {
            top.pending_mut().push(vars);
        }
    }

    /// spec.md §4.6 `pruneBranches`: merge every pending child-branch
    /// mapping into the current top's variables via TypeString set-union,
    /// then clear the pending list.
    pub fn prune_branches(&mut self) {
        let Some(top) = self.frames.last_mut() else {
            return;
        };
        let pending = std::mem::take(top.pending_mut());
        for branch_vars in pending {
            for (name, ty) in branch_vars {
                let vars = top.vars_mut();
                match vars.get(&name) {
                    Some(existing) => {
                        let union = existing.merge(ty);
                        vars.insert(name, union);
                    }
                    None => {
                        vars.insert(name, ty);
                    }
                }
            }
        }
    }

    /// spec.md §4.6 `setType`: ignores empty/missing types.
    pub fn set_type(&mut self, name: &str, ty: TypeString) {
        if ty.is_empty() {
            return;
        }
        if let Some(top) = self.frames.last_mut() {
            top.vars_mut().insert(name.to_string(), ty);
        }
    }

    /// spec.md §4.6 `setTypeMany`.
    pub fn set_type_many(&mut self, names: &[String], ty: TypeString) {
        for name in names {
            self.set_type(name, ty.clone());
        }
    }

    /// spec.md §4.6 `getType(name, thisName)`: `$this` resolves to
    /// `thisName` directly; otherwise walks frames top-down, stopping (with
    /// an empty result) the moment a Scope frame is reached with no match —
    /// `getType` never crosses a Scope boundary upward.
    pub fn get_type(&self, name: &str, this_name: &str) -> TypeString {
        if name == "$this" {
            return TypeString::parse(this_name);
        }
        for frame in self.frames.iter().rev() {
            if let Some(ty) = frame.vars().get(name) {
                return ty.clone();
            }
            if matches!(frame, Frame::Scope { .. }) {
                return TypeString::empty();
            }
        }
        TypeString::empty()
    }
}
