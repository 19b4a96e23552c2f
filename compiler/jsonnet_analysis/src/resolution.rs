//! Per-variable resolution side table.

use jsonnet_ir::CoreId;

/// Where a variable lives at runtime: `up` frames above the frame current
/// at the use site, in slot `slot` of that frame.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct VarRef {
    pub up: u32,
    pub slot: u32,
}

/// Resolution of every analysed `Var` node, indexed by [`CoreId`].
///
/// Grows with the arena; entries for nodes that are not variables, or that
/// have not been analysed yet, are `None`.
#[derive(Default, Debug)]
pub struct Resolutions {
    refs: Vec<Option<VarRef>>,
}

impl Resolutions {
    pub fn new() -> Self {
        Resolutions::default()
    }

    #[inline]
    pub fn get(&self, id: CoreId) -> Option<VarRef> {
        self.refs.get(id.index()).copied().flatten()
    }

    pub(crate) fn reserve_for(&mut self, nodes: usize) {
        if self.refs.len() < nodes {
            self.refs.resize(nodes, None);
        }
    }

    pub(crate) fn set(&mut self, id: CoreId, var: VarRef) {
        self.refs[id.index()] = Some(var);
    }

    /// Number of resolved variables.
    pub fn resolved(&self) -> usize {
        self.refs.iter().filter(|r| r.is_some()).count()
    }
}
