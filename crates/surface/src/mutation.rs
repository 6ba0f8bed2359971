use crate::SurfaceRef;
use std::fmt;

/// The kind of change a [`MutationRecord`] describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MutationKind {
    ChildList,
    Attributes,
    CharacterData,
}

/// One structural change to a container, as a mutation observer reports it.
#[derive(Clone)]
pub struct MutationRecord {
    pub kind: MutationKind,
    pub added_nodes: Vec<SurfaceRef>,
    pub removed_nodes: Vec<SurfaceRef>,
}

impl MutationRecord {
    pub fn child_list(added_nodes: Vec<SurfaceRef>, removed_nodes: Vec<SurfaceRef>) -> Self {
        Self {
            kind: MutationKind::ChildList,
            added_nodes,
            removed_nodes,
        }
    }

    pub fn added(node: SurfaceRef) -> Self {
        Self::child_list(vec![node], Vec::new())
    }

    pub fn removed(node: SurfaceRef) -> Self {
        Self::child_list(Vec::new(), vec![node])
    }

    /// Feed this record to `listener`: added nodes first, then removed nodes,
    /// each in the order given. Records other than child-list changes are
    /// skipped.
    pub fn dispatch(&self, listener: &dyn ChildSetListener) {
        if self.kind != MutationKind::ChildList {
            log::trace!("skipping {:?} mutation record", self.kind);
            return;
        }
        for node in &self.added_nodes {
            listener.on_child_added(node);
        }
        for node in &self.removed_nodes {
            listener.on_child_removed(node);
        }
    }
}

impl fmt::Debug for MutationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids = |nodes: &[SurfaceRef]| nodes.iter().map(|n| n.id()).collect::<Vec<_>>();
        f.debug_struct("MutationRecord")
            .field("kind", &self.kind)
            .field("added_nodes", &ids(&self.added_nodes))
            .field("removed_nodes", &ids(&self.removed_nodes))
            .finish()
    }
}

/// Receives the direct-child changes of a container.
pub trait ChildSetListener {
    fn on_child_added(&self, node: &SurfaceRef);

    fn on_child_removed(&self, node: &SurfaceRef);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemorySurface, SurfaceId};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Journal(RefCell<Vec<(&'static str, SurfaceId)>>);

    impl ChildSetListener for Journal {
        fn on_child_added(&self, node: &SurfaceRef) {
            self.0.borrow_mut().push(("added", node.id()));
        }

        fn on_child_removed(&self, node: &SurfaceRef) {
            self.0.borrow_mut().push(("removed", node.id()));
        }
    }

    #[test]
    fn dispatch_keeps_record_order() {
        let a: SurfaceRef = Rc::new(MemorySurface::element("div"));
        let b: SurfaceRef = Rc::new(MemorySurface::element("div"));
        let c: SurfaceRef = Rc::new(MemorySurface::element("div"));
        let record = MutationRecord::child_list(vec![a.clone(), b.clone()], vec![c.clone()]);

        let journal = Journal::default();
        record.dispatch(&journal);

        assert_eq!(
            *journal.0.borrow(),
            vec![("added", a.id()), ("added", b.id()), ("removed", c.id())]
        );
    }

    #[test]
    fn attribute_records_are_skipped() {
        let a: SurfaceRef = Rc::new(MemorySurface::element("div"));
        let record = MutationRecord {
            kind: MutationKind::Attributes,
            added_nodes: vec![a],
            removed_nodes: Vec::new(),
        };

        let journal = Journal::default();
        record.dispatch(&journal);
        assert!(journal.0.borrow().is_empty());
    }
}
