use std::cell::{Cell, RefCell};

use slab::Slab;

use crate::{
    base::{INullableValue, SlabRef},
    impl_slabref,
    ir::{
        FuncRef, InstData, InstRef,
        inst::usedef::{ITraceableValue, UserList},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockRef(usize);
impl_slabref!(BlockRef, BlockData);

/// A basic block: an ordered run of instructions whose last member is the
/// terminator.
pub struct BlockData {
    insts: RefCell<Vec<InstRef>>,
    pub parent_func: Cell<FuncRef>,
    pub self_ref: Cell<BlockRef>,
    pub users: UserList,
}

impl BlockData {
    pub fn new_empty() -> Self {
        Self {
            insts: RefCell::new(Vec::new()),
            parent_func: Cell::new(FuncRef::new_null()),
            self_ref: Cell::new(BlockRef::new_null()),
            users: UserList::new(),
        }
    }

    pub fn dump_insts(&self) -> Vec<InstRef> {
        self.insts.borrow().clone()
    }

    pub fn get_terminator(&self, alloc_inst: &Slab<InstData>) -> Option<InstRef> {
        let insts = self.insts.borrow();
        let last = *insts.last()?;
        if last.to_data(alloc_inst).is_terminator() { Some(last) } else { None }
    }

    /// Inserts before the terminator, or at the end while no terminator is
    /// attached yet.
    pub(crate) fn attach_inst(&self, alloc_inst: &Slab<InstData>, inst: InstRef) {
        inst.to_data(alloc_inst)
            .get_common()
            .parent_bb
            .set(self.self_ref.get());
        let mut insts = self.insts.borrow_mut();
        let at = match insts.last() {
            Some(last) if last.to_data(alloc_inst).is_terminator() => insts.len() - 1,
            _ => insts.len(),
        };
        insts.insert(at, inst);
    }

    /// Installs `inst` as the terminator, returning the instruction it
    /// displaced (if any) so the caller can release it.
    pub(crate) fn attach_terminator(
        &self,
        alloc_inst: &Slab<InstData>,
        inst: InstRef,
    ) -> Option<InstRef> {
        debug_assert!(inst.to_data(alloc_inst).is_terminator());
        inst.to_data(alloc_inst)
            .get_common()
            .parent_bb
            .set(self.self_ref.get());
        let mut insts = self.insts.borrow_mut();
        match insts.last().copied() {
            Some(last) if last.to_data(alloc_inst).is_terminator() => {
                let at = insts.len() - 1;
                insts[at] = inst;
                Some(last)
            }
            _ => {
                insts.push(inst);
                None
            }
        }
    }
}

impl ITraceableValue for BlockData {
    fn users(&self) -> &UserList {
        &self.users
    }
}
