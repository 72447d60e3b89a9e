use std::cell::{Cell, RefCell};

use smol_str::SmolStr;

use crate::{
    base::INullableValue,
    impl_slabref,
    ir::{
        BlockRef,
        inst::usedef::{ITraceableValue, UserList},
    },
    typing::FuncTypeRef,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FuncRef(usize);
impl_slabref!(FuncRef, FuncData);

/// A function. `body == None` models a declaration (extern); such
/// functions participate in the call graph as callees only.
pub struct FuncData {
    pub name: SmolStr,
    pub func_ty: FuncTypeRef,
    pub self_ref: Cell<FuncRef>,
    pub users: UserList,
    body: RefCell<Option<Vec<BlockRef>>>,
}

impl FuncData {
    pub fn new_extern(name: impl Into<SmolStr>, func_ty: FuncTypeRef) -> Self {
        Self {
            name: name.into(),
            func_ty,
            self_ref: Cell::new(FuncRef::new_null()),
            users: UserList::new(),
            body: RefCell::new(None),
        }
    }

    pub fn new_defined(name: impl Into<SmolStr>, func_ty: FuncTypeRef) -> Self {
        let func = Self::new_extern(name, func_ty);
        *func.body.borrow_mut() = Some(Vec::new());
        func
    }

    pub fn is_extern(&self) -> bool {
        self.body.borrow().is_none()
    }

    /// Body blocks in program order; empty for declarations.
    pub fn dump_blocks(&self) -> Vec<BlockRef> {
        self.body.borrow().clone().unwrap_or_default()
    }

    pub fn get_entry(&self) -> Option<BlockRef> {
        self.body.borrow().as_ref()?.first().copied()
    }

    pub(crate) fn push_block(&self, block: BlockRef) {
        self.body.borrow_mut().get_or_insert_with(Vec::new).push(block);
    }
}

impl ITraceableValue for FuncData {
    fn users(&self) -> &UserList {
        &self.users
    }
}
