use std::cell::Cell;

use smallvec::{SmallVec, smallvec};

use crate::{
    base::INullableValue,
    impl_slabref,
    ir::{BlockRef, Opcode},
    typing::ValTypeID,
};

pub mod binop;
pub mod callop;
pub mod cmp;
pub mod load_store;
pub mod terminator;
pub mod usedef;

use usedef::{ITraceableValue, UseRef, UserList};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstRef(usize);
impl_slabref!(InstRef, InstData);

pub enum InstData {
    /// Marks its block as never falling through. Every freshly created
    /// block carries one until a real terminator replaces it.
    Unreachable(InstCommon),
    Ret(InstCommon, terminator::Ret),
    Jump(InstCommon, terminator::Jump),
    Br(InstCommon, terminator::Br),
    Alloca(InstCommon, load_store::Alloca),
    Load(InstCommon, load_store::LoadOp),
    Store(InstCommon, load_store::StoreOp),
    BinOp(InstCommon, binop::BinOp),
    Cmp(InstCommon, cmp::CmpOp),
    Call(InstCommon, callop::CallOp),
}

pub struct InstCommon {
    pub opcode: Opcode,
    pub ret_type: ValTypeID,
    pub self_ref: Cell<InstRef>,
    pub parent_bb: Cell<BlockRef>,
    pub users: UserList,
}

impl InstCommon {
    pub fn new(opcode: Opcode, ret_type: ValTypeID) -> Self {
        Self {
            opcode,
            ret_type,
            self_ref: Cell::new(InstRef::new_null()),
            parent_bb: Cell::new(BlockRef::new_null()),
            users: UserList::new(),
        }
    }
}

impl InstData {
    pub fn new_unreachable() -> Self {
        InstData::Unreachable(InstCommon::new(Opcode::Unreachable, ValTypeID::Void))
    }

    pub fn get_common(&self) -> &InstCommon {
        match self {
            InstData::Unreachable(c) => c,
            InstData::Ret(c, _) => c,
            InstData::Jump(c, _) => c,
            InstData::Br(c, _) => c,
            InstData::Alloca(c, _) => c,
            InstData::Load(c, _) => c,
            InstData::Store(c, _) => c,
            InstData::BinOp(c, _) => c,
            InstData::Cmp(c, _) => c,
            InstData::Call(c, _) => c,
        }
    }

    pub fn get_opcode(&self) -> Opcode {
        self.get_common().opcode
    }
    pub fn get_ret_type(&self) -> ValTypeID {
        self.get_common().ret_type
    }
    pub fn is_terminator(&self) -> bool {
        self.get_opcode().is_terminator()
    }

    /// Operand slots in their fixed layout order.
    pub fn operands(&self) -> SmallVec<[UseRef; 4]> {
        match self {
            InstData::Unreachable(_) | InstData::Alloca(..) | InstData::Jump(..) => smallvec![],
            InstData::Ret(_, ret) => smallvec![ret.retval.clone()],
            InstData::Br(_, br) => smallvec![br.cond.clone()],
            InstData::Load(_, load) => smallvec![load.source.clone()],
            InstData::Store(_, store) => {
                smallvec![store.source.clone(), store.target.clone()]
            }
            InstData::BinOp(_, binop) => smallvec![binop.lhs.clone(), binop.rhs.clone()],
            InstData::Cmp(_, cmp) => smallvec![cmp.lhs.clone(), cmp.rhs.clone()],
            InstData::Call(_, call) => {
                let mut operands = SmallVec::with_capacity(1 + call.args.len());
                operands.push(call.callee.clone());
                operands.extend(call.args.iter().cloned());
                operands
            }
        }
    }
}

impl ITraceableValue for InstData {
    fn users(&self) -> &UserList {
        &self.get_common().users
    }
}
