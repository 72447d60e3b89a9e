use std::cell::Cell;

use crate::{
    ir::{
        BlockRef, InstCommon, Module, Opcode, ValueSSA,
        inst::usedef::{Use, UseKind, UseRef},
    },
    typing::ValTypeID,
};

/// Return from the function. The retval use holds `ValueSSA::None` for
/// `ret void`.
pub struct Ret {
    pub retval: UseRef,
}

impl Ret {
    pub fn new(module: &Module, retval: ValueSSA) -> (InstCommon, Ret) {
        let term = Ret { retval: Use::new(UseKind::RetValue) };
        term.retval.set_operand(module, retval);
        (InstCommon::new(Opcode::Ret, ValTypeID::Void), term)
    }
}

/// Unconditional jump.
pub struct Jump {
    pub target: Cell<BlockRef>,
}

impl Jump {
    pub fn new(target: BlockRef) -> (InstCommon, Jump) {
        let term = Jump { target: Cell::new(target) };
        (InstCommon::new(Opcode::Jmp, ValTypeID::Void), term)
    }
}

/// Two-way conditional branch.
pub struct Br {
    pub cond: UseRef,
    pub if_true: Cell<BlockRef>,
    pub if_false: Cell<BlockRef>,
}

impl Br {
    pub fn new(
        module: &Module,
        cond: ValueSSA,
        if_true: BlockRef,
        if_false: BlockRef,
    ) -> (InstCommon, Br) {
        let term = Br {
            cond: Use::new(UseKind::BranchCond),
            if_true: Cell::new(if_true),
            if_false: Cell::new(if_false),
        };
        term.cond.set_operand(module, cond);
        (InstCommon::new(Opcode::Br, ValTypeID::Void), term)
    }
}
