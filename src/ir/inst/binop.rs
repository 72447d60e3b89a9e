use crate::{
    ir::{
        InstCommon, Module, Opcode, ValueSSA,
        inst::usedef::{Use, UseKind, UseRef},
    },
    typing::ValTypeID,
};

/// Integer arithmetic and bitwise operations over two operands.
pub struct BinOp {
    pub lhs: UseRef,
    pub rhs: UseRef,
}

impl BinOp {
    pub fn new(
        module: &Module,
        opcode: Opcode,
        ret_type: ValTypeID,
        lhs: ValueSSA,
        rhs: ValueSSA,
    ) -> (InstCommon, BinOp) {
        debug_assert!(opcode.is_binary_op());
        let op = BinOp {
            lhs: Use::new(UseKind::BinOpLhs),
            rhs: Use::new(UseKind::BinOpRhs),
        };
        op.lhs.set_operand(module, lhs);
        op.rhs.set_operand(module, rhs);
        (InstCommon::new(opcode, ret_type), op)
    }
}
