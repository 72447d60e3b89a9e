use bitflags::bitflags;

use crate::{
    ir::{
        InstCommon, Module, Opcode, ValueSSA,
        inst::usedef::{Use, UseKind, UseRef},
    },
    typing::ValTypeID,
};

bitflags! {
    /// Condition of a compare instruction. `SIGNED` composes with the
    /// relational bits.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct CmpCond: u8 {
        const EQ = 0b000001;
        const NE = 0b000010;
        const LT = 0b000100;
        const GT = 0b001000;
        const LE = 0b010000;
        const GE = 0b100000;
        const SIGNED = 0b1000000;
    }
}

impl CmpCond {
    pub fn get_name(self) -> &'static str {
        let signed = self.contains(CmpCond::SIGNED);
        let rel = self.difference(CmpCond::SIGNED);
        if rel == CmpCond::EQ {
            "eq"
        } else if rel == CmpCond::NE {
            "ne"
        } else if rel == CmpCond::LT {
            if signed { "slt" } else { "ult" }
        } else if rel == CmpCond::GT {
            if signed { "sgt" } else { "ugt" }
        } else if rel == CmpCond::LE {
            if signed { "sle" } else { "ule" }
        } else if rel == CmpCond::GE {
            if signed { "sge" } else { "uge" }
        } else {
            "<undefined-cond>"
        }
    }
}

/// Integer comparison producing an `i1`.
pub struct CmpOp {
    pub cond: CmpCond,
    pub lhs: UseRef,
    pub rhs: UseRef,
}

impl CmpOp {
    pub fn new(module: &Module, cond: CmpCond, lhs: ValueSSA, rhs: ValueSSA) -> (InstCommon, CmpOp) {
        let op = CmpOp {
            cond,
            lhs: Use::new(UseKind::CmpLhs),
            rhs: Use::new(UseKind::CmpRhs),
        };
        op.lhs.set_operand(module, lhs);
        op.rhs.set_operand(module, rhs);
        (InstCommon::new(Opcode::Icmp, ValTypeID::Int(1)), op)
    }
}

#[cfg(test)]
mod tests {
    use super::CmpCond;

    #[test]
    fn cond_names() {
        assert_eq!(CmpCond::EQ.get_name(), "eq");
        assert_eq!((CmpCond::LT | CmpCond::SIGNED).get_name(), "slt");
        assert_eq!(CmpCond::LT.get_name(), "ult");
        assert_eq!((CmpCond::GE | CmpCond::SIGNED).get_name(), "sge");
    }
}
