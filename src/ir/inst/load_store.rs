use crate::{
    ir::{
        InstCommon, Module, Opcode, ValueSSA,
        inst::usedef::{Use, UseKind, UseRef},
    },
    typing::ValTypeID,
};

/// Stack slot allocation; yields a pointer to the slot.
pub struct Alloca {
    pub pointee_ty: ValTypeID,
    pub align_log2: u8,
}

impl Alloca {
    pub fn new(pointee_ty: ValTypeID, align_log2: u8) -> (InstCommon, Alloca) {
        let op = Alloca { pointee_ty, align_log2 };
        (InstCommon::new(Opcode::Alloca, ValTypeID::Ptr), op)
    }
}

pub struct LoadOp {
    pub source: UseRef,
    pub align_log2: u8,
}

impl LoadOp {
    pub fn new(
        module: &Module,
        loaded_ty: ValTypeID,
        align_log2: u8,
        source: ValueSSA,
    ) -> (InstCommon, LoadOp) {
        let op = LoadOp { source: Use::new(UseKind::LoadSource), align_log2 };
        op.source.set_operand(module, source);
        (InstCommon::new(Opcode::Load, loaded_ty), op)
    }
}

pub struct StoreOp {
    pub source: UseRef,
    pub target: UseRef,
    pub align_log2: u8,
}

impl StoreOp {
    pub fn new(
        module: &Module,
        target: ValueSSA,
        source: ValueSSA,
        align_log2: u8,
    ) -> (InstCommon, StoreOp) {
        let op = StoreOp {
            source: Use::new(UseKind::StoreSource),
            target: Use::new(UseKind::StoreTarget),
            align_log2,
        };
        op.source.set_operand(module, source);
        op.target.set_operand(module, target);
        (InstCommon::new(Opcode::Store, ValTypeID::Void), op)
    }
}
