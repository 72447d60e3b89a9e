use crate::{base::INullableValue, typing::ValTypeID};

pub mod block;
pub mod constant;
pub mod func;
pub mod inst;
pub mod module;
pub mod opcode;
pub mod util;

pub use {
    block::{BlockData, BlockRef},
    constant::ConstData,
    func::{FuncData, FuncRef},
    inst::{
        InstCommon, InstData, InstRef,
        usedef::{ITraceableValue, Use, UseKind, UseRef, UserList},
    },
    module::{IRAllocs, Module, ModuleError},
    opcode::Opcode,
};

/// A copyable handle to any value an instruction may take as operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueSSA {
    None,
    ConstData(ConstData),
    FuncArg(FuncRef, u32),
    Block(BlockRef),
    Inst(InstRef),
    Func(FuncRef),
}

impl INullableValue for ValueSSA {
    fn new_null() -> Self {
        ValueSSA::None
    }
    fn is_null(&self) -> bool {
        matches!(self, ValueSSA::None)
    }
}

impl ValueSSA {
    pub fn is_none(&self) -> bool {
        matches!(self, ValueSSA::None)
    }
    pub fn is_func(&self) -> bool {
        matches!(self, ValueSSA::Func(_))
    }

    pub fn get_value_type(&self, module: &Module) -> ValTypeID {
        match *self {
            ValueSSA::None | ValueSSA::Block(_) => ValTypeID::Void,
            ValueSSA::ConstData(c) => c.get_value_type(),
            ValueSSA::FuncArg(func, index) => {
                let fty = module.get_func(func).func_ty;
                module
                    .type_ctx
                    .get_arg_type(fty, index as usize)
                    .unwrap_or(ValTypeID::Void)
            }
            ValueSSA::Inst(inst) => module.get_inst(inst).get_ret_type(),
            ValueSSA::Func(_) => ValTypeID::Ptr,
        }
    }
}
