use smallvec::SmallVec;

use crate::{
    ir::{
        FuncRef, InstCommon, Module, Opcode, ValueSSA,
        inst::usedef::{Use, UseKind, UseRef},
    },
    typing::FuncTypeRef,
};

/// A function call. Operand layout is `[callee, arg0, .., argN]`. The
/// callee slot may hold any pointer-typed value; an indirect call is
/// simply a call whose callee operand is not a `ValueSSA::Func`.
pub struct CallOp {
    pub callee: UseRef,
    pub args: SmallVec<[UseRef; 4]>,
    pub callee_ty: FuncTypeRef,
}

impl CallOp {
    pub fn new(
        module: &Module,
        callee_ty: FuncTypeRef,
        callee: ValueSSA,
        args: &[ValueSSA],
    ) -> (InstCommon, CallOp) {
        let ret_type = module.type_ctx.get_ret_type(callee_ty);
        let callee_use = Use::new(UseKind::CallOpCallee);
        callee_use.set_operand(module, callee);

        let mut arg_uses = SmallVec::with_capacity(args.len());
        for (index, &arg) in args.iter().enumerate() {
            let arg_use = Use::new(UseKind::CallOpArg(index as u32));
            arg_use.set_operand(module, arg);
            arg_uses.push(arg_use);
        }

        let op = CallOp { callee: callee_use, args: arg_uses, callee_ty };
        (InstCommon::new(Opcode::Call, ret_type), op)
    }

    pub fn get_callee(&self) -> ValueSSA {
        self.callee.get_operand()
    }

    /// The statically known callee, when the callee operand names a
    /// function directly. Indirect targets yield `None`.
    pub fn get_resolved_callee(&self) -> Option<FuncRef> {
        match self.get_callee() {
            ValueSSA::Func(func) => Some(func),
            _ => None,
        }
    }
}
