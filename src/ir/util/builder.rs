use std::rc::Rc;

use smol_str::SmolStr;
use thiserror::Error;

use crate::{
    base::INullableValue,
    ir::{
        BlockData, BlockRef, FuncData, FuncRef, InstData, InstRef, Module, ModuleError, Opcode,
        ValueSSA,
        inst::{
            binop::BinOp,
            callop::CallOp,
            cmp::{CmpCond, CmpOp},
            load_store::{Alloca, LoadOp, StoreOp},
            terminator::{Br, Jump, Ret},
        },
    },
    typing::{FuncTypeRef, TypeContext, ValTypeID},
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuilderError {
    #[error("focus does not name a live function and block")]
    NullFocus,
    #[error("function `{0}` has no body to build into")]
    FuncIsExtern(SmolStr),
    #[error(transparent)]
    ModuleError(#[from] ModuleError),
}

/// Programmatic module construction. Instructions land in the focus
/// block, in front of its terminator.
pub struct IRBuilder {
    pub module: Rc<Module>,
    pub focus: IRBuilderFocus,
}

#[derive(Debug, Clone, Copy)]
pub struct IRBuilderFocus {
    pub func: FuncRef,
    pub block: BlockRef,
}

impl IRBuilder {
    pub fn new(module: Module) -> Self {
        Self {
            module: Rc::new(module),
            focus: IRBuilderFocus { func: FuncRef::new_null(), block: BlockRef::new_null() },
        }
    }

    pub fn get_type_ctx(&self) -> Rc<TypeContext> {
        self.module.type_ctx.clone()
    }

    pub fn set_focus_block(&mut self, block: BlockRef) {
        self.focus.func = self.module.get_block(block).parent_func.get();
        self.focus.block = block;
    }

    pub fn declare_function(
        &mut self,
        name: &str,
        func_ty: FuncTypeRef,
    ) -> Result<FuncRef, BuilderError> {
        Ok(self.module.insert_func(FuncData::new_extern(name, func_ty))?)
    }

    /// Defines a function with a single entry block terminated by
    /// `unreachable` and moves the focus there.
    pub fn define_function(
        &mut self,
        name: &str,
        func_ty: FuncTypeRef,
    ) -> Result<FuncRef, BuilderError> {
        let func = self.module.insert_func(FuncData::new_defined(name, func_ty))?;
        let entry = self.append_block_to(func)?;
        self.focus = IRBuilderFocus { func, block: entry };
        Ok(func)
    }

    /// Appends a fresh `unreachable`-terminated block to `func`.
    pub fn append_block_to(&mut self, func: FuncRef) -> Result<BlockRef, BuilderError> {
        if self.module.get_func(func).is_extern() {
            let name = self.module.get_func(func).name.clone();
            return Err(BuilderError::FuncIsExtern(name));
        }
        let block = self.module.insert_block(func, BlockData::new_empty());
        let term = self.module.insert_inst(InstData::new_unreachable());
        let alloc = self.module.allocs.insts.borrow();
        self.module.get_block(block).attach_terminator(&alloc, term);
        Ok(block)
    }

    pub fn append_block(&mut self) -> Result<BlockRef, BuilderError> {
        if self.focus.func.is_null() {
            return Err(BuilderError::NullFocus);
        }
        self.append_block_to(self.focus.func)
    }

    fn add_inst(&mut self, data: InstData) -> Result<InstRef, BuilderError> {
        let IRBuilderFocus { func, block } = self.focus;
        if func.is_null() || block.is_null() {
            return Err(BuilderError::NullFocus);
        }
        let inst = self.module.insert_inst(data);
        let alloc = self.module.allocs.insts.borrow();
        self.module.get_block(block).attach_inst(&alloc, inst);
        Ok(inst)
    }

    pub fn add_call_inst(
        &mut self,
        callee: FuncRef,
        args: &[ValueSSA],
    ) -> Result<InstRef, BuilderError> {
        let callee_ty = self.module.get_func(callee).func_ty;
        let (common, op) = CallOp::new(&self.module, callee_ty, ValueSSA::Func(callee), args);
        self.add_inst(InstData::Call(common, op))
    }

    /// A call through a pointer value; the callee cannot be statically
    /// resolved.
    pub fn add_indirect_call_inst(
        &mut self,
        callee: ValueSSA,
        callee_ty: FuncTypeRef,
        args: &[ValueSSA],
    ) -> Result<InstRef, BuilderError> {
        let (common, op) = CallOp::new(&self.module, callee_ty, callee, args);
        self.add_inst(InstData::Call(common, op))
    }

    pub fn add_binop_inst(
        &mut self,
        opcode: Opcode,
        lhs: ValueSSA,
        rhs: ValueSSA,
    ) -> Result<InstRef, BuilderError> {
        let ret_type = lhs.get_value_type(&self.module);
        let (common, op) = BinOp::new(&self.module, opcode, ret_type, lhs, rhs);
        self.add_inst(InstData::BinOp(common, op))
    }

    pub fn add_cmp_inst(
        &mut self,
        cond: CmpCond,
        lhs: ValueSSA,
        rhs: ValueSSA,
    ) -> Result<InstRef, BuilderError> {
        let (common, op) = CmpOp::new(&self.module, cond, lhs, rhs);
        self.add_inst(InstData::Cmp(common, op))
    }

    pub fn add_alloca_inst(
        &mut self,
        pointee_ty: ValTypeID,
        align_log2: u8,
    ) -> Result<InstRef, BuilderError> {
        let (common, op) = Alloca::new(pointee_ty, align_log2);
        self.add_inst(InstData::Alloca(common, op))
    }

    pub fn add_load_inst(
        &mut self,
        loaded_ty: ValTypeID,
        align_log2: u8,
        source: ValueSSA,
    ) -> Result<InstRef, BuilderError> {
        let (common, op) = LoadOp::new(&self.module, loaded_ty, align_log2, source);
        self.add_inst(InstData::Load(common, op))
    }

    pub fn add_store_inst(
        &mut self,
        target: ValueSSA,
        source: ValueSSA,
        align_log2: u8,
    ) -> Result<InstRef, BuilderError> {
        let (common, op) = StoreOp::new(&self.module, target, source, align_log2);
        self.add_inst(InstData::Store(common, op))
    }

    fn set_terminator(&mut self, data: InstData) -> Result<InstRef, BuilderError> {
        let IRBuilderFocus { func, block } = self.focus;
        if func.is_null() || block.is_null() {
            return Err(BuilderError::NullFocus);
        }
        let inst = self.module.insert_inst(data);
        let displaced = {
            let alloc = self.module.allocs.insts.borrow();
            self.module.get_block(block).attach_terminator(&alloc, inst)
        };
        if let Some(displaced) = displaced {
            self.module.remove_inst(displaced);
        }
        Ok(inst)
    }

    pub fn focus_set_return(&mut self, retval: ValueSSA) -> Result<InstRef, BuilderError> {
        let (common, term) = Ret::new(&self.module, retval);
        self.set_terminator(InstData::Ret(common, term))
    }

    pub fn focus_set_jump_to(&mut self, target: BlockRef) -> Result<InstRef, BuilderError> {
        let (common, term) = Jump::new(target);
        self.set_terminator(InstData::Jump(common, term))
    }

    pub fn focus_set_branch_to(
        &mut self,
        cond: ValueSSA,
        if_true: BlockRef,
        if_false: BlockRef,
    ) -> Result<InstRef, BuilderError> {
        let (common, term) = Br::new(&self.module, cond, if_true, if_false);
        self.set_terminator(InstData::Br(common, term))
    }
}
