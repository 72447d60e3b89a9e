use std::{
    cell::{Ref, RefCell},
    collections::HashMap,
    rc::{Rc, Weak},
};

use slab::Slab;
use smol_str::SmolStr;
use thiserror::Error;

use crate::{
    base::{INullableValue, SlabRef},
    ir::{
        BlockData, BlockRef, FuncData, FuncRef, InstData, InstRef, ValueSSA,
        inst::usedef::{ITraceableValue, Use},
    },
    typing::TypeContext,
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModuleError {
    #[error("function `{0}` is already defined in this module")]
    FuncDefExists(SmolStr),
    #[error("null reference where a live value is required")]
    NullReference,
    #[error("{0:?} does not refer to a live function")]
    FuncNotFound(FuncRef),
}

/// Slab arenas owning every IR entity of one module.
pub struct IRAllocs {
    pub funcs: RefCell<Slab<FuncData>>,
    pub blocks: RefCell<Slab<BlockData>>,
    pub insts: RefCell<Slab<InstData>>,
}

impl IRAllocs {
    fn new() -> Self {
        Self {
            funcs: RefCell::new(Slab::with_capacity(32)),
            blocks: RefCell::new(Slab::with_capacity(256)),
            insts: RefCell::new(Slab::with_capacity(1024)),
        }
    }
}

pub struct Module {
    pub name: String,
    pub type_ctx: Rc<TypeContext>,
    pub allocs: IRAllocs,
    func_defs: RefCell<HashMap<SmolStr, FuncRef>>,
    func_order: RefCell<Vec<FuncRef>>,
}

impl Module {
    pub fn new(name: String, type_ctx: Rc<TypeContext>) -> Self {
        Self {
            name,
            type_ctx,
            allocs: IRAllocs::new(),
            func_defs: RefCell::new(HashMap::new()),
            func_order: RefCell::new(Vec::new()),
        }
    }

    pub fn insert_func(&self, data: FuncData) -> Result<FuncRef, ModuleError> {
        let name = data.name.clone();
        if self.func_defs.borrow().contains_key(&name) {
            return Err(ModuleError::FuncDefExists(name));
        }
        let func = FuncRef::from_handle(self.allocs.funcs.borrow_mut().insert(data));
        self.get_func(func).self_ref.set(func);
        self.func_defs.borrow_mut().insert(name, func);
        self.func_order.borrow_mut().push(func);
        Ok(func)
    }

    pub fn find_func(&self, name: &str) -> Option<FuncRef> {
        self.func_defs.borrow().get(name).copied()
    }
    pub fn get_func(&self, func: FuncRef) -> Ref<'_, FuncData> {
        Ref::map(self.allocs.funcs.borrow(), |alloc| func.to_data(alloc))
    }

    /// All functions in program (insertion) order.
    pub fn dump_funcs(&self) -> Vec<FuncRef> {
        self.func_order.borrow().clone()
    }
    pub fn func_count(&self) -> usize {
        self.func_order.borrow().len()
    }

    /// Allocates `data` as a new block appended to the body of `func`.
    pub fn insert_block(&self, func: FuncRef, data: BlockData) -> BlockRef {
        let block = BlockRef::from_handle(self.allocs.blocks.borrow_mut().insert(data));
        {
            let alloc = self.allocs.blocks.borrow();
            let data = block.to_data(&alloc);
            data.self_ref.set(block);
            data.parent_func.set(func);
        }
        self.get_func(func).push_block(block);
        block
    }
    pub fn get_block(&self, block: BlockRef) -> Ref<'_, BlockData> {
        Ref::map(self.allocs.blocks.borrow(), |alloc| block.to_data(alloc))
    }

    /// Allocates `data`, wiring its self reference and the back-pointers
    /// of its operand uses. Attaching the instruction to a block is the
    /// caller's business.
    pub fn insert_inst(&self, data: InstData) -> InstRef {
        let inst = InstRef::from_handle(self.allocs.insts.borrow_mut().insert(data));
        let alloc = self.allocs.insts.borrow();
        let data = inst.to_data(&alloc);
        data.get_common().self_ref.set(inst);
        for operand in data.operands() {
            operand.user.set(inst);
        }
        inst
    }
    pub fn get_inst(&self, inst: InstRef) -> Ref<'_, InstData> {
        Ref::map(self.allocs.insts.borrow(), |alloc| inst.to_data(alloc))
    }
    pub(crate) fn remove_inst(&self, inst: InstRef) {
        let _ = self.allocs.insts.borrow_mut().try_remove(inst.get_handle());
    }

    /// Registers `user` on the operand's user list when the operand is a
    /// traceable reference (function, instruction, block).
    pub(crate) fn track_use(&self, operand: ValueSSA, user: Weak<Use>) {
        match operand {
            ValueSSA::Func(func) => self.get_func(func).add_user(user),
            ValueSSA::Inst(inst) => self.get_inst(inst).add_user(user),
            ValueSSA::Block(block) => self.get_block(block).add_user(user),
            ValueSSA::None | ValueSSA::ConstData(_) | ValueSSA::FuncArg(..) => {}
        }
    }

    /// Retargets every live use of `old` to `new`. Returns the number of
    /// uses rewritten.
    pub fn replace_all_uses_with(&self, old: ValueSSA, new: ValueSSA) -> usize {
        let users = match old {
            ValueSSA::Func(func) => self.get_func(func).users().snapshot_users(old),
            ValueSSA::Inst(inst) => self.get_inst(inst).users().snapshot_users(old),
            ValueSSA::Block(block) => self.get_block(block).users().snapshot_users(old),
            _ => return 0,
        };
        for user in &users {
            user.set_operand(self, new);
        }
        users.len()
    }

    /// Detaches `func` from the module and releases its body storage.
    ///
    /// Every use of the function must have been rewritten beforehand;
    /// removing a function that still has live users corrupts the module.
    pub fn remove_func(&self, func: FuncRef) -> Result<(), ModuleError> {
        if func.is_null() {
            return Err(ModuleError::NullReference);
        }
        let (name, blocks) = {
            let alloc = self.allocs.funcs.borrow();
            let Some(data) = func.as_data(&alloc) else {
                return Err(ModuleError::FuncNotFound(func));
            };
            (data.name.clone(), data.dump_blocks())
        };

        {
            let alloc_block = self.allocs.blocks.borrow();
            let mut alloc_inst = self.allocs.insts.borrow_mut();
            for &block in &blocks {
                for inst in block.to_data(&alloc_block).dump_insts() {
                    let _ = alloc_inst.try_remove(inst.get_handle());
                }
            }
        }
        {
            let mut alloc_block = self.allocs.blocks.borrow_mut();
            for &block in &blocks {
                let _ = alloc_block.try_remove(block.get_handle());
            }
        }
        self.func_defs.borrow_mut().remove(&name);
        self.func_order.borrow_mut().retain(|other| *other != func);
        self.allocs.funcs.borrow_mut().remove(func.get_handle());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ir::{ConstData, inst::callop::CallOp},
        typing::ValTypeID,
    };

    fn new_module() -> Module {
        Module::new("test_module".to_string(), TypeContext::new_rc())
    }

    #[test]
    fn function_table_round_trip() {
        let module = new_module();
        let i32fty = module.type_ctx.make_func_type(&[], ValTypeID::Int(32), false);

        let func = module
            .insert_func(FuncData::new_extern("getint", i32fty))
            .unwrap();
        assert_eq!(module.find_func("getint"), Some(func));
        assert_eq!(module.get_func(func).name, "getint");
        assert!(module.get_func(func).is_extern());
        assert_eq!(module.dump_funcs(), vec![func]);

        let dup = module.insert_func(FuncData::new_extern("getint", i32fty));
        assert_eq!(dup, Err(ModuleError::FuncDefExists("getint".into())));
    }

    #[test]
    fn remove_func_releases_body_storage() {
        let module = new_module();
        let vfty = module.type_ctx.make_func_type(&[], ValTypeID::Void, false);
        let func = module
            .insert_func(FuncData::new_defined("f", vfty))
            .unwrap();
        let block = module.insert_block(func, BlockData::new_empty());
        let term = module.insert_inst(InstData::new_unreachable());
        {
            let alloc = module.allocs.insts.borrow();
            module.get_block(block).attach_terminator(&alloc, term);
        }

        module.remove_func(func).unwrap();
        assert_eq!(module.find_func("f"), None);
        assert_eq!(module.func_count(), 0);
        assert!(func.as_data(&module.allocs.funcs.borrow()).is_none());
        assert!(block.as_data(&module.allocs.blocks.borrow()).is_none());
        assert!(term.as_data(&module.allocs.insts.borrow()).is_none());

        assert_eq!(module.remove_func(func), Err(ModuleError::FuncNotFound(func)));
        assert_eq!(
            module.remove_func(FuncRef::new_null()),
            Err(ModuleError::NullReference)
        );
    }

    #[test]
    fn replace_all_uses_rehomes_operands() {
        let module = new_module();
        let vfty = module.type_ctx.make_func_type(&[], ValTypeID::Void, false);
        let func = module
            .insert_func(FuncData::new_extern("callee", vfty))
            .unwrap();

        let (common, op) = CallOp::new(&module, vfty, ValueSSA::Func(func), &[]);
        let inst = module.insert_inst(InstData::Call(common, op));

        let old = ValueSSA::Func(func);
        assert!(module.get_func(func).users().has_users(old));
        assert_eq!(module.get_func(func).users().user_count(old), 1);

        let undef = ConstData::make_undef_valssa(ValTypeID::Ptr);
        assert_eq!(module.replace_all_uses_with(old, undef), 1);
        assert!(!module.get_func(func).users().has_users(old));

        match &*module.get_inst(inst) {
            InstData::Call(_, call) => {
                assert_eq!(call.get_callee(), undef);
                assert_eq!(call.get_resolved_callee(), None);
            }
            _ => unreachable!(),
        }
    }
}
