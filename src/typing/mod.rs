//! A minimal type system: just enough structure for function signatures
//! and the pointer-typed values the optimizer rewrites.

use std::{
    cell::{Ref, RefCell},
    collections::HashMap,
    rc::Rc,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValTypeID {
    Void,
    Int(u8),
    Ptr,
    Func(FuncTypeRef),
}

impl ValTypeID {
    /// Name in IR text. Function values are opaque pointers.
    pub fn get_display_name(&self) -> String {
        match self {
            ValTypeID::Void => "void".into(),
            ValTypeID::Int(bits) => format!("i{bits}"),
            ValTypeID::Ptr | ValTypeID::Func(_) => "ptr".into(),
        }
    }
}

/// Index of an interned `FuncType` inside its `TypeContext`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FuncTypeRef(usize);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FuncType {
    pub ret_type: ValTypeID,
    pub args: Box<[ValTypeID]>,
    pub is_vararg: bool,
}

/// Interns function types so signatures compare by handle.
pub struct TypeContext {
    funcs: RefCell<Vec<FuncType>>,
    dedup: RefCell<HashMap<FuncType, FuncTypeRef>>,
}

impl TypeContext {
    pub fn new_rc() -> Rc<Self> {
        Rc::new(Self {
            funcs: RefCell::new(Vec::new()),
            dedup: RefCell::new(HashMap::new()),
        })
    }

    pub fn make_func_type(
        &self,
        args: &[ValTypeID],
        ret_type: ValTypeID,
        is_vararg: bool,
    ) -> FuncTypeRef {
        let fty = FuncType { ret_type, args: args.into(), is_vararg };
        if let Some(found) = self.dedup.borrow().get(&fty) {
            return *found;
        }
        let mut funcs = self.funcs.borrow_mut();
        let id = FuncTypeRef(funcs.len());
        funcs.push(fty.clone());
        self.dedup.borrow_mut().insert(fty, id);
        id
    }

    pub fn get_func_type(&self, fty: FuncTypeRef) -> Ref<'_, FuncType> {
        Ref::map(self.funcs.borrow(), |funcs| &funcs[fty.0])
    }
    pub fn get_ret_type(&self, fty: FuncTypeRef) -> ValTypeID {
        self.get_func_type(fty).ret_type
    }
    pub fn get_nargs(&self, fty: FuncTypeRef) -> usize {
        self.get_func_type(fty).args.len()
    }
    pub fn get_arg_type(&self, fty: FuncTypeRef, index: usize) -> Option<ValTypeID> {
        self.get_func_type(fty).args.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn func_types_are_interned() {
        let tctx = TypeContext::new_rc();
        let a = tctx.make_func_type(&[ValTypeID::Int(32)], ValTypeID::Int(32), false);
        let b = tctx.make_func_type(&[ValTypeID::Int(32)], ValTypeID::Int(32), false);
        let c = tctx.make_func_type(&[], ValTypeID::Void, false);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(tctx.get_ret_type(c), ValTypeID::Void);
        assert_eq!(tctx.get_nargs(a), 1);
        assert_eq!(tctx.get_arg_type(a, 0), Some(ValTypeID::Int(32)));
        assert_eq!(tctx.get_arg_type(a, 1), None);
    }

    #[test]
    fn display_names() {
        assert_eq!(ValTypeID::Int(1).get_display_name(), "i1");
        assert_eq!(ValTypeID::Void.get_display_name(), "void");
        assert_eq!(ValTypeID::Ptr.get_display_name(), "ptr");
    }
}
