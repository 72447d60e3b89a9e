use std::{
    cell::{Cell, RefCell},
    rc::{Rc, Weak},
};

use crate::{
    base::INullableValue,
    ir::{InstRef, Module, ValueSSA},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseKind {
    BinOpLhs,
    BinOpRhs,
    CmpLhs,
    CmpRhs,
    CallOpCallee,
    CallOpArg(u32),
    LoadSource,
    StoreSource,
    StoreTarget,
    BranchCond,
    RetValue,
}

/// One operand slot of one instruction. The owning instruction holds the
/// `Rc`; every traceable operand value keeps a `Weak` back-reference so
/// it can find the instructions reading it.
#[derive(Debug)]
pub struct Use {
    pub kind: UseKind,
    pub user: Cell<InstRef>,
    pub operand: Cell<ValueSSA>,
}

pub type UseRef = Rc<Use>;

impl Use {
    pub fn new(kind: UseKind) -> UseRef {
        Rc::new(Use {
            kind,
            user: Cell::new(InstRef::new_null()),
            operand: Cell::new(ValueSSA::None),
        })
    }

    pub fn get_operand(&self) -> ValueSSA {
        self.operand.get()
    }

    /// Retargets this use. The previous operand's user list keeps a stale
    /// weak entry until its next traversal prunes it.
    pub fn set_operand(self: &Rc<Self>, module: &Module, operand: ValueSSA) {
        if self.operand.get() == operand {
            return;
        }
        self.operand.set(operand);
        module.track_use(operand, Rc::downgrade(self));
    }
}

/// Weak back-references from a value to the uses currently pointing at it.
#[derive(Debug, Default)]
pub struct UserList {
    users: RefCell<Vec<Weak<Use>>>,
}

impl UserList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, user: Weak<Use>) {
        let mut users = self.users.borrow_mut();
        if users.iter().any(|u| u.as_ptr() == user.as_ptr()) {
            return;
        }
        users.push(user);
    }

    /// Live uses whose operand still is `of`. Dropped or retargeted
    /// entries are compacted away as a side effect.
    pub fn snapshot_users(&self, of: ValueSSA) -> Vec<UseRef> {
        let mut users = self.users.borrow_mut();
        users.retain(|u| {
            u.upgrade()
                .is_some_and(|user| user.get_operand() == of)
        });
        users.iter().filter_map(|u| u.upgrade()).collect()
    }

    pub fn has_users(&self, of: ValueSSA) -> bool {
        !self.snapshot_users(of).is_empty()
    }
    pub fn user_count(&self, of: ValueSSA) -> usize {
        self.snapshot_users(of).len()
    }
}

pub trait ITraceableValue {
    /// The user list of this value.
    ///
    /// The list only reflects every user as long as the value has
    /// reference-unique semantics; inline constants are untracked.
    fn users(&self) -> &UserList;

    fn add_user(&self, user: Weak<Use>) {
        self.users().add_user(user);
    }
}
