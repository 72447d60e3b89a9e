//! Direct call graph extraction.

use std::collections::HashMap;

use crate::ir::{FuncRef, InstData, Module};

/// Who calls whom: one entry per call instruction, in encounter order,
/// duplicates preserved. Unresolved (indirect) call sites keep their slot
/// as `None` so consumers have to filter them explicitly.
pub struct CallGraph {
    callees: HashMap<FuncRef, Vec<Option<FuncRef>>>,
    order: Vec<FuncRef>,
}

impl CallGraph {
    /// Pure read of `module`: blocks are visited in body order and
    /// instructions in block order.
    pub fn from_module(module: &Module) -> Self {
        let order = module.dump_funcs();
        let mut callees = HashMap::with_capacity(order.len());
        for &func in &order {
            let mut edge_list = Vec::new();
            for block in module.get_func(func).dump_blocks() {
                for inst in module.get_block(block).dump_insts() {
                    if let InstData::Call(_, call) = &*module.get_inst(inst) {
                        edge_list.push(call.get_resolved_callee());
                    }
                }
            }
            callees.insert(func, edge_list);
        }
        Self { callees, order }
    }

    /// Every function of the module in program order, declaration-only
    /// functions included.
    pub fn funcs(&self) -> &[FuncRef] {
        &self.order
    }

    pub fn callees_of(&self, func: FuncRef) -> &[Option<FuncRef>] {
        self.callees.get(&func).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{testing::cases, typing::ValTypeID};

    #[test]
    fn records_direct_calls_in_order() {
        let builder = cases::case_orphan_pair();
        let module = &builder.module;
        let graph = CallGraph::from_module(module);

        let main = module.find_func("main").unwrap();
        let helper = module.find_func("helper").unwrap();
        let orphan = module.find_func("orphan").unwrap();
        let orphan_caller = module.find_func("orphanCaller").unwrap();

        assert_eq!(graph.funcs().len(), 4);
        assert_eq!(graph.callees_of(main), &[Some(helper)]);
        assert_eq!(graph.callees_of(orphan_caller), &[Some(orphan)]);
        assert_eq!(graph.callees_of(helper), &[]);
    }

    #[test]
    fn declarations_are_nodes_without_edges() {
        let mut builder = cases::create_module_builder("decl_nodes");
        let tctx = builder.get_type_ctx();
        let i32fty = tctx.make_func_type(&[], ValTypeID::Int(32), false);

        let getint = builder.declare_function("getint", i32fty).unwrap();
        builder.define_function("main", i32fty).unwrap();
        builder.add_call_inst(getint, &[]).unwrap();
        let call = builder.add_call_inst(getint, &[]).unwrap();
        builder
            .focus_set_return(crate::ir::ValueSSA::Inst(call))
            .unwrap();

        let module = &builder.module;
        let graph = CallGraph::from_module(module);
        let main = module.find_func("main").unwrap();

        // duplicates are preserved, one entry per call site
        assert_eq!(graph.callees_of(main), &[Some(getint), Some(getint)]);
        assert!(graph.funcs().contains(&getint));
        assert_eq!(graph.callees_of(getint), &[]);
    }

    #[test]
    fn multi_block_bodies_follow_block_order() {
        let builder = cases::case_branchy();
        let module = &builder.module;
        let graph = CallGraph::from_module(module);

        let main = module.find_func("main").unwrap();
        let left = module.find_func("left").unwrap();
        let right = module.find_func("right").unwrap();
        assert_eq!(graph.callees_of(main), &[Some(left), Some(right)]);
    }

    #[test]
    fn indirect_calls_have_no_resolved_target() {
        let builder = cases::case_indirect_call();
        let module = &builder.module;
        let graph = CallGraph::from_module(module);
        let main = module.find_func("main").unwrap();

        assert_eq!(graph.callees_of(main), &[None]);
    }
}
