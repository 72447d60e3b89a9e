//! Whole-module dead function elimination.
//!
//! A function is dead when no chain of direct calls starting at the entry
//! function reaches it. Every use of a dead function is rewritten to a
//! pointer-typed `undef` before the function leaves the module, so the
//! surviving program never references freed storage.

use std::collections::HashMap;

use crate::{
    ir::{ConstData, FuncRef, Module, ValueSSA},
    opt::{
        analysis::{callgraph::CallGraph, reachability::find_dead_funcs},
        report::DeadFuncReport,
    },
    typing::ValTypeID,
};

/// Default entry point. Which function roots the analysis is a caller
/// configuration concern; this is only the conventional answer.
pub const ENTRY_FUNC_NAME: &str = "main";

pub fn dead_func_pass(module: &Module) -> DeadFuncReport {
    dead_func_pass_with_entry(module, ENTRY_FUNC_NAME)
}

/// Builds the call graph, computes the dead set rooted at `entry_name`,
/// and removes it. Without an entry function the module is left untouched
/// and the returned report carries the call graph only.
pub fn dead_func_pass_with_entry(module: &Module, entry_name: &str) -> DeadFuncReport {
    let graph = CallGraph::from_module(module);
    let mut report = DeadFuncReport::from_graph(module, &graph);

    let Some(entry) = module.find_func(entry_name) else {
        log::debug!("dead-func: no entry function `{entry_name}`, skipping elimination");
        return report;
    };
    report.entry_func = Some(module.get_func(entry).name.clone());

    let dead = find_dead_funcs(module, &graph, entry);
    report.dead_funcs = dead
        .iter()
        .map(|&func| module.get_func(func).name.clone())
        .collect();
    log::debug!(
        "dead-func: {} of {} functions unreachable from `{entry_name}`",
        dead.len(),
        module.func_count(),
    );

    DeadFuncElim::new(&dead).exec(module, &dead);
    report
}

/// Elimination states of one dead function. Transitions run strictly
/// `Marked -> Rewritten -> Removed`; removal before the rewrite would
/// leave surviving instruction streams pointing at freed storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElimState {
    Marked,
    Rewritten,
    Removed,
}

struct DeadFuncElim {
    state: HashMap<FuncRef, ElimState>,
}

impl DeadFuncElim {
    fn new(dead: &[FuncRef]) -> Self {
        Self {
            state: dead.iter().map(|&func| (func, ElimState::Marked)).collect(),
        }
    }

    fn exec(mut self, module: &Module, dead: &[FuncRef]) {
        // Rewriting everything up front makes the mandatory per-function
        // rewrite-before-delete order hold for any processing order.
        for &func in dead {
            self.rewrite_uses(module, func);
        }
        for &func in dead {
            self.remove(module, func);
        }
    }

    fn rewrite_uses(&mut self, module: &Module, func: FuncRef) {
        debug_assert_eq!(self.state[&func], ElimState::Marked);
        let undef = ConstData::make_undef_valssa(ValTypeID::Ptr);
        let rewritten = module.replace_all_uses_with(ValueSSA::Func(func), undef);
        if rewritten > 0 {
            log::trace!(
                "dead-func: rewrote {rewritten} uses of `{}` to undef",
                module.get_func(func).name,
            );
        }
        self.state.insert(func, ElimState::Rewritten);
    }

    fn remove(&mut self, module: &Module, func: FuncRef) {
        debug_assert_eq!(self.state[&func], ElimState::Rewritten);
        module
            .remove_func(func)
            .expect("dead function vanished before removal");
        self.state.insert(func, ElimState::Removed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        base::SlabRef,
        ir::InstData,
        testing::cases,
    };

    /// No surviving instruction operand may name a function that left the
    /// module.
    fn assert_no_dangling_func_refs(module: &Module) {
        for func in module.dump_funcs() {
            for block in module.get_func(func).dump_blocks() {
                for inst in module.get_block(block).dump_insts() {
                    for operand in module.get_inst(inst).operands() {
                        if let ValueSSA::Func(target) = operand.get_operand() {
                            assert!(
                                target.as_data(&module.allocs.funcs.borrow()).is_some(),
                                "operand references a removed function"
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn eliminates_the_orphan_pair() {
        let builder = cases::case_orphan_pair();
        let module = &builder.module;
        let report = dead_func_pass(module);

        assert_eq!(report.dead_funcs, vec!["orphan", "orphanCaller"]);
        assert_eq!(module.find_func("orphan"), None);
        assert_eq!(module.find_func("orphanCaller"), None);
        assert!(module.find_func("main").is_some());
        assert!(module.find_func("helper").is_some());
        assert_eq!(module.func_count(), 2);
        assert_no_dangling_func_refs(module);
    }

    #[test]
    fn no_entry_degrades_to_a_noop() {
        let builder = cases::case_no_entry();
        let module = &builder.module;
        let funcs_before = module.dump_funcs();

        let report = dead_func_pass(module);
        assert_eq!(report.entry_func, None);
        assert_eq!(report.dead_funcs, Vec::<smol_str::SmolStr>::new());
        assert_eq!(module.dump_funcs(), funcs_before);
        assert!(!report.call_graph.is_empty());
    }

    #[test]
    fn pass_is_idempotent() {
        let builder = cases::case_orphan_pair();
        let module = &builder.module;

        let first = dead_func_pass(module);
        assert_eq!(first.dead_funcs.len(), 2);
        let funcs_after_first = module.dump_funcs();

        let second = dead_func_pass(module);
        assert_eq!(second.dead_funcs, Vec::<smol_str::SmolStr>::new());
        assert_eq!(module.dump_funcs(), funcs_after_first);
    }

    #[test]
    fn dead_cycles_are_removed_together() {
        let builder = cases::case_mutual_recursion_unreached();
        let module = &builder.module;
        let report = dead_func_pass(module);

        assert_eq!(report.dead_funcs, vec!["ping", "pong"]);
        assert_eq!(module.find_func("ping"), None);
        assert_eq!(module.find_func("pong"), None);
        assert_no_dangling_func_refs(module);
    }

    #[test]
    fn live_cycles_survive() {
        let builder = cases::case_mutual_recursion_live();
        let module = &builder.module;
        let report = dead_func_pass(module);

        assert_eq!(report.dead_funcs, Vec::<smol_str::SmolStr>::new());
        assert!(module.find_func("ping").is_some());
        assert!(module.find_func("pong").is_some());
    }

    #[test]
    fn address_taken_uses_become_undef() {
        let builder = cases::case_indirect_call();
        let module = &builder.module;
        let report = dead_func_pass(module);

        // `orphan` is only address-taken; call edges alone decide liveness.
        assert_eq!(report.dead_funcs, vec!["orphan"]);
        assert_eq!(module.find_func("orphan"), None);

        let undef = ConstData::make_undef_valssa(ValTypeID::Ptr);
        let main = module.find_func("main").unwrap();
        let mut stores = 0;
        for block in module.get_func(main).dump_blocks() {
            for inst in module.get_block(block).dump_insts() {
                if let InstData::Store(_, store) = &*module.get_inst(inst) {
                    assert_eq!(store.source.get_operand(), undef);
                    stores += 1;
                }
            }
        }
        assert_eq!(stores, 1);
        assert_no_dangling_func_refs(module);
    }

    #[test]
    fn entry_name_is_configurable() {
        let builder = cases::case_no_entry();
        let module = &builder.module;
        let report = dead_func_pass_with_entry(module, "worker");

        assert_eq!(report.entry_func.as_deref(), Some("worker"));
        assert_eq!(report.dead_funcs, Vec::<smol_str::SmolStr>::new());
        assert!(module.find_func("helper").is_some());
    }
}
