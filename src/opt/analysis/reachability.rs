//! Entry-rooted liveness over the call graph.

use std::collections::{HashSet, VecDeque};

use crate::{
    ir::{FuncRef, Module},
    opt::analysis::callgraph::CallGraph,
};

/// Functions not transitively reachable from `entry`, in program order.
///
/// Worklist BFS over callee edges; unresolved edges contribute nothing.
/// Liveness is reachability from the entry and nothing else — a function
/// kept only by calls from dead functions stays dead.
pub fn find_dead_funcs(module: &Module, graph: &CallGraph, entry: FuncRef) -> Vec<FuncRef> {
    let mut visited = HashSet::with_capacity(graph.funcs().len());
    let mut worklist = VecDeque::from([entry]);
    while let Some(func) = worklist.pop_front() {
        if !visited.insert(func) {
            continue;
        }
        for callee in graph.callees_of(func) {
            match callee {
                Some(callee) if !visited.contains(callee) => worklist.push_back(*callee),
                _ => {}
            }
        }
    }
    module
        .dump_funcs()
        .into_iter()
        .filter(|func| !visited.contains(func))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::cases;

    fn dead_names(builder: &crate::ir::util::builder::IRBuilder) -> Vec<String> {
        let module = &builder.module;
        let graph = CallGraph::from_module(module);
        let entry = module.find_func("main").unwrap();
        find_dead_funcs(module, &graph, entry)
            .into_iter()
            .map(|func| module.get_func(func).name.to_string())
            .collect()
    }

    #[test]
    fn orphans_are_dead_even_when_called_by_dead_code() {
        let builder = cases::case_orphan_pair();
        assert_eq!(dead_names(&builder), vec!["orphan", "orphanCaller"]);
    }

    #[test]
    fn unreached_cycle_is_dead() {
        let builder = cases::case_mutual_recursion_unreached();
        assert_eq!(dead_names(&builder), vec!["ping", "pong"]);
    }

    #[test]
    fn reached_cycle_is_live() {
        let builder = cases::case_mutual_recursion_live();
        assert_eq!(dead_names(&builder), Vec::<String>::new());
    }

    #[test]
    fn entry_is_trivially_live() {
        let mut builder = cases::create_module_builder("entry_only");
        let tctx = builder.get_type_ctx();
        let i32fty = tctx.make_func_type(&[], crate::typing::ValTypeID::Int(32), false);
        builder.define_function("main", i32fty).unwrap();
        builder
            .focus_set_return(crate::ir::ConstData::make_int_valssa(32, 0))
            .unwrap();
        assert_eq!(dead_names(&builder), Vec::<String>::new());
    }

    #[test]
    fn indirect_targets_do_not_keep_functions_alive() {
        let builder = cases::case_indirect_call();
        assert_eq!(dead_names(&builder), vec!["orphan"]);
    }
}
