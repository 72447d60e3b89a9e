//! Optimizers over Cinder-IR modules.

use std::path::Path;

use crate::{ir::Module, testing::cases::write_ir_to_file_quiet};

pub mod analysis;
pub mod report;
pub mod transform;

pub use {
    analysis::{callgraph::CallGraph, reachability::find_dead_funcs},
    report::{CallGraphEntry, DeadFuncReport},
    transform::dead_func::{ENTRY_FUNC_NAME, dead_func_pass, dead_func_pass_with_entry},
};

/// Runs every module-level transform, dumping the transformed module to a
/// file when debug logging is on.
pub fn optimize_module(module: &Module) -> DeadFuncReport {
    let report = transform::dead_func::dead_func_pass(module);
    if log::log_enabled!(log::Level::Debug) {
        let module_name = {
            let name = Path::new(module.name.as_str());
            let stem = name.file_stem().and_then(|s| s.to_str()).unwrap_or("module");
            format!("debug.optimize_module.{stem}")
        };
        write_ir_to_file_quiet(module, &module_name);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::optimize_module;
    use crate::testing::cases;

    #[test]
    fn optimize_module_runs_the_dead_func_pass() {
        let builder = cases::case_orphan_pair();
        let report = optimize_module(&builder.module);
        assert_eq!(report.dead_funcs.len(), 2);
        assert_eq!(builder.module.func_count(), 2);
    }
}
