//! The data handed to the report-writing collaborator.

use std::io::Write as IoWrite;

use smol_str::SmolStr;

use crate::{ir::Module, opt::analysis::callgraph::CallGraph};

/// One function's row of the call graph, keyed by names so the report
/// stays meaningful after the underlying references die.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CallGraphEntry {
    pub func: SmolStr,
    /// One entry per call site; `None` marks an unresolved target.
    pub callees: Vec<Option<SmolStr>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeadFuncReport {
    pub call_graph: Vec<CallGraphEntry>,
    pub entry_func: Option<SmolStr>,
    pub dead_funcs: Vec<SmolStr>,
}

impl DeadFuncReport {
    /// Snapshots the call graph by name. Entry and dead set are filled in
    /// by the pass once it knows them.
    pub(crate) fn from_graph(module: &Module, graph: &CallGraph) -> Self {
        let call_graph = graph
            .funcs()
            .iter()
            .map(|&func| CallGraphEntry {
                func: module.get_func(func).name.clone(),
                callees: graph
                    .callees_of(func)
                    .iter()
                    .map(|callee| callee.map(|c| module.get_func(c).name.clone()))
                    .collect(),
            })
            .collect();
        Self { call_graph, entry_func: None, dead_funcs: Vec::new() }
    }

    pub fn write_text(&self, writer: &mut dyn IoWrite) -> std::io::Result<()> {
        writeln!(writer, "call graph:")?;
        for entry in &self.call_graph {
            let callees: Vec<&str> = entry
                .callees
                .iter()
                .map(|callee| callee.as_deref().unwrap_or("<indirect>"))
                .collect();
            writeln!(writer, "  {} -> [{}]", entry.func, callees.join(", "))?;
        }
        match &self.entry_func {
            Some(entry) => writeln!(writer, "entry: {entry}")?,
            None => writeln!(writer, "entry: <none>")?,
        }
        writeln!(writer, "dead functions:")?;
        for name in &self.dead_funcs {
            writeln!(writer, "  {name}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{opt::transform::dead_func::dead_func_pass, testing::cases};

    #[test]
    fn report_carries_names_not_references() {
        let builder = cases::case_orphan_pair();
        let report = dead_func_pass(&builder.module);

        let main_row = report
            .call_graph
            .iter()
            .find(|entry| entry.func == "main")
            .unwrap();
        assert_eq!(main_row.callees, vec![Some("helper".into())]);
        assert_eq!(report.entry_func.as_deref(), Some("main"));
        assert_eq!(report.dead_funcs, vec!["orphan", "orphanCaller"]);
    }

    #[test]
    fn text_rendering() {
        let builder = cases::case_orphan_pair();
        let report = dead_func_pass(&builder.module);

        let mut buf = Vec::new();
        report.write_text(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("main -> [helper]"));
        assert!(text.contains("orphanCaller -> [orphan]"));
        assert!(text.contains("entry: main"));
        assert!(text.contains("\n  orphan\n"));
    }
}
