//! LLVM-flavored text emission for whole modules.

use std::{collections::HashMap, io::Write as IoWrite};

use crate::{
    ir::{BlockRef, ConstData, FuncRef, InstData, InstRef, Module, ValueSSA},
    typing::ValTypeID,
};

pub fn write_ir_module(module: &Module, writer: &mut dyn IoWrite) -> std::io::Result<()> {
    let mut first = true;
    for func in module.dump_funcs() {
        if !first {
            writeln!(writer)?;
        }
        first = false;
        FuncWriter::new(module, func).write(writer)?;
    }
    Ok(())
}

/// Per-function local value numbering: arguments first, then each block
/// label and each value-producing instruction in layout order.
struct FuncWriter<'a> {
    module: &'a Module,
    func: FuncRef,
    block_ids: HashMap<BlockRef, usize>,
    inst_ids: HashMap<InstRef, usize>,
}

impl<'a> FuncWriter<'a> {
    fn new(module: &'a Module, func: FuncRef) -> Self {
        let (fty, blocks) = {
            let data = module.get_func(func);
            (data.func_ty, data.dump_blocks())
        };
        let mut next = module.type_ctx.get_nargs(fty);
        let mut block_ids = HashMap::new();
        let mut inst_ids = HashMap::new();
        for block in blocks {
            block_ids.insert(block, next);
            next += 1;
            for inst in module.get_block(block).dump_insts() {
                if module.get_inst(inst).get_ret_type() != ValTypeID::Void {
                    inst_ids.insert(inst, next);
                    next += 1;
                }
            }
        }
        Self { module, func, block_ids, inst_ids }
    }

    fn write(&self, writer: &mut dyn IoWrite) -> std::io::Result<()> {
        let (name, fty, blocks, is_extern) = {
            let data = self.module.get_func(self.func);
            (data.name.clone(), data.func_ty, data.dump_blocks(), data.is_extern())
        };
        let tctx = &self.module.type_ctx;
        let (ret_name, arg_names) = {
            let fty = tctx.get_func_type(fty);
            let args: Vec<String> = fty
                .args
                .iter()
                .map(|arg| arg.get_display_name())
                .collect();
            (fty.ret_type.get_display_name(), args)
        };

        if is_extern {
            return writeln!(writer, "declare {ret_name} @{name}({})", arg_names.join(", "));
        }

        let args: Vec<String> = arg_names
            .iter()
            .enumerate()
            .map(|(index, ty)| format!("{ty} %{index}"))
            .collect();
        writeln!(writer, "define {ret_name} @{name}({}) {{", args.join(", "))?;
        for (index, block) in blocks.iter().enumerate() {
            if index > 0 {
                writeln!(writer)?;
            }
            writeln!(writer, "{}:", self.block_ids[block])?;
            for inst in self.module.get_block(*block).dump_insts() {
                self.write_inst(writer, inst)?;
            }
        }
        writeln!(writer, "}}")
    }

    fn format_value(&self, value: ValueSSA) -> String {
        match value {
            ValueSSA::None => "<null>".into(),
            ValueSSA::ConstData(ConstData::Int(_, v)) => v.to_string(),
            ValueSSA::ConstData(ConstData::PtrNull) => "null".into(),
            ValueSSA::ConstData(ConstData::Undef(_)) => "undef".into(),
            ValueSSA::FuncArg(_, index) => format!("%{index}"),
            ValueSSA::Block(block) => format!("%{}", self.block_ids[&block]),
            ValueSSA::Inst(inst) => format!("%{}", self.inst_ids[&inst]),
            ValueSSA::Func(func) => format!("@{}", self.module.get_func(func).name),
        }
    }
    fn format_typed(&self, value: ValueSSA) -> String {
        let ty = value.get_value_type(self.module);
        format!("{} {}", ty.get_display_name(), self.format_value(value))
    }

    fn write_inst(&self, writer: &mut dyn IoWrite, inst: InstRef) -> std::io::Result<()> {
        let data = self.module.get_inst(inst);
        match &*data {
            InstData::Unreachable(_) => writeln!(writer, "    unreachable"),
            InstData::Ret(_, ret) => match ret.retval.get_operand() {
                ValueSSA::None => writeln!(writer, "    ret void"),
                retval => writeln!(writer, "    ret {}", self.format_typed(retval)),
            },
            InstData::Jump(_, jump) => {
                writeln!(writer, "    br label %{}", self.block_ids[&jump.target.get()])
            }
            InstData::Br(_, br) => writeln!(
                writer,
                "    br i1 {}, label %{}, label %{}",
                self.format_value(br.cond.get_operand()),
                self.block_ids[&br.if_true.get()],
                self.block_ids[&br.if_false.get()],
            ),
            InstData::Alloca(_, alloca) => writeln!(
                writer,
                "    %{} = alloca {}, align {}",
                self.inst_ids[&inst],
                alloca.pointee_ty.get_display_name(),
                1u32 << alloca.align_log2,
            ),
            InstData::Load(common, load) => writeln!(
                writer,
                "    %{} = load {}, {}, align {}",
                self.inst_ids[&inst],
                common.ret_type.get_display_name(),
                self.format_typed(load.source.get_operand()),
                1u32 << load.align_log2,
            ),
            InstData::Store(_, store) => writeln!(
                writer,
                "    store {}, {}, align {}",
                self.format_typed(store.source.get_operand()),
                self.format_typed(store.target.get_operand()),
                1u32 << store.align_log2,
            ),
            InstData::BinOp(common, binop) => writeln!(
                writer,
                "    %{} = {} {} {}, {}",
                self.inst_ids[&inst],
                common.opcode.get_name(),
                common.ret_type.get_display_name(),
                self.format_value(binop.lhs.get_operand()),
                self.format_value(binop.rhs.get_operand()),
            ),
            InstData::Cmp(_, cmp) => {
                let lhs = cmp.lhs.get_operand();
                writeln!(
                    writer,
                    "    %{} = icmp {} {} {}, {}",
                    self.inst_ids[&inst],
                    cmp.cond.get_name(),
                    lhs.get_value_type(self.module).get_display_name(),
                    self.format_value(lhs),
                    self.format_value(cmp.rhs.get_operand()),
                )
            }
            InstData::Call(common, call) => {
                let args: Vec<String> = call
                    .args
                    .iter()
                    .map(|arg| self.format_typed(arg.get_operand()))
                    .collect();
                let callee = self.format_value(call.get_callee());
                if common.ret_type == ValTypeID::Void {
                    writeln!(writer, "    call void {callee}({})", args.join(", "))
                } else {
                    writeln!(
                        writer,
                        "    %{} = call {} {callee}({})",
                        self.inst_ids[&inst],
                        common.ret_type.get_display_name(),
                        args.join(", "),
                    )
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::cases;

    #[test]
    fn writes_declarations_and_definitions() {
        let builder = cases::case_orphan_pair();
        let mut buf = Vec::new();
        write_ir_module(&builder.module, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("define i32 @main() {"));
        assert!(text.contains("define i32 @helper() {"));
        assert!(text.contains("%1 = call i32 @helper()"));
        assert!(text.contains("ret i32 %1"));
    }

    #[test]
    fn writes_branching_control_flow() {
        let builder = cases::case_branchy();
        let mut buf = Vec::new();
        write_ir_module(&builder.module, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("define i32 @left(i32 %0) {"));
        assert!(text.contains("%2 = add i32 %0, 1"));
        assert!(text.contains("%1 = icmp slt i32 1, 2"));
        assert!(text.contains("br i1 %1, label %2, label %5"));
        assert!(text.contains("%3 = call i32 @left(i32 41)"));
        assert!(text.contains("%4 = add i32 %3, 1"));
        assert!(text.contains("br label %7"));
    }

    #[test]
    fn writes_indirect_calls_through_values() {
        let builder = cases::case_indirect_call();
        let mut buf = Vec::new();
        write_ir_module(&builder.module, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("store ptr @orphan, ptr %1"));
        assert!(text.contains("%2 = load ptr, ptr %1"));
        assert!(text.contains("%3 = call i32 %2()"));
    }
}
