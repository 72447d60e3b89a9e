//! Shared IR scenarios for tests and debug dumps. The crate has no
//! frontend, so every case is built programmatically.

use crate::{
    ir::{
        ConstData, Module, Opcode, ValueSSA, inst::cmp::CmpCond, util::builder::IRBuilder,
        util::writer::write_ir_module,
    },
    typing::{TypeContext, ValTypeID},
};

pub fn create_module_builder(name: &str) -> IRBuilder {
    let type_ctx = TypeContext::new_rc();
    IRBuilder::new(Module::new(name.to_string(), type_ctx))
}

/// The classic orphan module:
///
/// ```llvm
/// define i32 @helper()       { ret i32 7 }
/// define i32 @orphan()       { ret i32 13 }
/// define i32 @orphanCaller() { %1 = call i32 @orphan()  ret i32 %1 }
/// define i32 @main()         { %1 = call i32 @helper()  ret i32 %1 }
/// ```
///
/// Nothing reaches `orphan` or `orphanCaller` from `main`.
pub fn case_orphan_pair() -> IRBuilder {
    let mut builder = create_module_builder("case_orphan_pair");
    let tctx = builder.get_type_ctx();
    let i32fty = tctx.make_func_type(&[], ValTypeID::Int(32), false);

    let helper = builder.define_function("helper", i32fty).unwrap();
    builder
        .focus_set_return(ConstData::make_int_valssa(32, 7))
        .unwrap();

    let orphan = builder.define_function("orphan", i32fty).unwrap();
    builder
        .focus_set_return(ConstData::make_int_valssa(32, 13))
        .unwrap();

    builder.define_function("orphanCaller", i32fty).unwrap();
    let call = builder.add_call_inst(orphan, &[]).unwrap();
    builder.focus_set_return(ValueSSA::Inst(call)).unwrap();

    builder.define_function("main", i32fty).unwrap();
    let call = builder.add_call_inst(helper, &[]).unwrap();
    builder.focus_set_return(ValueSSA::Inst(call)).unwrap();
    builder
}

/// `ping` and `pong` call each other but nothing connects them to `main`.
pub fn case_mutual_recursion_unreached() -> IRBuilder {
    let mut builder = create_module_builder("case_mutual_recursion_unreached");
    let tctx = builder.get_type_ctx();
    let i32fty = tctx.make_func_type(&[], ValTypeID::Int(32), false);

    let ping = builder.define_function("ping", i32fty).unwrap();
    let ping_entry = builder.focus.block;

    let pong = builder.define_function("pong", i32fty).unwrap();
    let call = builder.add_call_inst(ping, &[]).unwrap();
    builder.focus_set_return(ValueSSA::Inst(call)).unwrap();

    builder.set_focus_block(ping_entry);
    let call = builder.add_call_inst(pong, &[]).unwrap();
    builder.focus_set_return(ValueSSA::Inst(call)).unwrap();

    builder.define_function("main", i32fty).unwrap();
    builder
        .focus_set_return(ConstData::make_int_valssa(32, 0))
        .unwrap();
    builder
}

/// Same cycle, but `main` calls into it: everything is live.
pub fn case_mutual_recursion_live() -> IRBuilder {
    let mut builder = create_module_builder("case_mutual_recursion_live");
    let tctx = builder.get_type_ctx();
    let i32fty = tctx.make_func_type(&[], ValTypeID::Int(32), false);

    let ping = builder.define_function("ping", i32fty).unwrap();
    let ping_entry = builder.focus.block;

    let pong = builder.define_function("pong", i32fty).unwrap();
    let call = builder.add_call_inst(ping, &[]).unwrap();
    builder.focus_set_return(ValueSSA::Inst(call)).unwrap();

    builder.set_focus_block(ping_entry);
    let call = builder.add_call_inst(pong, &[]).unwrap();
    builder.focus_set_return(ValueSSA::Inst(call)).unwrap();

    builder.define_function("main", i32fty).unwrap();
    let call = builder.add_call_inst(ping, &[]).unwrap();
    builder.focus_set_return(ValueSSA::Inst(call)).unwrap();
    builder
}

/// Branching control flow: `main` compares, branches into one of two
/// calling blocks and joins at a shared exit. Callees are encountered in
/// block layout order.
pub fn case_branchy() -> IRBuilder {
    let mut builder = create_module_builder("case_branchy");
    let tctx = builder.get_type_ctx();
    let i32fty = tctx.make_func_type(&[], ValTypeID::Int(32), false);
    let unary_fty = tctx.make_func_type(&[ValTypeID::Int(32)], ValTypeID::Int(32), false);

    let left = builder.define_function("left", unary_fty).unwrap();
    let sum = builder
        .add_binop_inst(
            Opcode::Add,
            ValueSSA::FuncArg(left, 0),
            ConstData::make_int_valssa(32, 1),
        )
        .unwrap();
    builder.focus_set_return(ValueSSA::Inst(sum)).unwrap();
    let right = builder.define_function("right", i32fty).unwrap();
    builder
        .focus_set_return(ConstData::make_int_valssa(32, 2))
        .unwrap();

    builder.define_function("main", i32fty).unwrap();
    let entry = builder.focus.block;
    let then_bb = builder.append_block().unwrap();
    let else_bb = builder.append_block().unwrap();
    let exit_bb = builder.append_block().unwrap();

    builder.set_focus_block(entry);
    let cond = builder
        .add_cmp_inst(
            CmpCond::LT | CmpCond::SIGNED,
            ConstData::make_int_valssa(32, 1),
            ConstData::make_int_valssa(32, 2),
        )
        .unwrap();
    builder
        .focus_set_branch_to(ValueSSA::Inst(cond), then_bb, else_bb)
        .unwrap();

    builder.set_focus_block(then_bb);
    let call = builder
        .add_call_inst(left, &[ConstData::make_int_valssa(32, 41)])
        .unwrap();
    builder
        .add_binop_inst(
            Opcode::Add,
            ValueSSA::Inst(call),
            ConstData::make_int_valssa(32, 1),
        )
        .unwrap();
    builder.focus_set_jump_to(exit_bb).unwrap();

    builder.set_focus_block(else_bb);
    builder.add_call_inst(right, &[]).unwrap();
    builder.focus_set_jump_to(exit_bb).unwrap();

    builder.set_focus_block(exit_bb);
    builder
        .focus_set_return(ConstData::make_int_valssa(32, 0))
        .unwrap();
    builder
}

/// A module without any `main`: `worker` calls `helper`.
pub fn case_no_entry() -> IRBuilder {
    let mut builder = create_module_builder("case_no_entry");
    let tctx = builder.get_type_ctx();
    let i32fty = tctx.make_func_type(&[], ValTypeID::Int(32), false);

    let helper = builder.define_function("helper", i32fty).unwrap();
    builder
        .focus_set_return(ConstData::make_int_valssa(32, 1))
        .unwrap();

    builder.define_function("worker", i32fty).unwrap();
    let call = builder.add_call_inst(helper, &[]).unwrap();
    builder.focus_set_return(ValueSSA::Inst(call)).unwrap();
    builder
}

/// `main` spills `@orphan` to a stack slot and calls through the reloaded
/// pointer. The call site carries no static callee, so `orphan` has no
/// incoming call edge even though its address escapes.
pub fn case_indirect_call() -> IRBuilder {
    let mut builder = create_module_builder("case_indirect_call");
    let tctx = builder.get_type_ctx();
    let i32fty = tctx.make_func_type(&[], ValTypeID::Int(32), false);

    let orphan = builder.define_function("orphan", i32fty).unwrap();
    builder
        .focus_set_return(ConstData::make_int_valssa(32, 1))
        .unwrap();

    builder.define_function("main", i32fty).unwrap();
    let slot = builder.add_alloca_inst(ValTypeID::Ptr, 3).unwrap();
    builder
        .add_store_inst(ValueSSA::Inst(slot), ValueSSA::Func(orphan), 3)
        .unwrap();
    let loaded = builder
        .add_load_inst(ValTypeID::Ptr, 3, ValueSSA::Inst(slot))
        .unwrap();
    builder
        .add_indirect_call_inst(ValueSSA::Inst(loaded), i32fty, &[])
        .unwrap();
    builder
        .focus_set_return(ConstData::make_int_valssa(32, 0))
        .unwrap();
    builder
}

pub fn write_ir_to_file_quiet(module: &Module, filename: &str) {
    let filepath = format!("target/{filename}.ll");
    let Ok(mut file) = std::fs::File::create(&filepath) else {
        return;
    };
    let _ = write_ir_module(module, &mut file);
}
