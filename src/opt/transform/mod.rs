pub mod dead_func;
