//! One file per component, named `tests_<component>.rs`, the way the
//! teacher names `tests/hir/tests_*.rs` and `tests/semantic/tests_*.rs`.

pub mod tests_cache_round_trip;
pub mod tests_flow_foreach;
pub mod tests_resolve_names;
pub mod tests_store_member_lookup;
pub mod tests_typestr_table;
pub mod tests_vartable_branch_merge;
