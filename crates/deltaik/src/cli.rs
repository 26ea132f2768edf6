pub mod build_table;
pub mod drive;
pub mod solve;
