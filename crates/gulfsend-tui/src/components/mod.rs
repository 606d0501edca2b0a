pub mod key_table;
pub mod task_board;
