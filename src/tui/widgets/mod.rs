// TUI widget modules for each panel.

pub mod confirm;
pub mod draw_stage;
pub mod input_box;
pub mod roster_list;
pub mod status_bar;
pub mod teams;
pub mod winner_log;
