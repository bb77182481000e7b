pub mod canvas_widget;
pub mod key_tracker;
pub mod terminal_runtime;
