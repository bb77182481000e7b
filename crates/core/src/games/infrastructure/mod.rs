pub mod entry_points;
pub mod local_games;
