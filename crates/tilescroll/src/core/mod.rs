pub mod game_loop;
pub mod registry;
pub mod time;
pub mod viewport;
