pub mod clock;
pub mod game_over;
pub mod maze;
pub mod player;
pub mod pursuers;
pub mod telemetry;
