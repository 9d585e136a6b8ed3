pub mod ball_events;
pub mod dimensions;
pub mod ids;
pub mod match_extract;
pub mod pipeline;
pub mod players;
pub mod source;
pub mod tables;
pub mod teams;
