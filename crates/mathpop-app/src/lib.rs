//! Headless driver for MATHPOP: the real-time game loop, a bot player and
//! JSON-file collaborators.

pub mod bot;
pub mod game_loop;
pub mod persistence;
pub mod state;
