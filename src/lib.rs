#![doc = include_str!("../README.md")]
pub mod boxscore;
pub mod error;
pub mod game;
pub mod player;
pub mod rng;
pub mod team;
