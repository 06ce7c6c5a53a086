#![doc = include_str!("../../docs/game/play.md")]
pub mod call;
pub mod result;
