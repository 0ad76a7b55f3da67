//! ユースケース層

pub mod extract;
