//! ポート層

pub mod outbound;
