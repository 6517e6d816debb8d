//! Named build tasks
//!
//! Each task is an async `run` function returning a plain report the
//! caller can print. Tasks process their files sequentially; a failing
//! file fails the task.

pub mod clear_cache;
pub mod images;
pub mod pages;
