// src/engine/mod.rs

//! Control loop tying the change detector to the pipeline supervisor.

pub mod control_loop;

pub use control_loop::ControlLoop;
