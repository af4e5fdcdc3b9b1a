//! Rendering helpers shared by front ends.

pub mod bubble;
