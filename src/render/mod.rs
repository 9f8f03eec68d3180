//! Renderers for solved and unsolved mazes.
//!
//! These only read the problem, the solution and the explored set, the search
//! itself knows nothing about them.

pub mod image;
pub mod terminal;
pub mod text;
