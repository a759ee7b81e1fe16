//! This crate contains code for a simple untyped lambda calculus interpreter
//! that reduces expressions to normal form.

pub mod box_tree_impl;
pub mod end_to_end;
pub mod lexical_analysis;
