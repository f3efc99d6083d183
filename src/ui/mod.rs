//! egui widgets: the criteria sidebar, the top bar and the results table.

pub mod panels;
pub mod table;
