pub mod acquire;
pub mod aggregate;
pub mod columns;
pub mod dataset;
pub mod render_model;
pub mod roster;
pub mod sort;
pub mod state;
pub mod trick;
