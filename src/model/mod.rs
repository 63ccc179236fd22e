pub mod batch;
pub mod item;
pub mod status;
