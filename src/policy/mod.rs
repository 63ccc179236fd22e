pub mod replenishment;
