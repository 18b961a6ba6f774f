pub mod a001_car;
pub mod common;
