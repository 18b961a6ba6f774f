pub mod a001_car;
