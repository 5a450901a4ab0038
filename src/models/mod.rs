pub mod opportunity;
