pub mod cisco;
