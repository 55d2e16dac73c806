// tests/property/main.rs

mod tokenizer;
mod tracker;
