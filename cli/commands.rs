pub mod generate;
pub mod list_types;
