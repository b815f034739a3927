pub mod price;
pub mod table;
