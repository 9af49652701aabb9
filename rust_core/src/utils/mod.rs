pub mod dates;
pub mod matching;
pub mod price;
