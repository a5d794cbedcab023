pub mod balance;
pub mod completion;
