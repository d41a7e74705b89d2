pub mod catalog;
pub mod explain;
pub mod serve;
