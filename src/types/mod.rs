pub mod id;

pub mod book;
pub mod copy;
pub mod genre;
