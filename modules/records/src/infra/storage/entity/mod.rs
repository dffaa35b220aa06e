pub mod scheds;
pub mod users;
