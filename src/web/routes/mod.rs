pub mod feed;
pub mod matches;
pub mod swipes;
pub mod users;
