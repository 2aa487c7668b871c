pub mod accounts;
pub mod events;
pub mod notification;
pub mod users;
