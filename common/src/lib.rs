pub mod avatar;
pub mod chat;
pub mod forms;
pub mod identity;
pub mod listing;
pub mod nav;
