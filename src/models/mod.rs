pub mod budget;
pub mod catalog;
pub mod session;
pub mod stop;
pub mod trip;
pub mod trip_activity;
pub mod user;
