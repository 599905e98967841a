pub mod connection;
pub mod reading;
pub mod recorder;
pub mod session;
pub mod sink;
