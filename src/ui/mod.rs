pub mod controller;
pub mod event_log;
pub mod flows;
pub mod forms;
pub mod panels;
