//! API handlers module

pub mod accounts;
pub mod chatbots;
pub mod dashboard;
pub mod documents;
pub mod health;
pub mod widget;
