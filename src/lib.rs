//! Mortgage Assist — scripted mortgage-renewal conversation engine.

pub mod config;
pub mod directory;
pub mod dialog;
pub mod error;
pub mod finance;
pub mod flows;
pub mod messages;
pub mod offers;
pub mod session;
pub mod turn;
