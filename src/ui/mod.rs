/// UI module exports

pub mod auth;
pub mod components;
pub mod popup;
pub mod profile;
pub mod recommendations;
