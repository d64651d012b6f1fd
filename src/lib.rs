pub mod config;
pub mod events;
pub mod form;
pub mod http_client;
pub mod provider;
pub mod roster_fetch;
pub mod state;
pub mod view;
