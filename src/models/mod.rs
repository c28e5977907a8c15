pub mod chat;
pub mod view;
pub mod websocket;
