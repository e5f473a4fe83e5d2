mod chat;

pub use chat::ChatCommands;
