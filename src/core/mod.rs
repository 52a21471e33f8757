pub mod app;
pub mod server;
pub mod validator;
