mod http;
pub mod logging;
