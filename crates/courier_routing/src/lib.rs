pub mod client;
pub mod endpoint;
pub mod error;
pub mod form;
pub mod interpreter;
pub mod markers;
pub mod request;
pub mod response;
pub mod schema;

#[cfg(test)]
pub(crate) mod test_utils;
