pub mod codec;
pub mod constant;
pub mod error_message;
pub mod packet;
pub mod parser;
pub mod writer;
