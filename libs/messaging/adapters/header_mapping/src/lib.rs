//! # Header mapping
//!
//! The boundary between transports and the pipeline. A
//! [`HeaderMappingConverter`] turns a [`WireMessage`] into a [`message::Message`]
//! and back by handing the body to a [`PayloadConverter`] and the headers to a
//! [`HeaderMapper`].

pub mod converter;
pub mod error;
pub mod mapper;
pub mod wire;

pub use converter::{
    HeaderMappingConverter, JsonConverter, PayloadConverter, Utf8Converter, ValueConverter,
};
pub use error::ConversionError;
pub use mapper::{DefaultHeaderMapper, HeaderMapper};
pub use wire::WireMessage;
