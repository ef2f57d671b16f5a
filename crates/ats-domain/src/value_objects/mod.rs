//! Value objects shared with the transport layer

mod responses;

pub use responses::{
    AccessTokenResponse, ErrorResponse, ExchangeCodeResponse, IdResponse, TokenPairResponse,
};
