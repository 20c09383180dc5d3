pub mod me_response;
pub mod token_request;
pub mod token_response;
