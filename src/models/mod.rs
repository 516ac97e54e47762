pub mod api_request;
pub mod ticket;
