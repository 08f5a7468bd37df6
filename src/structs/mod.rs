pub mod link_response;
