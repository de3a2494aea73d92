pub mod make_request;
