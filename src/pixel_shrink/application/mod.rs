pub mod error;
pub mod form_params;
pub mod shrink_service;
pub mod upload;
