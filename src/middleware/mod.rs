pub mod request_id;

pub use request_id::{assign_request_id, echo_request_id, RequestIdExt};
