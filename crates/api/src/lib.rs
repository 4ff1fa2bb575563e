pub mod dto;
pub mod shim;

pub use dto::PlanRequest;
pub use shim::{handle_plan_request, ShimResponse};
