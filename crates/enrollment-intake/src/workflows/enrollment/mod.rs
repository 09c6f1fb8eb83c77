pub mod applications;
pub mod catalog;
pub mod gateway;
pub mod http;

pub use catalog::{normalize_courses, CourseCatalogLoader};
pub use gateway::{GatewayError, GatewayResponse, IntakeGateway};
pub use http::HttpIntakeGateway;
