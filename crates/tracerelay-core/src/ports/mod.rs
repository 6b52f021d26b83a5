//! Port definitions (trait interfaces implemented by adapters)

pub mod host;
pub mod interceptor;
pub mod owner;
pub mod transport;

pub use host::HostEnvironment;
pub use interceptor::{FailureEvent, FailureInterceptor, InterceptorRegistry};
pub use owner::Processor;
pub use transport::ReportTransport;
