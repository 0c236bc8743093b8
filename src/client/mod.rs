pub mod guard;
pub mod http;
pub mod plans;
pub mod session;

pub use guard::RequestGuard;
pub use http::ApiClient;
pub use plans::{PlanClient, TextPlanFetcher};
pub use session::Session;
