pub mod credential;
pub mod decision;
pub mod policy;
pub mod service;

pub use decision::{Attachments, Decision, IncomingRequestContext};
pub use policy::{FixedLengthValidator, TokenValidator};
pub use service::AuthorizationService;
