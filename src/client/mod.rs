pub mod envelope;
pub mod http;
pub mod session;
pub mod traits;

pub use envelope::{check_status, decode_envelope, Envelope};
pub use http::HttpAdminClient;
pub use session::{Session, SessionHandle};
pub use traits::*;
