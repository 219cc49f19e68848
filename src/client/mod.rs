//! Client side of Rural Connect: REST access, local persistence and the
//! headless page models built on them.

pub mod cart;
pub mod checkout;
pub mod dashboard;
pub mod error;
pub mod home;
pub mod http;
pub mod session;
pub mod storage;

pub use cart::CartManager;
pub use checkout::{submit_order, ORDER_FAILED_NOTICE};
pub use dashboard::{Dashboard, DashboardTab, QuickStats};
pub use error::{ClientError, ClientResult, StorageError, StorageResult};
pub use home::{HomePage, SubmitStatus, ViewMode};
pub use http::ApiClient;
pub use session::Session;
pub use storage::{FileStore, KeyValueStore, MemoryStore, CART_KEY, TOKEN_KEY};
