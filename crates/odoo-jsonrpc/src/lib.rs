//! odoo-jsonrpc - JSON-RPC backed session for the Odoo connector.
//!
//! # Example
//!
//! ```no_run
//! use odoo_core::{Credentials, ModelName, ServerUrl, Session};
//! use odoo_jsonrpc::JsonRpcSession;
//!
//! # async fn example() -> Result<(), odoo_core::Error> {
//! let url = ServerUrl::new("https://acme.odoo.com")?;
//! let credentials = Credentials::new(url, None, "admin", "secret");
//! let session = JsonRpcSession::login(&credentials).await?;
//!
//! let partners = ModelName::new("res.partner")?;
//! let count = session.search_count(&partners, &Default::default()).await?;
//! println!("{} partners", count);
//! # Ok(())
//! # }
//! ```

mod execute;
mod lookup;
mod normalize;
mod rpc;
mod session;

pub use execute::execute;
pub use lookup::{FieldInfo, ModelInfo};
pub use rpc::JsonRpcClient;
pub use session::JsonRpcSession;
