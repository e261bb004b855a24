pub use confab_core::model::ConnectionId;

pub mod model {
    pub use confab_core::model::*;
}

#[cfg(feature = "server")]
pub mod server {
    pub use confab_server::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use confab_client::*;
}
