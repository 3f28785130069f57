pub mod forwarding;
pub mod lookup;
pub mod resolv_conf;
pub mod transport;

pub use lookup::HickoryDnsLookup;
pub use resolv_conf::{parse_server, system_nameservers};
