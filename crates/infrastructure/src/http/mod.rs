pub mod crtsh;
pub mod remote_list;
pub mod resilient_fetch;

pub use crtsh::CrtShSearch;
pub use remote_list::HttpRemoteList;
pub use resilient_fetch::{FetchOptions, ResilientFetcher};
