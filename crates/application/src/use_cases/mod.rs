pub mod check_antifilter;
pub mod map_ips;
pub mod scan_domain;

pub use check_antifilter::{AntifilterVerdict, CheckAntifilterUseCase};
pub use map_ips::{MapIpsToDomainsUseCase, ReverseReport, ReverseResult, ReverseSettings};
pub use scan_domain::{ScanDomainUseCase, ScanReport, ScanRequest, ScanSettings, ScoredHost};
