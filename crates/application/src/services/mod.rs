pub mod aggregator;
pub mod antifilter;
pub mod passive_sources;
pub mod resolver;
pub mod reverse_lookup;
pub mod task_runner;

pub use aggregator::Aggregator;
pub use antifilter::AntifilterService;
pub use passive_sources::{filter_for_domain, PassiveSourceService, SourceHit};
pub use resolver::{HostDetails, ResolverService};
pub use reverse_lookup::ReverseLookupService;
pub use task_runner::TaskRunner;
