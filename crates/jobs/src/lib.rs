pub mod antifilter_refresh;
pub mod bucket_sweep;
pub mod runner;

pub use antifilter_refresh::AntifilterRefreshJob;
pub use bucket_sweep::BucketSweepJob;
pub use runner::JobRunner;
