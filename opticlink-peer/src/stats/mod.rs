mod metrics_calculator;
mod stats_sampler;

pub use metrics_calculator::MetricsCalculator;
pub use stats_sampler::StatsSampler;
