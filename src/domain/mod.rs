// Domain layer - Fleet telemetry models and trend logic
pub mod device;
pub mod metric;
pub mod trend;
