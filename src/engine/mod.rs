mod pipeline;
mod rules;

pub use pipeline::FraudPipeline;
pub use rules::detect_fraud;
