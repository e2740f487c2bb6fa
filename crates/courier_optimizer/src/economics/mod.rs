pub mod economics_evaluator;
pub mod economics_params;
