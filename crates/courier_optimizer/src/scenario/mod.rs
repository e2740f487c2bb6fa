pub mod data_provider;
pub mod scenario_engine;
pub mod scenario_error;
pub mod scenario_params;
pub mod scenario_result;
pub mod sensitivity;
