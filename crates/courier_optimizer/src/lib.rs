pub mod economics;
pub mod engine;
pub mod json;
pub mod problem;
pub mod scenario;
pub mod solution_set;
pub mod solver;
pub mod validator;
mod utils;

#[cfg(test)]
pub(crate) mod test_utils;
