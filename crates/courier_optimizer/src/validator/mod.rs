pub mod constraint_validator;
pub mod violation;
