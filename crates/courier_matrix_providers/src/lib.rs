pub mod cache;
pub mod matrix_error;
pub mod planar;
pub mod travel_matrices;
pub mod travel_matrix_client;
pub mod travel_matrix_provider;
