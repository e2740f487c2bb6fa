use crate::{define_index_newtype, solver::solution::route::WorkingSolutionRoute};

// One route per vehicle, the route index equals the vehicle index.
define_index_newtype!(RouteIdx, WorkingSolutionRoute);
