pub mod proto {
    tonic::include_proto!("tic_tac_toe");
}

pub mod config;
pub mod games;
pub mod identifiers;
pub mod logger;

pub use proto::*;
pub use identifiers::*;
