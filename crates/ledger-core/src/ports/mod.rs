//! # Ports
//!
//! Boundary interfaces in the hexagonal layout. This core only has
//! outbound ports: collaborators it calls but does not implement.

pub mod outbound;
