//! # Ports Layer (Middle Hexagon)
//!
//! - **Driving Port (Inbound)**: `NotarizationApi`, how clients submit and
//!   evaluate contract functions
//! - **Driven Ports (Outbound)**: the substrate stub and the notification
//!   publisher
//!
//! No concrete implementations in this module.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
