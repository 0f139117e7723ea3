//! Chain-specific transaction variants.
//!
//! Each submodule exports the descriptors its chain adds on top of the
//! Ethereum set, and a `registry()` that includes them. Some registries
//! build on others:
//!
//! - [`op_stack::registry`]: Ethereum + deposit (`0x7e`)
//! - [`celo::registry`]: OP stack + CIP-64 (`0x7b`) + CIP-42 (`0x7c`)
//! - [`zksync::registry`]: Ethereum + EIP-712 (`0x71`)

pub mod celo;
pub mod op_stack;
pub mod zksync;
