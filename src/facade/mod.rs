//! Facades over the contract services.
//!
//! Each facade holds a shared reference to the service it wraps and implements the same
//! trait by forwarding every call verbatim. Code written against the traits can take a facade,
//! the alloy-backed service or a test double interchangeably.

pub mod erc20;
pub mod handler;

pub use erc20::Erc20ContractFacade;
pub use handler::ContractHandlerFacade;
