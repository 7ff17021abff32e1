//! Storage Adapters
//!
//! Implementations of the PaymentRepository port that live in process memory.
//! Production deployments use `adapters::postgres` instead.
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::InMemoryPaymentRepository;
//!
//! let repository = Arc::new(InMemoryPaymentRepository::new());
//! ```

mod in_memory_payment_repository;

pub use in_memory_payment_repository::InMemoryPaymentRepository;
