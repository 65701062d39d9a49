//! Domains module containing business logic organized by bounded contexts.
//!
//! The server currently exposes a single context, **tools**; resources and
//! prompts are not advertised.

pub mod tools;
