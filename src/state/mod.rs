/// State management module
///
/// This module handles all application state, including:
/// - Database connections and queries (store.rs)
/// - Shared data structures (contact.rs)

pub mod contact;
pub mod store;
