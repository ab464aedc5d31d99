//! End-to-end rendering through the in-memory backend.
