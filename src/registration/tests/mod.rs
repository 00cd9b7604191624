//! Unit tests for guild registrations.
