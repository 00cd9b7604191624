//! Unit tests for archived message content.
