//! Tests for day-range encoding
