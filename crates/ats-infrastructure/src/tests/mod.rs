//! Tests for the infrastructure layer

mod auth_tests;
