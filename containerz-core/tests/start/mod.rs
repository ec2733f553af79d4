//! Integration tests for starting containers through a fake engine.

mod start_container;
