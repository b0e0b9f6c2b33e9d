//! Test suite for SocialHub
//!
//! This module organizes all tests

pub mod common;
