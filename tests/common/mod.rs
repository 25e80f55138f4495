#![allow(dead_code, unused_imports)]

pub use testrun_test_utils::builders;
pub use testrun_test_utils::{init_tracing, with_timeout};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;
