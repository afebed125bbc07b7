mod support;

mod config_tests;
mod contraction_tests;
mod declaration_tests;
mod serde_tests;
