mod app_tests;
mod config_io_tests;
mod latch_tests;
mod support;
