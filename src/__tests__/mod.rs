mod error_test;
mod frontend_test;
mod scanner_test;
