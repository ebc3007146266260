mod loader_tests;
mod validation_tests;
