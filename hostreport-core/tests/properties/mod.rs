mod extractor_tests;
mod health_tests;
