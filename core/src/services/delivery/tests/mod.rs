mod dispatcher_tests;
mod mocks;
