mod animation_tests;
mod route_tests;
