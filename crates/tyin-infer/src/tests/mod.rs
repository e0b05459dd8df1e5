mod cfg_tests;
mod intern_tests;
mod narrowing_tests;
mod type_law_tests;
mod widening_tests;
