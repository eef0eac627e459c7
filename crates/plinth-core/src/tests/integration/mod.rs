mod host_bootstrap_tests;
mod tree_tests;
