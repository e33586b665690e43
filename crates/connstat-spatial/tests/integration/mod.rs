mod csa_tests;
mod export_tests;
mod layer_tests;
mod two_level;
