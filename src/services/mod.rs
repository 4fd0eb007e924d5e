pub mod council_api;
