pub mod eastherts;
