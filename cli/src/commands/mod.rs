pub mod eft;
