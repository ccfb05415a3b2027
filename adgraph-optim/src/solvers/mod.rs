pub mod newton;
