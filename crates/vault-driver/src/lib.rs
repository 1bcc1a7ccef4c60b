pub mod infra;
mod run;

pub use self::run::{run, start};
