pub mod completion;
pub mod config;
pub mod run;
pub mod scenarios;
