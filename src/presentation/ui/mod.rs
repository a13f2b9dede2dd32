pub mod display;

pub use display::ConsoleReporter;
