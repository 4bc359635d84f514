pub mod extract;
pub mod presets;
pub mod run;
